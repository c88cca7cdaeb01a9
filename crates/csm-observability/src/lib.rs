// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # csm-observability
//!
//! Logging infrastructure shared by all cross-species mapper crates, with
//! per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: JSON file logs with daily rotation in a timestamped run folder

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Known CSM crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "csm",
    "csm-config",
    "csm-surface",
    "csm-store",
    "csm-similarity",
];
