// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Similarity map exporter.
//!
//! Computes the similarity of one seed vertex against every surface (or a
//! single `--target`) and prints the result as JSON on stdout. Logs go to
//! stderr.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use csm::config::{load_config, validate_config, ConfigError, CsmConfig};
use csm::observability::{init_logging, CrateDebugFlags, LogFormat, LoggingOptions};
use csm::similarity::CrossSpeciesMapper;
use csm::surface::SurfaceKey;

/// Cross-species similarity exporter
#[derive(Parser, Debug)]
#[command(
    name = "similarity_dump",
    version,
    about,
    long_about = None,
    after_help = "Per-crate debug logging: --debug-<crate> or --debug-all (also CSM_DEBUG)"
)]
struct Args {
    /// Seed surface, e.g. "human_left"
    #[arg(long)]
    seed: SurfaceKey,

    /// Seed vertex index on the seed surface
    #[arg(long, required_unless_present = "hemisphere")]
    vertex: Option<usize>,

    /// Only compute against this surface
    #[arg(long)]
    target: Option<SurfaceKey>,

    /// Print the seed surface geometry instead of similarity maps
    #[arg(long, default_value_t = false)]
    hemisphere: bool,

    /// Configuration file (default: search for csm_configuration.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override system.data_dir
    #[arg(long)]
    data_dir: Option<String>,

    /// Override similarity.roi_radius (mm)
    #[arg(long)]
    radius: Option<String>,

    /// Override similarity.weighting (uniform | gaussian)
    #[arg(long)]
    weighting: Option<String>,

    /// Override logging.format (text | json)
    #[arg(long)]
    log_format: Option<String>,
}

impl Args {
    /// Key/value overrides in the form `load_config` expects
    fn overrides(&self) -> HashMap<String, String> {
        [
            ("data_dir", &self.data_dir),
            ("roi_radius", &self.radius),
            ("weighting", &self.weighting),
            ("log_format", &self.log_format),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.clone().map(|v| (key.to_string(), v)))
        .collect()
    }
}

/// Separate `--debug-*` flags from the arguments clap parses
fn split_debug_args<I>(args: I) -> (Vec<String>, Vec<String>)
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let program = args.next();
    let (debug, rest): (Vec<String>, Vec<String>) =
        args.partition(|arg| arg.starts_with("--debug-"));
    (program.into_iter().chain(rest).collect(), debug)
}

/// Load the configuration file, falling back to defaults when none is found
fn resolve_config(args: &Args) -> Result<CsmConfig> {
    let overrides = args.overrides();
    let config = match load_config(args.config.as_deref(), Some(&overrides)) {
        Ok(config) => config,
        Err(ConfigError::FileNotFound(_)) if args.config.is_none() => {
            let mut config = CsmConfig::default();
            csm::config::apply_environment_overrides(&mut config);
            csm::config::apply_cli_overrides(&mut config, &overrides);
            config
        }
        Err(e) => return Err(e).context("Failed to load configuration"),
    };
    validate_config(&config).context("Invalid configuration")?;
    Ok(config)
}

fn run(args: Args, debug_flags: CrateDebugFlags) -> Result<()> {
    let config = resolve_config(&args)?;

    let options = LoggingOptions {
        level: config.system.log_level.clone(),
        format: config.logging.format.parse::<LogFormat>()?,
        log_dir: config.logging.log_dir.clone(),
        retention_runs: config.logging.retention_runs,
    };
    let _guard = init_logging(&debug_flags, &options)?;

    info!(
        environment = %config.system.environment,
        data_dir = %config.system.data_dir.display(),
        "Loaded configuration"
    );

    let mapper = CrossSpeciesMapper::from_config(&config)?;
    let vertex = args.vertex.unwrap_or(0);

    let output = if args.hemisphere {
        serde_json::to_string(&mapper.hemisphere(args.seed)?)?
    } else if let Some(target) = args.target {
        let result = mapper.similarity_to(args.seed, vertex, target)?;
        serde_json::to_string(&HashMap::from([(target, result)]))?
    } else {
        serde_json::to_string(&mapper.similarity_to_all(args.seed, vertex)?)?
    };

    println!("{output}");
    Ok(())
}

fn main() {
    let (clap_args, debug_args) = split_debug_args(env::args());
    let args = Args::parse_from(clap_args);

    let mut debug_flags = CrateDebugFlags::from_args(debug_args);
    debug_flags
        .enabled_crates
        .extend(csm::observability::parse_debug_flags().enabled_crates);

    if let Err(e) = run(args, debug_flags) {
        eprintln!("similarity_dump: {e:#}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csm::surface::{Side, Species};

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("similarity_dump")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_debug_flags_are_split_from_clap_args() {
        let (rest, debug) = split_debug_args(argv(&[
            "--seed",
            "human_left",
            "--debug-csm-store",
            "--vertex",
            "7",
            "--debug-all",
        ]));

        assert_eq!(rest, argv(&["--seed", "human_left", "--vertex", "7"]));
        assert_eq!(debug, vec!["--debug-csm-store", "--debug-all"]);

        let args = Args::try_parse_from(rest).unwrap();
        assert_eq!(args.seed, SurfaceKey::new(Species::Human, Side::Left));
        assert_eq!(args.vertex, Some(7));
    }

    #[test]
    fn test_overrides_collect_only_given_options() {
        let args = Args::try_parse_from(argv(&[
            "--seed",
            "macaque_right",
            "--vertex",
            "0",
            "--radius",
            "3.5",
            "--weighting",
            "uniform",
        ]))
        .unwrap();

        let overrides = args.overrides();
        assert_eq!(overrides.len(), 2);
        assert_eq!(overrides["roi_radius"], "3.5");
        assert_eq!(overrides["weighting"], "uniform");
    }

    #[test]
    fn test_vertex_required_unless_hemisphere() {
        assert!(Args::try_parse_from(argv(&["--seed", "human_right"])).is_err());

        let args = Args::try_parse_from(argv(&["--seed", "human_right", "--hemisphere"])).unwrap();
        assert!(args.hemisphere);
        assert_eq!(args.vertex, None);
    }

    #[test]
    fn test_invalid_surface_name_is_rejected() {
        assert!(Args::try_parse_from(argv(&["--seed", "mouse_left", "--vertex", "1"])).is_err());
    }
}
