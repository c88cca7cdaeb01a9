// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Keys identifying a hemispheric surface.

A `SurfaceKey` displays as `"{species}_{side}"` (e.g. `"human_left"`), the
same name used for data files and for per-target result maps.
*/

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{CsmError, CsmResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Human,
    Macaque,
}

impl Species {
    pub const ALL: [Species; 2] = [Species::Human, Species::Macaque];

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Human => "human",
            Species::Macaque => "macaque",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = CsmError;

    fn from_str(s: &str) -> CsmResult<Self> {
        match s.to_lowercase().as_str() {
            "human" => Ok(Species::Human),
            "macaque" => Ok(Species::Macaque),
            _ => Err(CsmError::validation("species", s, "one of human, macaque")),
        }
    }
}

/// Cortical hemisphere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = CsmError;

    fn from_str(s: &str) -> CsmResult<Self> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            _ => Err(CsmError::validation("side", s, "one of left, right")),
        }
    }
}

/// (species, side) pair keying meshes, feature matrices and results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceKey {
    pub species: Species,
    pub side: Side,
}

impl SurfaceKey {
    /// Every surface shipped with the mapper, in result order
    pub const ALL: [SurfaceKey; 4] = [
        SurfaceKey::new(Species::Human, Side::Left),
        SurfaceKey::new(Species::Human, Side::Right),
        SurfaceKey::new(Species::Macaque, Side::Left),
        SurfaceKey::new(Species::Macaque, Side::Right),
    ];

    pub const fn new(species: Species, side: Side) -> Self {
        Self { species, side }
    }

    /// Parse separate species and side strings
    pub fn parse(species: &str, side: &str) -> CsmResult<Self> {
        Ok(Self::new(species.parse()?, side.parse()?))
    }

    /// Substitute `{species}` and `{side}` in a file name template
    pub fn render_template(&self, template: &str) -> String {
        template
            .replace("{species}", self.species.as_str())
            .replace("{side}", self.side.as_str())
    }
}

impl fmt::Display for SurfaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.species, self.side)
    }
}

impl FromStr for SurfaceKey {
    type Err = CsmError;

    fn from_str(s: &str) -> CsmResult<Self> {
        match s.split_once('_') {
            Some((species, side)) => Self::parse(species, side),
            None => Err(CsmError::validation(
                "surface",
                s,
                "a name of the form {species}_{side}",
            )),
        }
    }
}

impl Serialize for SurfaceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SurfaceKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
