use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::SAMPLE_STAMP_ID;
use crate::error::{Result, StampcalError};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixtureConfig {
    /// Directory holding `stamp-<band>-<id>.{hdr,raw}` and `cat-<id>.csv`.
    pub stamp_dir: PathBuf,
    #[serde(default = "default_stamp_id")]
    pub stamp_id: String,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub assembly: AssemblyConfig,
    #[serde(default)]
    pub n_body: NBodyConfig,
}

fn default_stamp_id() -> String {
    SAMPLE_STAMP_ID.to_string()
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            stamp_dir: PathBuf::from("dat"),
            stamp_id: default_stamp_id(),
            catalog: CatalogConfig::default(),
            assembly: AssemblyConfig::default(),
            n_body: NBodyConfig::default(),
        }
    }
}

impl FixtureConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| StampcalError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| StampcalError::Config(e.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog position angles already use the engine's sign convention.
    pub angles_match_target: bool,
    /// Drop rows whose run/camcol/field match none of the stamp's bands.
    pub filter_by_provenance: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            angles_match_target: false,
            filter_by_provenance: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Pass the KL term flag through to the argument builder.
    pub include_kl: bool,
    /// Shift the initial guess off ground truth by the fixed offsets.
    pub perturb: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            include_kl: true,
            perturb: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NBodyConfig {
    pub sources: usize,
    /// Fixed seed for reproducible placement; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for NBodyConfig {
    fn default() -> Self {
        Self {
            sources: 100,
            seed: None,
        }
    }
}
