pub mod calibrate;
pub mod catalog;
pub mod config;
pub mod info;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use stampcal_core::dataset::config::FixtureConfig;

/// Where to find a stamp: either a fixture config file or a directory + id.
#[derive(Args)]
pub struct StampArgs {
    /// Directory holding the stamp and catalog files
    pub dir: Option<PathBuf>,

    /// Stamp identifier (defaults to the bundled sample id)
    #[arg(long)]
    pub id: Option<String>,

    /// Read directory and id from a fixture config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl StampArgs {
    /// Command-line values override whatever the config file says.
    pub fn resolve(&self) -> Result<FixtureConfig> {
        let mut config = match &self.config {
            Some(path) => FixtureConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => match &self.dir {
                Some(_) => FixtureConfig::default(),
                None => bail!("Either a stamp directory or --config is required"),
            },
        };
        if let Some(ref dir) = self.dir {
            config.stamp_dir = dir.clone();
        }
        if let Some(ref id) = self.id {
            config.stamp_id = id.clone();
        }
        Ok(config)
    }
}
