use anyhow::{Context, Result};
use clap::Args;
use stampcal_core::calibrate::load_stamp_blob;
use stampcal_core::io::stamp::StampDirectory;
use stampcal_core::wcs::LinearWcsProvider;

use super::StampArgs;
use crate::summary::print_blob_summary;

#[derive(Args)]
pub struct CalibrateArgs {
    #[command(flatten)]
    pub stamp: StampArgs,
}

pub fn run(args: &CalibrateArgs) -> Result<()> {
    let config = args.stamp.resolve()?;
    let source = StampDirectory::new(&config.stamp_dir);

    let blob = load_stamp_blob(&source, &LinearWcsProvider, &config.stamp_id)
        .with_context(|| format!("Failed to calibrate stamp {}", config.stamp_id))?;

    print_blob_summary(&config.stamp_id, &blob);
    Ok(())
}
