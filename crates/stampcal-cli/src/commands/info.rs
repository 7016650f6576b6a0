use anyhow::{Context, Result};
use clap::Args;
use stampcal_core::calibrate::Calibration;
use stampcal_core::image::Band;
use stampcal_core::io::stamp::{RawStampSource, StampDirectory};

use super::StampArgs;

#[derive(Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub stamp: StampArgs,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let config = args.stamp.resolve()?;
    let source = StampDirectory::new(&config.stamp_dir);

    println!("Directory:   {}", config.stamp_dir.display());
    println!("Stamp:       {}", config.stamp_id);

    for band in Band::ALL {
        let raw = source
            .open(band, &config.stamp_id)
            .with_context(|| format!("Failed to read band {band}"))?;
        let (h, w) = raw.pixels.dim();
        println!();
        println!("Band {band}");
        println!("  Dimensions:  {}x{}", w, h);
        println!("  Cards:       {}", raw.header.len());

        match Calibration::from_header(&raw.header) {
            Ok(cal) => {
                println!("  CALIB:       {}", cal.calib);
                println!("  SKY:         {}", cal.sky);
                println!("  GAIN:        {}", cal.gain);
            }
            Err(e) => println!("  Calibration: {e}"),
        }

        for key in ["RUN", "CAMCOL", "FIELD"] {
            if let Some(value) = raw.header.get(key) {
                println!("  {:<12} {}", format!("{key}:"), value);
            }
        }

        let (min, max) = raw
            .pixels
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        println!("  Raw range:   [{:.4}, {:.4}]", min, max);
    }

    Ok(())
}
