use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use stampcal_core::calibrate::load_stamp_blob;
use stampcal_core::catalog::{normalize_catalog, CatalogEntry};
use stampcal_core::error::Result as CoreResult;
use stampcal_core::io::catalog::load_catalog;
use stampcal_core::io::stamp::StampDirectory;
use stampcal_core::wcs::LinearWcsProvider;
use tracing::{info, warn};

use super::StampArgs;

#[derive(Args)]
pub struct CatalogArgs {
    #[command(flatten)]
    pub stamp: StampArgs,

    /// Catalog angles already use the engine's sign convention
    #[arg(long)]
    pub angles_match_target: bool,

    /// Keep rows from every exposure, not just the stamp's
    #[arg(long)]
    pub all_fields: bool,

    /// Fail on the first malformed row instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Write entries to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Serialize)]
struct CatalogDocument {
    stamp_id: String,
    entries: Vec<CatalogEntry>,
}

pub fn run(args: &CatalogArgs) -> Result<()> {
    let config = args.stamp.resolve()?;
    let angles_match_target = args.angles_match_target || config.catalog.angles_match_target;

    let mut raw = load_catalog(&config.stamp_dir, &config.stamp_id)
        .with_context(|| format!("Failed to read catalog for {}", config.stamp_id))?;

    if config.catalog.filter_by_provenance && !args.all_fields {
        let source = StampDirectory::new(&config.stamp_dir);
        let blob = load_stamp_blob(&source, &LinearWcsProvider, &config.stamp_id)
            .with_context(|| format!("Failed to calibrate stamp {}", config.stamp_id))?;
        raw = raw.matching_provenance(&blob)?;
    }

    let pb = ProgressBar::new(raw.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Normalizing rows");

    let results = normalize_catalog(&raw, angles_match_target);
    let (entries, skipped) = match collect_entries(results, args.strict, &pb) {
        Ok(collected) => collected,
        Err(e) => {
            pb.abandon();
            return Err(e.into());
        }
    };
    pb.finish_with_message("Normalized");

    info!(kept = entries.len(), skipped, "Catalog normalized");
    if skipped > 0 {
        eprintln!("Skipped {} malformed row(s)", skipped);
    }

    let document = CatalogDocument {
        stamp_id: config.stamp_id.clone(),
        entries,
    };
    let toml_str = toml::to_string_pretty(&document)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write catalog to {}", path.display()))?;
        println!(
            "{} entries saved to {}",
            document.entries.len(),
            path.display()
        );
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}

/// Split per-row results into kept entries and a skip count, advancing `pb`
/// once per row. In strict mode the first failed row is returned instead.
fn collect_entries(
    results: Vec<CoreResult<CatalogEntry>>,
    strict: bool,
    pb: &ProgressBar,
) -> CoreResult<(Vec<CatalogEntry>, usize)> {
    let mut entries = Vec::with_capacity(results.len());
    let mut skipped = 0usize;
    for result in results {
        match result {
            Ok(entry) => entries.push(entry),
            Err(e) if strict => return Err(e),
            Err(e) => {
                warn!("{e}");
                skipped += 1;
            }
        }
        pb.inc(1);
    }
    Ok((entries, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stampcal_core::dataset::sample_ce;
    use stampcal_core::error::StampcalError;

    fn mixed_results() -> Vec<CoreResult<CatalogEntry>> {
        vec![
            Ok(sample_ce([1.0, 2.0], true)),
            Err(StampcalError::MissingField("ra".into()).in_row(1)),
            Ok(sample_ce([3.0, 4.0], false)),
        ]
    }

    #[test]
    fn test_lenient_skips_failed_rows() {
        let pb = ProgressBar::hidden();
        pb.set_length(3);
        let (entries, skipped) = collect_entries(mixed_results(), false, &pb).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].pos, [3.0, 4.0]);
        assert_eq!(skipped, 1);
        assert_eq!(pb.position(), 3);
    }

    #[test]
    fn test_strict_returns_first_failure() {
        let pb = ProgressBar::hidden();
        let err = collect_entries(mixed_results(), true, &pb).unwrap_err();
        assert!(matches!(err, StampcalError::Row { row: 1, .. }));
        assert_eq!(pb.position(), 1);
    }
}
