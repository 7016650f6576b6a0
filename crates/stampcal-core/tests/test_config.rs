use std::path::PathBuf;

use approx::assert_relative_eq;

use stampcal_core::catalog::CatalogEntry;
use stampcal_core::consts::SAMPLE_STAMP_ID;
use stampcal_core::dataset::config::{AssemblyConfig, CatalogConfig, FixtureConfig, NBodyConfig};
use stampcal_core::dataset::sample_ce;
use stampcal_core::error::StampcalError;

#[test]
fn test_defaults() {
    let cfg = FixtureConfig::default();
    assert_eq!(cfg.stamp_id, SAMPLE_STAMP_ID);
    assert!(!cfg.catalog.angles_match_target);
    assert!(cfg.catalog.filter_by_provenance);
    assert!(cfg.assembly.include_kl);
    assert!(cfg.assembly.perturb);
    assert_eq!(cfg.n_body.sources, 100);
    assert_eq!(cfg.n_body.seed, None);
}

#[test]
fn test_toml_round_trip() {
    let cfg = FixtureConfig {
        stamp_dir: PathBuf::from("/data/stamps"),
        stamp_id: "abc".into(),
        catalog: CatalogConfig {
            angles_match_target: true,
            filter_by_provenance: false,
        },
        assembly: AssemblyConfig {
            include_kl: false,
            perturb: false,
        },
        n_body: NBodyConfig {
            sources: 7,
            seed: Some(1234),
        },
    };
    let text = cfg.to_toml_string().unwrap();
    assert_eq!(FixtureConfig::from_toml_str(&text).unwrap(), cfg);
}

#[test]
fn test_minimal_toml_fills_defaults() {
    let cfg = FixtureConfig::from_toml_str("stamp_dir = \"dat\"\n").unwrap();
    assert_eq!(cfg, FixtureConfig::default());
}

#[test]
fn test_partial_section() {
    let cfg = FixtureConfig::from_toml_str("stamp_dir = \"dat\"\n[assembly]\nperturb = false\n").unwrap();
    assert!(!cfg.assembly.perturb);
    assert!(cfg.assembly.include_kl);
}

#[test]
fn test_n_body_section() {
    let text = "stamp_dir = \"dat\"\n[n_body]\nsources = 3\nseed = 5\n";
    let cfg = FixtureConfig::from_toml_str(text).unwrap();
    assert_eq!(cfg.n_body.sources, 3);
    assert_eq!(cfg.n_body.seed, Some(5));
    assert!(cfg.assembly.perturb);
}

#[test]
fn test_missing_stamp_dir_is_config_error() {
    let err = FixtureConfig::from_toml_str("stamp_id = \"x\"\n").unwrap_err();
    assert!(matches!(err, StampcalError::Config(_)));
}

#[test]
fn test_load_from_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("fixtures.toml");
    std::fs::write(&path, FixtureConfig::default().to_toml_string().unwrap()).unwrap();
    assert_eq!(FixtureConfig::load(&path).unwrap(), FixtureConfig::default());
}

#[test]
fn test_catalog_entry_serde_json() {
    let ce = sample_ce([10.1, 12.2], true);
    let json = serde_json::to_string(&ce).unwrap();
    assert!(json.contains("\"objid\":\"sample\""));
    let back: CatalogEntry = serde_json::from_str(&json).unwrap();
    assert_eq!(back.pos, ce.pos);
    assert_eq!(back.is_star, ce.is_star);
    assert_eq!(back.objid, ce.objid);
    for b in 0..5 {
        assert_relative_eq!(back.gal_fluxes[b], ce.gal_fluxes[b], max_relative = 1e-14);
    }
    assert_relative_eq!(back.gal_angle, ce.gal_angle, max_relative = 1e-14);
}
