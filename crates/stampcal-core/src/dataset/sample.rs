use std::f64::consts::FRAC_PI_4;

use crate::catalog::CatalogEntry;
use crate::consts::{SAMPLE_GALAXY_FLUX_SCALE, SAMPLE_STAR_FLUXES};

/// Fluxes of the sample galaxy: the sample star scaled up.
pub fn sample_galaxy_fluxes() -> [f64; 5] {
    SAMPLE_STAR_FLUXES.map(|f| f * SAMPLE_GALAXY_FLUX_SCALE)
}

/// The canonical hand-placed source used by the small fixtures.
pub fn sample_ce(pos: [f64; 2], is_star: bool) -> CatalogEntry {
    CatalogEntry {
        pos,
        is_star,
        star_fluxes: SAMPLE_STAR_FLUXES,
        gal_fluxes: sample_galaxy_fluxes(),
        gal_frac_dev: 0.1,
        gal_ab: 0.7,
        gal_angle: FRAC_PI_4,
        gal_scale: 4.0,
        objid: "sample".to_string(),
        thing_id: 0,
    }
}

pub fn sample_star_catalog() -> Vec<CatalogEntry> {
    vec![sample_ce([10.1, 12.2], true)]
}

pub fn sample_galaxy_catalog() -> Vec<CatalogEntry> {
    vec![sample_ce([8.5, 9.6], false)]
}

pub fn three_body_catalog() -> Vec<CatalogEntry> {
    vec![
        sample_ce([4.5, 3.6], false),
        sample_ce([60.1, 82.2], true),
        sample_ce([71.3, 100.4], false),
    ]
}

/// Star placed at `pos` for the N-body fixture; `index` is 0-based.
pub fn n_body_star(pos: [f64; 2], index: usize) -> CatalogEntry {
    CatalogEntry {
        pos,
        is_star: true,
        star_fluxes: SAMPLE_STAR_FLUXES,
        gal_fluxes: SAMPLE_STAR_FLUXES,
        gal_frac_dev: 0.1,
        gal_ab: 0.7,
        gal_angle: FRAC_PI_4,
        gal_scale: 4.0,
        objid: (index + 1).to_string(),
        thing_id: index as i64 + 1,
    }
}
