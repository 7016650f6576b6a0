use std::f64::consts::PI;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::consts::{
    ARCSEC_PER_PIXEL, BAND_COUNT, DEV_PROFILE_THRESHOLD, FLUX_FLOOR, MIN_RADIUS_ARCSEC,
};
use crate::error::{Result, StampcalError};
use crate::image::Band;
use crate::io::catalog::{CatalogRow, RawCatalog};

use super::entry::CatalogEntry;

/// Galaxy light profile whose shape columns describe a source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GalaxyProfile {
    DeVaucouleurs,
    Exponential,
}

impl GalaxyProfile {
    /// Majority profile for a given de Vaucouleurs fraction.
    pub fn dominant(frac_dev: f64) -> Self {
        if frac_dev > DEV_PROFILE_THRESHOLD {
            Self::DeVaucouleurs
        } else {
            Self::Exponential
        }
    }

    /// Catalog column suffix.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::DeVaucouleurs => "dev",
            Self::Exponential => "exp",
        }
    }
}

/// Shape columns of one profile, in catalog units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawShape {
    pub axis_ratio: f64,
    /// Position angle in degrees.
    pub phi_deg: f64,
    /// Effective radius in arcseconds.
    pub theta_arcsec: f64,
}

impl RawShape {
    fn from_row(row: &CatalogRow, profile: GalaxyProfile) -> Result<Self> {
        let suffix = profile.suffix();
        let ab_col = format!("ab_{suffix}");
        let axis_ratio = row.get_f64(&ab_col)?;
        if axis_ratio <= 0.0 || axis_ratio > 1.0 {
            return Err(StampcalError::malformed(
                ab_col,
                format!("axis ratio {axis_ratio} outside (0, 1]"),
            ));
        }
        Ok(Self {
            axis_ratio,
            phi_deg: row.get_f64(&format!("phi_{suffix}"))?,
            theta_arcsec: row.get_f64(&format!("theta_{suffix}"))?,
        })
    }
}

pub fn floor_flux(flux: f64) -> f64 {
    flux.max(FLUX_FLOOR)
}

/// Galaxy flux as the `frac_dev`-weighted blend of the two profile fluxes.
pub fn blend_flux(frac_dev: f64, dev_flux: f64, exp_flux: f64) -> f64 {
    frac_dev * floor_flux(dev_flux) + (1.0 - frac_dev) * floor_flux(exp_flux)
}

/// Catalog position angle (degrees) to radians from the reference axis,
/// wrapped into `[0, pi)`.
///
/// When `angles_match_target` is false the catalog uses the opposite sign
/// convention and the angle is negated first.
pub fn canonical_angle(phi_deg: f64, angles_match_target: bool) -> f64 {
    let phi = if angles_match_target { phi_deg } else { -phi_deg };
    let mut phi90 = 90.0 - phi;
    phi90 -= (phi90 / 180.0).floor() * 180.0;
    // a tiny negative phi90 can round up to exactly 180 above, and values
    // just below 180 can round up to pi in the conversion
    let angle = phi90.to_radians();
    if angle >= PI {
        angle - PI
    } else {
        angle
    }
}

/// Effective radius in arcseconds to pixels, floored at 1/30 arcsec.
pub fn effective_radius_pixels(theta_arcsec: f64) -> f64 {
    theta_arcsec.max(MIN_RADIUS_ARCSEC) / ARCSEC_PER_PIXEL
}

/// Normalize one raw catalog row. Errors carry the row index.
pub fn normalize_row(row: &CatalogRow, angles_match_target: bool) -> Result<CatalogEntry> {
    normalize_inner(row, angles_match_target).map_err(|e| e.in_row(row.index))
}

fn normalize_inner(row: &CatalogRow, angles_match_target: bool) -> Result<CatalogEntry> {
    let frac_dev = row.get_f64("frac_dev")?;
    if !(0.0..=1.0).contains(&frac_dev) {
        return Err(StampcalError::malformed(
            "frac_dev",
            format!("{frac_dev} outside [0, 1]"),
        ));
    }

    let mut star_fluxes = [0.0; BAND_COUNT];
    let mut gal_fluxes = [0.0; BAND_COUNT];
    for band in Band::ALL {
        let b = band.letter();
        star_fluxes[band.index()] = floor_flux(row.get_f64(&format!("psfflux_{b}"))?);
        gal_fluxes[band.index()] = blend_flux(
            frac_dev,
            row.get_f64(&format!("devflux_{b}"))?,
            row.get_f64(&format!("expflux_{b}"))?,
        );
    }

    let shape = RawShape::from_row(row, GalaxyProfile::dominant(frac_dev))?;

    let thing_id = match row.get_opt_str("thing_id") {
        Some(_) => row.get_f64("thing_id")?.round() as i64,
        None => 0,
    };
    let objid = row
        .get_opt_str("objid")
        .map(str::to_string)
        .unwrap_or_else(|| (row.index + 1).to_string());

    Ok(CatalogEntry {
        pos: [row.get_f64("ra")?, row.get_f64("dec")?],
        is_star: row.get_bool("is_star")?,
        star_fluxes,
        gal_fluxes,
        gal_frac_dev: frac_dev,
        gal_ab: shape.axis_ratio,
        gal_angle: canonical_angle(shape.phi_deg, angles_match_target),
        gal_scale: effective_radius_pixels(shape.theta_arcsec),
        objid,
        thing_id,
    })
}

/// Normalize every row independently; one bad row does not affect the others.
pub fn normalize_catalog(catalog: &RawCatalog, angles_match_target: bool) -> Vec<Result<CatalogEntry>> {
    let results: Vec<Result<CatalogEntry>> = catalog
        .rows
        .par_iter()
        .map(|row| normalize_row(row, angles_match_target))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        warn!(failed, total = results.len(), "Some catalog rows failed to normalize");
    }
    debug!(rows = results.len(), "Normalized catalog");
    results
}

/// Normalize every row, failing on the first bad one.
pub fn normalize_catalog_strict(
    catalog: &RawCatalog,
    angles_match_target: bool,
) -> Result<Vec<CatalogEntry>> {
    normalize_catalog(catalog, angles_match_target)
        .into_iter()
        .collect()
}
