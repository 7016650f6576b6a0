use serde::{Deserialize, Serialize};

use crate::consts::BAND_COUNT;

/// Canonical source record consumed by the inference engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// World position (ra, dec), or canvas units for synthetic scenes.
    pub pos: [f64; 2],
    pub is_star: bool,
    pub star_fluxes: [f64; BAND_COUNT],
    pub gal_fluxes: [f64; BAND_COUNT],
    /// Fraction of galaxy light in the de Vaucouleurs profile.
    pub gal_frac_dev: f64,
    /// Minor/major axis ratio, in (0, 1].
    pub gal_ab: f64,
    /// Position angle in radians, in [0, pi).
    pub gal_angle: f64,
    /// Effective radius in pixels.
    pub gal_scale: f64,
    pub objid: String,
    pub thing_id: i64,
}

/// Shape parameters of a galaxy light profile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GalaxyShape {
    pub frac_dev: f64,
    pub axis_ratio: f64,
    pub angle: f64,
    pub radius: f64,
}

/// Star/galaxy view of an entry: stars carry fluxes only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SourceProfile<'a> {
    Star {
        fluxes: &'a [f64; BAND_COUNT],
    },
    Galaxy {
        fluxes: &'a [f64; BAND_COUNT],
        shape: GalaxyShape,
    },
}

impl CatalogEntry {
    pub fn shape(&self) -> GalaxyShape {
        GalaxyShape {
            frac_dev: self.gal_frac_dev,
            axis_ratio: self.gal_ab,
            angle: self.gal_angle,
            radius: self.gal_scale,
        }
    }

    pub fn profile(&self) -> SourceProfile<'_> {
        if self.is_star {
            SourceProfile::Star {
                fluxes: &self.star_fluxes,
            }
        } else {
            SourceProfile::Galaxy {
                fluxes: &self.gal_fluxes,
                shape: self.shape(),
            }
        }
    }
}
