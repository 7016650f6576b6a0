//! Initial per-source guess handed to the inference engine.
//!
//! Slots are named rather than packed; mapping them onto the engine's flat
//! parameter vector is the engine's business. Index 0 of every per-type pair
//! is the star, index 1 the galaxy.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;
use crate::consts::{BAND_COUNT, COLOR_COUNT, REFERENCE_BAND};

/// Lower brightness bound before taking the log.
const MIN_INIT_FLUX: f64 = 0.1;
/// Initial variances for brightness and colour.
const INIT_VARIANCE: f64 = 1e-4;
/// Clamp for probabilities fed to logit-parameterized slots.
const PROB_CLAMP: (f64, f64) = (0.015, 0.985);
/// Smallest initial galaxy scale, in pixels.
const MIN_INIT_SCALE: f64 = 0.2;
/// Axis ratio and scale used for sources flagged as stars.
const STAR_AXIS: f64 = 0.8;
const STAR_SCALE: f64 = 0.2;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SourceParams {
    /// Prior type probabilities [star, galaxy].
    pub a: [f64; 2],
    /// Position.
    pub u: [f64; 2],
    /// Log reference-band brightness mean per type.
    pub r1: [f64; 2],
    /// Log reference-band brightness variance per type.
    pub r2: [f64; 2],
    /// Colour means per type.
    pub c1: [[f64; COLOR_COUNT]; 2],
    /// Colour variances per type.
    pub c2: [[f64; COLOR_COUNT]; 2],
    pub e_dev: f64,
    pub e_axis: f64,
    pub e_angle: f64,
    pub e_scale: f64,
}

/// Log ratios of adjacent-band fluxes.
pub fn colors(fluxes: &[f64; BAND_COUNT]) -> [f64; COLOR_COUNT] {
    std::array::from_fn(|b| (fluxes[b + 1] / fluxes[b]).ln())
}

/// Encode a catalog entry as an initial guess.
pub fn init_source(entry: &CatalogEntry) -> SourceParams {
    let clamp = |v: f64| v.clamp(PROB_CLAMP.0, PROB_CLAMP.1);
    SourceParams {
        a: if entry.is_star { [0.8, 0.2] } else { [0.2, 0.8] },
        u: entry.pos,
        r1: [
            entry.star_fluxes[REFERENCE_BAND].max(MIN_INIT_FLUX).ln(),
            entry.gal_fluxes[REFERENCE_BAND].max(MIN_INIT_FLUX).ln(),
        ],
        r2: [INIT_VARIANCE; 2],
        c1: [colors(&entry.star_fluxes), colors(&entry.gal_fluxes)],
        c2: [[INIT_VARIANCE; COLOR_COUNT]; 2],
        e_dev: clamp(entry.gal_frac_dev),
        e_axis: if entry.is_star { STAR_AXIS } else { clamp(entry.gal_ab) },
        e_angle: entry.gal_angle,
        e_scale: if entry.is_star {
            STAR_SCALE
        } else {
            entry.gal_scale.max(MIN_INIT_SCALE)
        },
    }
}

/// Move a guess off ground truth by fixed offsets so derivative tests see
/// non-zero gradients. Deterministic; applied once per source.
pub fn perturb_params(params: &mut SourceParams) {
    params.a = [0.4, 0.6];
    params.u[0] += 0.8;
    params.u[1] -= 0.7;
    for r1 in &mut params.r1 {
        *r1 -= 10f64.ln();
    }
    for r2 in &mut params.r2 {
        *r2 *= 25.0;
    }
    params.e_dev += 0.05;
    params.e_axis += 0.05;
    params.e_angle += PI / 10.0;
    params.e_scale *= 1.2;
    for c1 in params.c1.iter_mut().flatten() {
        *c1 += 0.5;
    }
    for c2 in params.c2.iter_mut().flatten() {
        *c2 = 0.1;
    }
}
