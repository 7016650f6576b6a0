/// Number of photometric bands per stamp (u, g, r, i, z).
pub const BAND_COUNT: usize = 5;

/// Number of Gaussian components in the instrument PSF model.
pub const PSF_COMPONENT_COUNT: usize = 3;

/// Floor applied to every catalog flux so no band carries a non-physical value.
pub const FLUX_FLOOR: f64 = 1e-6;

/// Minimum effective radius in arcseconds before conversion to pixels.
pub const MIN_RADIUS_ARCSEC: f64 = 1.0 / 30.0;

/// Detector plate scale in arcseconds per pixel.
pub const ARCSEC_PER_PIXEL: f64 = 0.396;

/// `frac_dev` strictly above this selects the de Vaucouleurs shape triple.
pub const DEV_PROFILE_THRESHOLD: f64 = 0.5;

/// Largest active-source working set handed to the inference engine.
pub const MAX_ACTIVE_SOURCES: usize = 3;

/// Stamp used by the bundled fixtures.
pub const SAMPLE_STAMP_ID: &str = "164.4311-39.0359_2kpsf";

/// Canvas (height, width) for the single-source fixtures.
pub const SMALL_CANVAS: (usize, usize) = (20, 23);

/// Canvas (height, width) for the three-body fixture.
pub const THREE_BODY_CANVAS: (usize, usize) = (112, 238);

/// Canvas (height, width) for the randomly placed N-body fixture.
pub const N_BODY_CANVAS: (usize, usize) = (900, 1000);

/// Per-band fluxes of the canonical sample star.
pub const SAMPLE_STAR_FLUXES: [f64; BAND_COUNT] =
    [4.451805e3, 1.491065e3, 2.264545e3, 2.027004e3, 1.846822e4];

/// Sample galaxies are this many times brighter than the sample star.
pub const SAMPLE_GALAXY_FLUX_SCALE: f64 = 100.0;

/// Band index whose flux seeds the brightness of the initial guess (r).
pub const REFERENCE_BAND: usize = 2;

/// Number of adjacent-band colours (log flux ratios).
pub const COLOR_COUNT: usize = BAND_COUNT - 1;
