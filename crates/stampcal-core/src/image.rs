use std::fmt;
use std::sync::Arc;

use nalgebra::{Matrix2, Vector2};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::consts::{BAND_COUNT, PSF_COMPONENT_COUNT};
use crate::error::{Result, StampcalError};
use crate::wcs::CoordinateMap;

/// Photometric band of a stamp, in instrument order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    U,
    G,
    R,
    I,
    Z,
}

impl Band {
    pub const ALL: [Band; BAND_COUNT] = [Band::U, Band::G, Band::R, Band::I, Band::Z];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Band> {
        Self::ALL.get(index).copied()
    }

    /// Lower-case letter used in file names and catalog columns.
    pub fn letter(self) -> char {
        match self {
            Self::U => 'u',
            Self::G => 'g',
            Self::R => 'r',
            Self::I => 'i',
            Self::Z => 'z',
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// (run, camcol, field) of the exposure a stamp was cut from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Provenance {
    pub run: i64,
    pub camcol: i64,
    pub field: i64,
}

/// One Gaussian term of the PSF mixture.
#[derive(Clone, Debug, PartialEq)]
pub struct PsfComponent {
    weight: f64,
    mean: Vector2<f64>,
    covariance: Matrix2<f64>,
}

impl PsfComponent {
    /// Rejects non-finite terms and covariances that are not symmetric
    /// positive-definite.
    pub fn new(weight: f64, mean: Vector2<f64>, covariance: Matrix2<f64>) -> Result<Self> {
        if !weight.is_finite() {
            return Err(StampcalError::malformed("psf weight", format!("{weight}")));
        }
        if !mean.iter().all(|v| v.is_finite()) {
            return Err(StampcalError::malformed("psf mean", format!("{mean:?}")));
        }
        if !covariance.iter().all(|v| v.is_finite()) {
            return Err(StampcalError::malformed(
                "psf covariance",
                "non-finite entry",
            ));
        }
        if covariance[(0, 1)] != covariance[(1, 0)] {
            return Err(StampcalError::malformed(
                "psf covariance",
                "matrix is not symmetric",
            ));
        }
        if covariance.cholesky().is_none() {
            return Err(StampcalError::malformed(
                "psf covariance",
                format!(
                    "not positive-definite: [[{}, {}], [{}, {}]]",
                    covariance[(0, 0)],
                    covariance[(0, 1)],
                    covariance[(1, 0)],
                    covariance[(1, 1)]
                ),
            ));
        }
        Ok(Self {
            weight,
            mean,
            covariance,
        })
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn mean(&self) -> &Vector2<f64> {
        &self.mean
    }

    pub fn covariance(&self) -> &Matrix2<f64> {
        &self.covariance
    }
}

/// PSF mixture; the component count is fixed by the instrument model.
pub type Psf = [PsfComponent; PSF_COMPONENT_COUNT];

/// Separable additive sky background.
#[derive(Clone, Debug, PartialEq)]
pub struct SkyIntensity {
    /// Background level per pixel, shape = (height, width)
    pub grid: Array2<f64>,
    /// 1-based row positions into `grid`
    pub row_lookup: Vec<f64>,
    /// 1-based column positions into `grid`
    pub col_lookup: Vec<f64>,
    /// Per-row multiplier applied to `grid`
    pub row_scale: Vec<f64>,
}

impl SkyIntensity {
    /// Constant background of `level` over an `h` x `w` grid.
    pub fn constant(level: f64, h: usize, w: usize) -> Self {
        Self {
            grid: Array2::from_elem((h, w), level),
            row_lookup: (1..=h).map(|r| r as f64).collect(),
            col_lookup: (1..=w).map(|c| c as f64).collect(),
            row_scale: vec![1.0; h],
        }
    }

    pub fn height(&self) -> usize {
        self.grid.nrows()
    }

    pub fn width(&self) -> usize {
        self.grid.ncols()
    }

    /// Background level at a 0-based pixel, `None` outside the grid.
    pub fn level_at(&self, row: usize, col: usize) -> Option<f64> {
        let level = self.grid.get([row, col])?;
        Some(level * self.row_scale.get(row)?)
    }
}

/// A calibrated single-band observation.
///
/// Height, width, coordinate map, sky and calibration vector can only be
/// changed together through [`Image::rebind`].
#[derive(Clone, Debug)]
pub struct Image {
    h: usize,
    w: usize,
    /// Photon counts, row-major, shape = (height, width)
    pub pixels: Array2<f64>,
    pub band: Band,
    coordinate_map: Arc<dyn CoordinateMap>,
    pub psf: Psf,
    pub provenance: Provenance,
    sky: SkyIntensity,
    calibration: Vec<f64>,
}

impl Image {
    pub fn new(
        pixels: Array2<f64>,
        band: Band,
        coordinate_map: Arc<dyn CoordinateMap>,
        psf: Psf,
        provenance: Provenance,
        sky: SkyIntensity,
        calibration: Vec<f64>,
    ) -> Result<Self> {
        let (h, w) = pixels.dim();
        if sky.grid.dim() != (h, w) {
            return Err(StampcalError::ShapeMismatch {
                declared_height: sky.height(),
                declared_width: sky.width(),
                actual_height: h,
                actual_width: w,
            });
        }
        if calibration.len() != h {
            return Err(StampcalError::malformed(
                "calibration",
                format!("expected {h} rows, got {}", calibration.len()),
            ));
        }
        Ok(Self {
            h,
            w,
            pixels,
            band,
            coordinate_map,
            psf,
            provenance,
            sky,
            calibration,
        })
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn coordinate_map(&self) -> &Arc<dyn CoordinateMap> {
        &self.coordinate_map
    }

    pub fn sky(&self) -> &SkyIntensity {
        &self.sky
    }

    /// Per-row photon-per-count factor (`iota`).
    pub fn calibration(&self) -> &[f64] {
        &self.calibration
    }

    /// True when the pixel array still matches the declared size.
    pub fn pixels_match_size(&self) -> bool {
        self.pixels.dim() == (self.h, self.w)
    }

    /// Retarget the image to an `h` x `w` canvas.
    ///
    /// The sky becomes a constant grid of the previous level at the origin,
    /// the calibration vector a constant vector of its previous first entry.
    /// Pixels are left untouched; whoever rebinds owns regenerating them.
    pub fn rebind(&mut self, h: usize, w: usize, coordinate_map: Option<Arc<dyn CoordinateMap>>) {
        let sky_level = self.sky.grid.first().copied().unwrap_or(0.0);
        let iota = self.calibration.first().copied().unwrap_or(0.0);
        self.h = h;
        self.w = w;
        self.sky = SkyIntensity::constant(sky_level, h, w);
        self.calibration = vec![iota; h];
        if let Some(map) = coordinate_map {
            self.coordinate_map = map;
        }
    }
}
