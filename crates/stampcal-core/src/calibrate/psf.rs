//! PSF mixture decoding.
//!
//! Each band header stores the 3-component Gaussian mixture as eighteen flat
//! scalars `PSF_P0..PSF_P17`. Their meaning is positional, so the mapping is
//! kept as a table with one row per component and decoded by a single
//! function.

use nalgebra::{Matrix2, Vector2};

use crate::consts::PSF_COMPONENT_COUNT;
use crate::error::{Result, StampcalError};
use crate::image::{Psf, PsfComponent};
use crate::io::header::HeaderMap;

/// Header keywords of one mixture component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PsfComponentFields {
    pub weight: &'static str,
    /// Sub-pixel centroid offset (x, y).
    pub mean: [&'static str; 2],
    /// Variance along x.
    pub var_x: &'static str,
    /// Variance along y.
    pub var_y: &'static str,
    /// Shared off-diagonal covariance.
    pub cov_xy: &'static str,
}

pub const PSF_FIELD_TABLE: [PsfComponentFields; PSF_COMPONENT_COUNT] = [
    PsfComponentFields {
        weight: "PSF_P0",
        mean: ["PSF_P3", "PSF_P4"],
        var_x: "PSF_P9",
        var_y: "PSF_P10",
        cov_xy: "PSF_P11",
    },
    PsfComponentFields {
        weight: "PSF_P1",
        mean: ["PSF_P5", "PSF_P6"],
        var_x: "PSF_P12",
        var_y: "PSF_P13",
        cov_xy: "PSF_P14",
    },
    PsfComponentFields {
        weight: "PSF_P2",
        mean: ["PSF_P7", "PSF_P8"],
        var_x: "PSF_P15",
        var_y: "PSF_P16",
        cov_xy: "PSF_P17",
    },
];

impl PsfComponentFields {
    pub fn decode(&self, header: &HeaderMap) -> Result<PsfComponent> {
        let weight = header.get_f64(self.weight)?;
        let mean = Vector2::new(header.get_f64(self.mean[0])?, header.get_f64(self.mean[1])?);
        let a = header.get_f64(self.var_x)?;
        let b = header.get_f64(self.var_y)?;
        let c = header.get_f64(self.cov_xy)?;
        let covariance = Matrix2::new(a, c, c, b);
        PsfComponent::new(weight, mean, covariance).map_err(|e| match e {
            StampcalError::MalformedValue { field, reason } if field == "psf covariance" => StampcalError::malformed(
                format!("{}/{}/{}", self.var_x, self.var_y, self.cov_xy),
                reason,
            ),
            other => other,
        })
    }
}

/// Decode the full mixture from a band header.
pub fn psf_from_header(header: &HeaderMap) -> Result<Psf> {
    let [first, second, third] = &PSF_FIELD_TABLE;
    Ok([
        first.decode(header)?,
        second.decode(header)?,
        third.decode(header)?,
    ])
}
