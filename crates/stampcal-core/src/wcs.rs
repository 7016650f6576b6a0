//! Coordinate-map seam.
//!
//! Pixel-to-world projection is owned by an external WCS library. This crate
//! only needs the two operations below, so they are modelled as traits and
//! the images carry an opaque `Arc<dyn CoordinateMap>`.
//!
//! Two stand-ins ship with the crate: [`IdentityMap`] for synthetic canvases
//! whose "world" coordinates are pixel coordinates, and
//! [`LinearCoordinateMap`], an affine CRPIX/CRVAL/CD mapping read from the
//! header cards. Neither performs a sky projection.

use std::fmt::Debug;
use std::sync::Arc;

use crate::error::Result;
use crate::io::header::HeaderMap;

/// Pixel-to-world transform attached to an image.
pub trait CoordinateMap: Send + Sync + Debug {
    fn pix_to_world(&self, pixel: [f64; 2]) -> [f64; 2];

    /// Transform a batch of pixel coordinates, preserving order.
    fn pix_to_world_batch(&self, pixels: &[[f64; 2]]) -> Vec<[f64; 2]> {
        pixels.iter().map(|&p| self.pix_to_world(p)).collect()
    }
}

/// Builds a coordinate map from the raw header text of a stamp.
pub trait WcsProvider: Send + Sync {
    fn from_header(&self, header_text: &str) -> Result<Arc<dyn CoordinateMap>>;
}

/// World coordinates equal pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IdentityMap;

impl CoordinateMap for IdentityMap {
    fn pix_to_world(&self, pixel: [f64; 2]) -> [f64; 2] {
        pixel
    }
}

/// `world = crval + cd * (pixel - crpix)`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearCoordinateMap {
    pub crpix: [f64; 2],
    pub crval: [f64; 2],
    pub cd: [[f64; 2]; 2],
}

impl LinearCoordinateMap {
    /// Read `CRPIX1/2`, `CRVAL1/2` and `CD1_1..CD2_2`. Missing CD terms
    /// default to the identity; missing reference terms are an error.
    pub fn from_header_map(header: &HeaderMap) -> Result<Self> {
        let cd_or = |key: &str, default: f64| -> Result<f64> {
            if header.contains(key) {
                header.get_f64(key)
            } else {
                Ok(default)
            }
        };
        Ok(Self {
            crpix: [header.get_f64("CRPIX1")?, header.get_f64("CRPIX2")?],
            crval: [header.get_f64("CRVAL1")?, header.get_f64("CRVAL2")?],
            cd: [
                [cd_or("CD1_1", 1.0)?, cd_or("CD1_2", 0.0)?],
                [cd_or("CD2_1", 0.0)?, cd_or("CD2_2", 1.0)?],
            ],
        })
    }
}

impl CoordinateMap for LinearCoordinateMap {
    fn pix_to_world(&self, pixel: [f64; 2]) -> [f64; 2] {
        let dx = pixel[0] - self.crpix[0];
        let dy = pixel[1] - self.crpix[1];
        [
            self.crval[0] + self.cd[0][0] * dx + self.cd[0][1] * dy,
            self.crval[1] + self.cd[1][0] * dx + self.cd[1][1] * dy,
        ]
    }
}

/// Parses the header text and builds a [`LinearCoordinateMap`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearWcsProvider;

impl WcsProvider for LinearWcsProvider {
    fn from_header(&self, header_text: &str) -> Result<Arc<dyn CoordinateMap>> {
        let header = HeaderMap::parse(header_text)?;
        Ok(Arc::new(LinearCoordinateMap::from_header_map(&header)?))
    }
}
