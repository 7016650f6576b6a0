#![allow(dead_code)]

use ndarray::Array2;

use stampcal_core::catalog::CatalogEntry;
use stampcal_core::dataset::{ArgsBuilder, SceneCompositor};
use stampcal_core::error::Result;
use stampcal_core::image::{Band, Image};
use stampcal_core::io::catalog::CatalogRow;
use stampcal_core::io::header::{HeaderMap, HeaderValue};
use stampcal_core::io::stamp::{RawStamp, StampDirectory};
use stampcal_core::io::stamp_writer::write_stamp;

pub const STAMP_ID: &str = "164.4311-39.0359_2kpsf";

/// (var_x, var_y, cov_xy) per PSF component used by `band_header`.
pub const PSF_COVARIANCES: [(f64, f64, f64); 3] =
    [(1.5, 1.2, 0.1), (4.0, 3.5, -0.3), (20.0, 18.0, 2.0)];
pub const PSF_WEIGHTS: [f64; 3] = [0.6, 0.3, 0.1];
pub const PSF_MEANS: [(f64, f64); 3] = [(0.1, -0.2), (0.3, 0.4), (-0.5, 0.6)];

/// A complete, valid band header (without NAXIS keys).
pub fn band_header() -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert("CALIB", HeaderValue::Float(0.01));
    h.insert("SKY", HeaderValue::Float(100.0));
    h.insert("GAIN", HeaderValue::Float(4.0));
    h.insert("RUN", HeaderValue::Float(3900.2));
    h.insert("CAMCOL", HeaderValue::Float(5.8));
    h.insert("FIELD", HeaderValue::Int(269));
    h.insert("CRPIX1", HeaderValue::Float(1.0));
    h.insert("CRPIX2", HeaderValue::Float(1.0));
    h.insert("CRVAL1", HeaderValue::Float(164.4311));
    h.insert("CRVAL2", HeaderValue::Float(39.0359));
    h.insert("CD1_1", HeaderValue::Float(1e-4));
    h.insert("CD2_2", HeaderValue::Float(1e-4));

    for k in 0..3 {
        h.insert(format!("PSF_P{k}"), HeaderValue::Float(PSF_WEIGHTS[k]));
        h.insert(format!("PSF_P{}", 3 + 2 * k), HeaderValue::Float(PSF_MEANS[k].0));
        h.insert(format!("PSF_P{}", 4 + 2 * k), HeaderValue::Float(PSF_MEANS[k].1));
        let (a, b, c) = PSF_COVARIANCES[k];
        h.insert(format!("PSF_P{}", 9 + 3 * k), HeaderValue::Float(a));
        h.insert(format!("PSF_P{}", 10 + 3 * k), HeaderValue::Float(b));
        h.insert(format!("PSF_P{}", 11 + 3 * k), HeaderValue::Float(c));
    }
    h
}

/// Raw stamp with a gentle gradient in the pixel values.
pub fn raw_stamp(band: Band, height: usize, width: usize) -> RawStamp {
    let header = band_header();
    let pixels = Array2::from_shape_fn((height, width), |(r, c)| (r * width + c) as f32 * 0.01);
    RawStamp {
        band,
        stamp_id: STAMP_ID.to_string(),
        pixels,
        header_text: header.to_card_text().expect("render header"),
        header,
    }
}

/// Write all five bands of a stamp into a fresh temp directory.
pub fn write_stamp_dir(height: usize, width: usize) -> (tempfile::TempDir, StampDirectory) {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let dir = StampDirectory::new(tmp.path());
    for band in Band::ALL {
        let raw = raw_stamp(band, height, width);
        write_stamp(&dir, band, STAMP_ID, &raw.header, &raw.pixels).expect("write stamp");
    }
    (tmp, dir)
}

/// A catalog row with every column the normalizer needs.
pub fn full_row(index: usize) -> CatalogRow {
    let mut row = CatalogRow::from_pairs(
        index,
        [
            ("ra", 164.43),
            ("dec", 39.03),
            ("frac_dev", 0.3),
            ("ab_dev", 0.4),
            ("ab_exp", 0.6),
            ("phi_dev", 30.0),
            ("phi_exp", 45.0),
            ("theta_dev", 2.0),
            ("theta_exp", 4.0),
        ],
    );
    row.set("is_star", "0");
    for (b, band) in Band::ALL.iter().enumerate() {
        let l = band.letter();
        row.set(format!("psfflux_{l}"), 10.0 + b as f64);
        row.set(format!("devflux_{l}"), 20.0 + b as f64);
        row.set(format!("expflux_{l}"), 30.0 + b as f64);
    }
    row
}

/// Fills each image with a flat canvas of its declared size.
pub struct FlatCompositor;

impl SceneCompositor for FlatCompositor {
    fn gen_blob(&self, images: Vec<Image>, catalog: &[CatalogEntry]) -> Result<Vec<Image>> {
        Ok(images
            .into_iter()
            .map(|mut img| {
                let level = img.sky().level_at(0, 0).unwrap_or(0.0) + catalog.len() as f64;
                img.pixels = Array2::from_elem((img.height(), img.width()), level);
                img
            })
            .collect())
    }
}

/// Returns images untouched, which breaks the size contract after a rebind.
pub struct PassthroughCompositor;

impl SceneCompositor for PassthroughCompositor {
    fn gen_blob(&self, images: Vec<Image>, _catalog: &[CatalogEntry]) -> Result<Vec<Image>> {
        Ok(images)
    }
}

#[derive(Debug)]
pub struct RecordedArgs {
    pub images: Vec<Image>,
    pub catalog_len: usize,
    pub active_sources: Vec<usize>,
    pub include_kl: bool,
}

pub struct RecordingBuilder;

impl ArgsBuilder for RecordingBuilder {
    type Args = RecordedArgs;

    fn build(
        &self,
        images: Vec<Image>,
        catalog: &[CatalogEntry],
        active_sources: &[usize],
        include_kl: bool,
    ) -> Result<RecordedArgs> {
        Ok(RecordedArgs {
            images,
            catalog_len: catalog.len(),
            active_sources: active_sources.to_vec(),
            include_kl,
        })
    }
}
