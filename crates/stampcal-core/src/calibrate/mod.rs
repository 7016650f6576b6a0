pub mod psf;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::consts::BAND_COUNT;
use crate::error::{Result, StampcalError};
use crate::image::{Band, Image, Provenance, SkyIntensity};
use crate::io::header::HeaderMap;
use crate::io::stamp::{RawStamp, RawStampSource};
use crate::wcs::WcsProvider;

pub use psf::{psf_from_header, PsfComponentFields, PSF_FIELD_TABLE};

/// All five bands of one stamp, in [`Band::ALL`] order.
pub type StampBlob = [Image; BAND_COUNT];

/// Scalar calibration constants read from a band header.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    /// Raw pixel units per detector count.
    pub calib: f64,
    /// Sky level in detector counts.
    pub sky: f64,
    /// Photons per count.
    pub gain: f64,
}

impl Calibration {
    pub fn from_header(header: &HeaderMap) -> Result<Self> {
        let calib = header.get_f64("CALIB")?;
        let sky = header.get_f64("SKY")?;
        let gain = header.get_f64("GAIN")?;
        if calib <= 0.0 {
            return Err(StampcalError::malformed("CALIB", format!("must be positive, got {calib}")));
        }
        if gain <= 0.0 {
            return Err(StampcalError::malformed("GAIN", format!("must be positive, got {gain}")));
        }
        Ok(Self { calib, sky, gain })
    }

    /// Photons per raw pixel unit, handed to the inference engine.
    pub fn iota(&self) -> f64 {
        self.gain / self.calib
    }

    /// Sky level in raw pixel units.
    pub fn epsilon(&self) -> f64 {
        self.sky * self.calib
    }

    /// `round((raw / CALIB + SKY) * GAIN)`.
    pub fn photons(&self, raw: f32) -> f64 {
        let dn = raw as f64 / self.calib + self.sky;
        (dn * self.gain).round()
    }
}

/// Turn one raw band stamp into a calibrated [`Image`].
///
/// Errors carry the band and stamp id. Nothing is returned on failure.
pub fn calibrate_stamp(raw: &RawStamp, wcs: &dyn WcsProvider) -> Result<Image> {
    calibrate_inner(raw, wcs).map_err(|e| match e {
        e @ StampcalError::Band { .. } => e,
        e => e.in_band(raw.band, &raw.stamp_id),
    })
}

fn calibrate_inner(raw: &RawStamp, wcs: &dyn WcsProvider) -> Result<Image> {
    let header = &raw.header;
    let (h, w) = raw.pixels.dim();
    check_declared_shape(header, h, w)?;

    let cal = Calibration::from_header(header)?;
    let psf = psf_from_header(header)?;
    let provenance = Provenance {
        run: header.get_rounded("RUN")?,
        camcol: header.get_rounded("CAMCOL")?,
        field: header.get_rounded("FIELD")?,
    };
    let coordinate_map = wcs.from_header(&raw.header_text)?;

    let pixels = raw.pixels.mapv(|v| cal.photons(v));
    let negative = pixels.iter().filter(|&&v| v < 0.0).count();
    if negative > 0 {
        warn!(
            band = %raw.band,
            stamp_id = %raw.stamp_id,
            negative,
            "Calibrated stamp has negative photon counts"
        );
    }

    debug!(
        band = %raw.band,
        iota = cal.iota(),
        epsilon = cal.epsilon(),
        "Calibrated band"
    );

    Image::new(
        pixels,
        raw.band,
        coordinate_map,
        psf,
        provenance,
        SkyIntensity::constant(cal.epsilon(), h, w),
        vec![cal.iota(); h],
    )
}

fn check_declared_shape(header: &HeaderMap, h: usize, w: usize) -> Result<()> {
    let declared_w = if header.contains("NAXIS1") {
        header.get_usize("NAXIS1")?
    } else {
        w
    };
    let declared_h = if header.contains("NAXIS2") {
        header.get_usize("NAXIS2")?
    } else {
        h
    };
    if (declared_h, declared_w) != (h, w) {
        return Err(StampcalError::ShapeMismatch {
            declared_height: declared_h,
            declared_width: declared_w,
            actual_height: h,
            actual_width: w,
        });
    }
    Ok(())
}

/// Read and calibrate all five bands of `stamp_id`.
///
/// Bands are processed in parallel; the first failing band aborts the load.
pub fn load_stamp_blob(
    source: &dyn RawStampSource,
    wcs: &dyn WcsProvider,
    stamp_id: &str,
) -> Result<StampBlob> {
    let images: Vec<Image> = Band::ALL
        .par_iter()
        .map(|&band| {
            let raw = source.open(band, stamp_id)?;
            calibrate_stamp(&raw, wcs)
        })
        .collect::<Result<_>>()?;

    info!(stamp_id, bands = images.len(), "Loaded stamp blob");
    images.try_into().map_err(|v: Vec<Image>| {
        StampcalError::malformed("stamp", format!("expected {BAND_COUNT} bands, got {}", v.len()))
    })
}
