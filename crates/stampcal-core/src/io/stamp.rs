use std::fs::File;
use std::path::{Path, PathBuf};

use byteorder::{ByteOrder, LittleEndian};
use memmap2::Mmap;
use ndarray::Array2;
use tracing::debug;

use crate::error::{Result, StampcalError};
use crate::image::Band;
use crate::io::header::HeaderMap;

/// Bytes per stored pixel (little-endian `f32`).
pub const PIXEL_BYTES: usize = 4;

/// One band of a stamp as read from disk, before calibration.
#[derive(Clone, Debug)]
pub struct RawStamp {
    pub band: Band,
    pub stamp_id: String,
    /// Detector counts, shape = (NAXIS2, NAXIS1)
    pub pixels: Array2<f32>,
    pub header: HeaderMap,
    /// Header cards exactly as stored, for the coordinate-map parser.
    pub header_text: String,
}

/// Anything that can hand out raw stamps by band and stamp id.
pub trait RawStampSource: Send + Sync {
    fn open(&self, band: Band, stamp_id: &str) -> Result<RawStamp>;
}

/// Stamps laid out as `stamp-<band>-<id>.hdr` + `stamp-<band>-<id>.raw`.
#[derive(Clone, Debug)]
pub struct StampDirectory {
    root: PathBuf,
}

impl StampDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn header_path(&self, band: Band, stamp_id: &str) -> PathBuf {
        self.root.join(format!("stamp-{band}-{stamp_id}.hdr"))
    }

    pub fn pixel_path(&self, band: Band, stamp_id: &str) -> PathBuf {
        self.root.join(format!("stamp-{band}-{stamp_id}.raw"))
    }
}

impl RawStampSource for StampDirectory {
    fn open(&self, band: Band, stamp_id: &str) -> Result<RawStamp> {
        let read = || -> Result<RawStamp> {
            let header_text = std::fs::read_to_string(self.header_path(band, stamp_id))?;
            let header = HeaderMap::parse(&header_text)?;
            let width = header.get_usize("NAXIS1")?;
            let height = header.get_usize("NAXIS2")?;
            let pixels = read_pixels(&self.pixel_path(band, stamp_id), height, width)?;
            debug!(%band, stamp_id, height, width, "Read raw stamp");
            Ok(RawStamp {
                band,
                stamp_id: stamp_id.to_string(),
                pixels,
                header,
                header_text,
            })
        };
        read().map_err(|e| e.in_band(band, stamp_id))
    }
}

/// Memory-map a raw pixel file and decode it as `height` x `width` floats.
pub fn read_pixels(path: &Path, height: usize, width: usize) -> Result<Array2<f32>> {
    if height == 0 || width == 0 {
        return Err(StampcalError::malformed(
            "NAXIS",
            format!("empty image {width}x{height}"),
        ));
    }

    let sizes = height
        .checked_mul(width)
        .and_then(|n| Some((n, n.checked_mul(PIXEL_BYTES)?)));
    let Some((pixel_count, total_bytes)) = sizes else {
        return Err(StampcalError::malformed(
            "NAXIS",
            format!("image size {width}x{height} overflows"),
        ));
    };
    // width <= pixel_count, so this cannot overflow once total_bytes fits
    let row_bytes = width * PIXEL_BYTES;

    let file = File::open(path)?;
    let len = file.metadata()?.len() as usize;
    if len != total_bytes {
        return Err(StampcalError::ShapeMismatch {
            declared_height: height,
            declared_width: width,
            actual_height: len / row_bytes,
            actual_width: width,
        });
    }

    let mmap = unsafe { Mmap::map(&file)? };
    let mut values = vec![0.0f32; pixel_count];
    LittleEndian::read_f32_into(&mmap[..], &mut values);

    Array2::from_shape_vec((height, width), values)
        .map_err(|e| StampcalError::malformed("pixels", e.to_string()))
}
