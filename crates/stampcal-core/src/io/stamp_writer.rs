use std::fs::File;
use std::io::{BufWriter, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use ndarray::Array2;

use crate::error::Result;
use crate::image::Band;
use crate::io::header::{HeaderMap, HeaderValue};
use crate::io::stamp::StampDirectory;

/// Write one band of a stamp in the layout [`StampDirectory`] reads.
///
/// `NAXIS1`/`NAXIS2` are set from the pixel array, overriding whatever the
/// caller put in `header`.
pub fn write_stamp(
    dir: &StampDirectory,
    band: Band,
    stamp_id: &str,
    header: &HeaderMap,
    pixels: &Array2<f32>,
) -> Result<()> {
    let (h, w) = pixels.dim();
    let mut header = header.clone();
    header.insert("NAXIS1", HeaderValue::Int(w as i64));
    header.insert("NAXIS2", HeaderValue::Int(h as i64));
    std::fs::write(dir.header_path(band, stamp_id), header.to_card_text()?)?;

    let file = File::create(dir.pixel_path(band, stamp_id))?;
    let mut writer = BufWriter::new(file);
    for &v in pixels.iter() {
        writer.write_f32::<LittleEndian>(v)?;
    }
    writer.flush()?;
    Ok(())
}
