//! Binary PPM (P6) serialization.  The format is a four-line ASCII
//! header followed by the raw raster bytes, which is about as simple
//! as an image format gets and keeps the output inspectable with a
//! hex dump.  Output files are finalized by rename: a render or
//! write failure never leaves a partial `.ppm` behind.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use errors::RenderError;
use raster::FrameBuffer;

/// The largest value a color channel can carry, as advertised in the
/// PPM header.
pub const MAX_PIXEL_VALUE: u32 = 255;

/// Writes `frame` to `out` as a binary PPM: the `P6` magic, a comment
/// line, the dimensions, the channel maximum, then the raster bytes
/// row-major with row 0 first.  No vertical flip.
pub fn write_ppm<W: Write>(out: &mut W, frame: &FrameBuffer) -> io::Result<()> {
    write!(
        out,
        "P6\n#Mandelbrot set\n{} {}\n{}\n",
        frame.width(),
        frame.height(),
        MAX_PIXEL_VALUE
    )?;
    out.write_all(frame.as_bytes())?;
    Ok(())
}

/// Writes `frame` to `path`, going through a temporary file in the
/// same directory and renaming it into place once every byte is down.
/// On any failure the temporary is cleaned up and `path` is left
/// untouched.
pub fn save_ppm(path: &Path, frame: &FrameBuffer) -> Result<(), RenderError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    write_ppm(&mut tmp, frame)?;
    tmp.as_file_mut().sync_all()?;
    let _: File = tmp.persist(path).map_err(|e| RenderError::from(e.error))?;
    Ok(())
}
