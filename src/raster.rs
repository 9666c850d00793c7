//! The shared value types of a render: the immutable parameters every
//! worker reads, and the one mutable frame buffer they all write.

/// Bytes per pixel of the output raster.  This renderer only speaks
/// 8-bit RGB.
pub const BYTES_PER_PIXEL: usize = 3;

/// Everything a kernel needs to know to compute a row, fixed before
/// the first worker starts and never mutated afterwards.  Workers
/// share it by reference; its immutability is what makes that safe
/// without any synchronization.
#[derive(Copy, Clone, Debug)]
pub struct RenderParameters {
    /// Real coordinate of the left edge of the image.
    pub x_min: f64,
    /// Imaginary coordinate of row zero.
    pub y_min: f64,
    /// World-space distance covered by one pixel, in both axes.
    pub pitch: f64,
    /// Supersampling grid edge: each pixel averages `samples * samples`
    /// points.
    pub samples: u32,
    /// Width of the image in pixels.
    pub width: usize,
}

impl RenderParameters {
    /// The imaginary coordinate of a given row.
    pub fn row_to_y(&self, row: usize) -> f64 {
        self.y_min + (row as f64) * self.pitch
    }

    /// Bytes one row of the image occupies.
    pub fn row_bytes(&self) -> usize {
        self.width * BYTES_PER_PIXEL
    }
}

/// The single output raster: `height` rows of `width` RGB pixels in
/// one contiguous, row-major allocation.  Allocated zeroed by the
/// renderer before dispatch; during the parallel phase each worker
/// holds a mutable borrow of its own rows and nothing else, so by the
/// time the buffer can be read again every byte has exactly one
/// writer behind it.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl FrameBuffer {
    /// Allocates a zero-filled buffer for a `width` x `height` image.
    pub fn new(width: usize, height: usize) -> FrameBuffer {
        FrameBuffer {
            width,
            height,
            pixels: vec![0; width * height * BYTES_PER_PIXEL],
        }
    }

    /// Width of the image in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the image in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes in one row.
    pub fn row_bytes(&self) -> usize {
        self.width * BYTES_PER_PIXEL
    }

    /// The whole raster, row-major, top row first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// One row of pixel bytes.
    pub fn row(&self, row: usize) -> &[u8] {
        let stride = self.row_bytes();
        &self.pixels[row * stride..(row + 1) * stride]
    }

    /// Splits the raster into disjoint mutable bands of
    /// `rows_per_band` rows each (the last band may be shorter).
    /// These are the slices the renderer zips with the chunk
    /// descriptors; their disjointness is what lets the workers write
    /// without locks.
    pub fn bands_mut(&mut self, rows_per_band: usize) -> ::std::slice::ChunksMut<u8> {
        let stride = self.row_bytes();
        self.pixels.chunks_mut(rows_per_band * stride)
    }
}
