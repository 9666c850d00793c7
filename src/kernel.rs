// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The per-pixel math, kept behind a trait so the row-partitioned
//! machinery in `render` never has to know what it is drawing.  The
//! one implementation here is the classic Mandelbrot escape-time
//! kernel with supersampling and a logarithmic palette.

use errors::KernelError;
use num::complex::Complex;
use num::clamp;
use raster::{RenderParameters, BYTES_PER_PIXEL};

/// Computes one row of pixel bytes from a row coordinate and the
/// shared render parameters.  Implementations must be pure: same
/// inputs, same bytes, no side effects.  The `Sync` bound is load
/// bearing: every worker calls the same kernel instance
/// concurrently, and nothing stops them from doing so at the same
/// time.
pub trait PixelKernel: Sync {
    /// Fills `out` (exactly `width * 3` bytes) with the RGB pixels of
    /// the row whose imaginary coordinate is `y`.
    fn compute_row(
        &self,
        y: f64,
        params: &RenderParameters,
        out: &mut [u8],
    ) -> Result<(), KernelError>;
}

const MAX_ITER: u32 = 2048;
const LINEARITY: f64 = 8.0;

/// The escape-time Mandelbrot kernel.  Each pixel averages a
/// `samples` x `samples` grid of points centered on the pixel's cell;
/// each point is iterated under `z = z*z + c` until it leaves the
/// circle of radius 2 or the iteration budget runs out.  Points that
/// never escape are part of the set and contribute black; escaping
/// points contribute a log-scaled brightness with a blue bias, so the
/// set's border glows against its interior.
#[derive(Clone, Debug)]
pub struct MandelbrotKernel {
    offset: f64,
    scale: f64,
}

impl MandelbrotKernel {
    /// Builds the kernel, precomputing the palette's log offset and
    /// scale.
    pub fn new() -> MandelbrotKernel {
        let offset = LINEARITY.ln();
        MandelbrotKernel {
            offset,
            scale: 255.9 / ((f64::from(MAX_ITER) + LINEARITY).ln() - offset),
        }
    }

    /// The number of iterations until `c`'s orbit leaves the radius-2
    /// circle, or 0 if it never does within the budget (i.e. `c` is
    /// in the set).
    fn escape_time(&self, c: Complex<f64>) -> u32 {
        // z[1] = (0,0)*(0,0) + c
        let mut z = c;
        for i in 1..MAX_ITER {
            if z.norm_sqr() > 4.0 {
                return i;
            }
            z = z * z + c;
        }
        0
    }
}

impl Default for MandelbrotKernel {
    fn default() -> MandelbrotKernel {
        MandelbrotKernel::new()
    }
}

impl PixelKernel for MandelbrotKernel {
    fn compute_row(
        &self,
        y: f64,
        params: &RenderParameters,
        out: &mut [u8],
    ) -> Result<(), KernelError> {
        if params.samples == 0 {
            return Err(KernelError::ZeroSamples);
        }
        if out.len() != params.row_bytes() {
            return Err(KernelError::RowSize {
                expected: params.row_bytes(),
                actual: out.len(),
            });
        }

        let samples = f64::from(params.samples);
        let color_scale = 1.0 / (samples * samples);
        let delta = params.pitch / samples;
        // Center the sample grid on the pixel's cell.
        let y0 = y - 0.5 * (params.pitch - delta);

        for (i, pixel) in out.chunks_mut(BYTES_PER_PIXEL).enumerate() {
            let x0 = params.x_min + (i as f64) * params.pitch - 0.5 * (params.pitch - delta);
            let mut r = 0.0;
            let mut g = 0.0;
            let mut b = 0.0;
            for j in 0..params.samples {
                let y1 = y0 + f64::from(j) * delta;
                for k in 0..params.samples {
                    let x1 = x0 + f64::from(k) * delta;
                    let n = self.escape_time(Complex::new(x1, y1));
                    if n > 0 {
                        let lum = ((f64::from(n) + LINEARITY).ln() - self.offset) * self.scale;
                        r += lum;
                        g += lum;
                        b += 128.0 + 0.5 * lum;
                    }
                }
            }
            pixel[0] = clamp(r * color_scale, 0.0, 255.0) as u8;
            pixel[1] = clamp(g * color_scale, 0.0, 255.0) as u8;
            pixel[2] = clamp(b * color_scale, 0.0, 255.0) as u8;
        }
        Ok(())
    }
}
