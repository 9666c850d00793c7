#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Row-parallel Mandelbrot renderer
//!
//! The Mandelbrot takes a point on the complex plane and repeatedly
//! multiplies it by itself, measuring how quickly that number goes to
//! infinity.  This "velocity" is the number used to render the image.
//! Every pixel of the output is independent of every other pixel,
//! which makes the image an easy target for parallelism: the raster
//! is cut into contiguous bands of rows, each band is handed to a
//! worker thread that owns an exclusive slice of one shared byte
//! buffer, and when every worker has finished the buffer is complete
//! and ready to serialize.
//!
//! The interesting part of this crate is not the fractal math (which
//! lives behind the `PixelKernel` trait and can be swapped out
//! wholesale); it is the partition-and-join machinery in `render`:
//! the rows are divided into disjoint chunks, the buffer is divided
//! into the matching disjoint slices, and the borrow checker is what
//! guarantees that no two workers can ever write the same byte.  No
//! locks guard the pixel data, only the hand-out of work.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate itertools;
extern crate num;
extern crate num_cpus;
extern crate tempfile;

pub mod chunks;
pub mod errors;
pub mod kernel;
pub mod ppm;
pub mod raster;
pub mod render;

pub use chunks::{partition, Chunk};
pub use errors::{KernelError, RenderError, WorkerFailure};
pub use kernel::{MandelbrotKernel, PixelKernel};
pub use raster::{FrameBuffer, RenderParameters, BYTES_PER_PIXEL};
pub use render::RowRenderer;
