//! The failure taxonomy of the renderer.  There are deliberately no
//! retry paths anywhere in here: a bad partition is a caller error, a
//! failed chunk is recorded and reported after the join barrier, and
//! an I/O failure during serialization simply surfaces.  A failed
//! render must be re-invoked entirely by the caller.

use std::io;

/// Why a single kernel invocation was rejected.  The kernel is pure,
/// so these are the only ways it can fail: it was asked to average
/// zero samples, or it was handed a row slice whose length does not
/// match the image width.
#[derive(Clone, Debug, Fail, PartialEq)]
pub enum KernelError {
    /// The supersampling grid would be empty.
    #[fail(display = "sample count must be positive")]
    ZeroSamples,
    /// The destination slice does not hold exactly one row.
    #[fail(display = "row slice holds {} bytes, expected {}", actual, expected)]
    RowSize {
        /// Bytes one row of the image requires.
        expected: usize,
        /// Bytes the worker actually handed over.
        actual: usize,
    },
}

/// The record a worker leaves behind when its chunk fails.  The
/// worker stops at the first bad row and does not touch the rest of
/// its range; sibling workers are unaffected and run to their own
/// completion.
#[derive(Clone, Debug, Fail, PartialEq)]
#[fail(
    display = "rows {}..{} aborted at row {}: {}",
    start_row, end_row, row, cause
)]
pub struct WorkerFailure {
    /// First row of the failed chunk.
    pub start_row: usize,
    /// One past the last row of the failed chunk.
    pub end_row: usize,
    /// The row whose kernel call failed.
    pub row: usize,
    /// What the kernel objected to.
    #[fail(cause)]
    pub cause: KernelError,
}

/// Everything that can go wrong between "render this" and a finished
/// file on disk.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The requested row count or chunk size cannot describe a valid
    /// partition.  This is a programming error on the caller's part
    /// and is never retried.
    #[fail(
        display = "cannot partition {} rows into chunks of {} rows",
        rows, chunk_size
    )]
    InvalidPartition {
        /// Total rows requested.
        rows: usize,
        /// Rows per chunk requested.
        chunk_size: usize,
    },
    /// One or more chunks failed.  The frame buffer is invalid and
    /// must not be serialized; the individual failure records say
    /// which row ranges went wrong and why.
    #[fail(display = "render failed: one or more chunks aborted")]
    RenderFailed {
        /// One record per failed chunk, in hand-out order.
        failures: Vec<WorkerFailure>,
    },
    /// Writing the output file failed.  No partial file is left
    /// behind; see `ppm::save_ppm`.
    #[fail(display = "i/o error: {}", _0)]
    Io(#[fail(cause)] io::Error),
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> RenderError {
        RenderError::Io(err)
    }
}
