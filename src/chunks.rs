// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Divides the row space of the image into the disjoint, contiguous
//! ranges the workers will claim.  Every row's cost is assumed to be
//! roughly uniform, so equal-sized static chunks are good enough and
//! we can skip building a work-stealing scheduler.  A render whose
//! per-row cost is badly skewed would want one; that is explicitly
//! somebody else's future problem.

use errors::RenderError;

/// A contiguous range of rows assigned to exactly one worker.  The
/// range is half-open: `start` is the first row, `end` is one past
/// the last.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// First row in the chunk.
    pub start: usize,
    /// One past the last row in the chunk.
    pub end: usize,
}

impl Chunk {
    /// The number of rows in the chunk.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True only for a degenerate chunk; `partition` never makes one.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Cuts `[0, total_rows)` into chunks of `chunk_size` rows, in
/// ascending order, with the final chunk taking whatever remainder is
/// left.  The chunks are contiguous, never overlap, and cover every
/// row exactly once; `render` leans on that to hand each worker an
/// exclusive slice of the frame buffer.
///
/// Fails with `InvalidPartition` when either argument is zero.
pub fn partition(total_rows: usize, chunk_size: usize) -> Result<Vec<Chunk>, RenderError> {
    if total_rows == 0 || chunk_size == 0 {
        return Err(RenderError::InvalidPartition {
            rows: total_rows,
            chunk_size,
        });
    }

    let count = (total_rows + chunk_size - 1) / chunk_size;
    let mut chunks = Vec::with_capacity(count);
    let mut start = 0;
    while start < total_rows {
        let end = if start + chunk_size > total_rows {
            total_rows
        } else {
            start + chunk_size
        };
        chunks.push(Chunk { start, end });
        start = end;
    }
    Ok(chunks)
}
