// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The row-partitioned render engine.  `RowRenderer` owns the whole
//! lifecycle of a frame: it allocates the buffer, cuts the rows into
//! chunks, hands each chunk (paired with its exclusive slice of the
//! buffer) to a bounded pool of scoped worker threads, joins them
//! all, and only then decides whether the frame is good.
//!
//! Nothing here locks the pixel data.  The chunk list and the band
//! list are the same partition of the image expressed twice, once as
//! row indices and once as disjoint `&mut [u8]` slices, and zipping
//! them means a worker physically cannot reach another worker's rows.
//! The only lock in the module guards the hand-out of work, and the
//! only blocking point is the join barrier at the end of the scope.

use crossbeam::thread::ScopedJoinHandle;
use std::sync::Mutex;

use chunks::{partition, Chunk};
use errors::{RenderError, WorkerFailure};
use kernel::PixelKernel;
use raster::{FrameBuffer, RenderParameters};

/// Renders a frame by dispatching disjoint row chunks to worker
/// threads.  Immutable once built; a single renderer can produce any
/// number of frames.
pub struct RowRenderer<K: PixelKernel> {
    kernel: K,
    params: RenderParameters,
}

impl<K: PixelKernel> RowRenderer<K> {
    /// Pairs a kernel with the parameters every worker will share.
    pub fn new(kernel: K, params: RenderParameters) -> RowRenderer<K> {
        RowRenderer { kernel, params }
    }

    /// The parameters this renderer was built with.
    pub fn params(&self) -> &RenderParameters {
        &self.params
    }

    /// Renders `height` rows into a fresh frame buffer using at most
    /// `workers` concurrent threads (a bound of 0 is treated as 1,
    /// and the bound is never higher than the number of chunks).
    ///
    /// The phases run strictly in order: partition the rows, allocate
    /// the zeroed buffer, dispatch chunks to the pool, join every
    /// worker, then aggregate.  Any chunk failure makes the whole
    /// frame invalid: the buffer is dropped and `RenderFailed`
    /// reports every failed row range.  Chunks that were already
    /// running when a sibling failed still run to completion; nobody
    /// is interrupted and nothing is retried.
    pub fn render(
        &self,
        height: usize,
        chunk_size: usize,
        workers: usize,
    ) -> Result<FrameBuffer, RenderError> {
        let chunks = partition(height, chunk_size)?;
        // A zero-width raster has no bytes to band out.
        if self.params.width == 0 {
            return Err(RenderError::InvalidPartition {
                rows: height,
                chunk_size,
            });
        }
        let mut frame = FrameBuffer::new(self.params.width, height);

        let workers = if workers == 0 { 1 } else { workers };
        let workers = if workers > chunks.len() {
            chunks.len()
        } else {
            workers
        };

        let failures: Vec<WorkerFailure> = {
            let work: Vec<(Chunk, &mut [u8])> = chunks
                .iter()
                .cloned()
                .zip(frame.bands_mut(chunk_size))
                .collect();
            let queue = Mutex::new(work.into_iter());
            let queue = &queue;
            let kernel = &self.kernel;
            let params = &self.params;

            crossbeam::scope(|spawner| {
                let handles: Vec<ScopedJoinHandle<Vec<WorkerFailure>>> = (0..workers)
                    .map(|_| {
                        spawner.spawn(move |_| {
                            let mut failures: Vec<WorkerFailure> = vec![];
                            loop {
                                let job = { queue.lock().unwrap().next() };
                                match job {
                                    Some((chunk, band)) => {
                                        if let Err(failure) = run_chunk(kernel, params, chunk, band)
                                        {
                                            failures.push(failure);
                                        }
                                    }
                                    None => {
                                        break;
                                    }
                                }
                            }
                            failures
                        })
                    })
                    .collect();

                // The explicit joins are the barrier; the frame is
                // not touched again until every handle is back.
                handles
                    .into_iter()
                    .map(|handle| handle.join().unwrap())
                    .flatten()
                    .collect()
            })
            .unwrap()
        };

        if failures.is_empty() {
            Ok(frame)
        } else {
            Err(RenderError::RenderFailed { failures })
        }
    }
}

/// The worker body: walk the chunk's rows in ascending order, asking
/// the kernel to fill each row's slice of the band.  The first kernel
/// error aborts the rest of the chunk and becomes the chunk's failure
/// record; rows already written stay written, rows after the failure
/// stay zeroed, and no byte outside the band is ever reachable from
/// here.
fn run_chunk<K: PixelKernel>(
    kernel: &K,
    params: &RenderParameters,
    chunk: Chunk,
    band: &mut [u8],
) -> Result<(), WorkerFailure> {
    let stride = params.row_bytes();
    for (row, out) in (chunk.start..chunk.end).zip(band.chunks_mut(stride)) {
        let y = params.row_to_y(row);
        if let Err(cause) = kernel.compute_row(y, params, out) {
            return Err(WorkerFailure {
                start_row: chunk.start,
                end_row: chunk.end,
                row,
                cause,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use errors::KernelError;
    use kernel::MandelbrotKernel;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Writes the row's y coordinate into every byte of the row.
    /// With `y_min = 0` and `pitch = 1` the y coordinate *is* the row
    /// index, which makes buffer placement trivially checkable.
    struct RowFill;

    impl PixelKernel for RowFill {
        fn compute_row(
            &self,
            y: f64,
            _params: &RenderParameters,
            out: &mut [u8],
        ) -> Result<(), KernelError> {
            for b in out.iter_mut() {
                *b = y as u8;
            }
            Ok(())
        }
    }

    /// Fails every row at or below `from`, and counts how many rows
    /// were attempted in total so tests can see that siblings kept
    /// working and the failed chunk stopped early.
    struct FailingFrom {
        from: f64,
        attempts: AtomicUsize,
    }

    impl PixelKernel for FailingFrom {
        fn compute_row(
            &self,
            y: f64,
            _params: &RenderParameters,
            out: &mut [u8],
        ) -> Result<(), KernelError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if y >= self.from {
                return Err(KernelError::ZeroSamples);
            }
            for b in out.iter_mut() {
                *b = y as u8;
            }
            Ok(())
        }
    }

    fn row_index_params(width: usize) -> RenderParameters {
        RenderParameters {
            x_min: 0.0,
            y_min: 0.0,
            pitch: 1.0,
            samples: 1,
            width,
        }
    }

    #[test]
    fn rows_land_at_their_own_offsets() {
        let renderer = RowRenderer::new(RowFill, row_index_params(4));
        let frame = renderer.render(4, 2, 2).unwrap();
        for row in 0..4 {
            assert!(frame.row(row).iter().all(|&b| b == row as u8));
        }
    }

    #[test]
    fn worker_count_does_not_change_the_bytes() {
        let params = RenderParameters {
            x_min: -0.60,
            y_min: 0.48,
            pitch: 0.15 / 32.0,
            samples: 2,
            width: 32,
        };
        let renderer = RowRenderer::new(MandelbrotKernel::new(), params);
        let serial = renderer.render(24, 5, 1).unwrap();
        let parallel = renderer.render(24, 5, 4).unwrap();
        assert_eq!(serial.as_bytes(), parallel.as_bytes());
    }

    #[test]
    fn rendering_twice_is_idempotent() {
        let params = RenderParameters {
            x_min: -0.60,
            y_min: 0.48,
            pitch: 0.15 / 16.0,
            samples: 2,
            width: 16,
        };
        let renderer = RowRenderer::new(MandelbrotKernel::new(), params);
        let first = renderer.render(16, 3, 3).unwrap();
        let second = renderer.render(16, 3, 3).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn single_row_frame_is_one_chunk() {
        let renderer = RowRenderer::new(RowFill, row_index_params(8));
        let frame = renderer.render(1, 100, 4).unwrap();
        assert_eq!(frame.as_bytes().len(), 8 * 3);
        assert!(frame.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn bad_dimensions_fail_before_any_dispatch() {
        let renderer = RowRenderer::new(RowFill, row_index_params(8));
        match renderer.render(0, 2, 2) {
            Err(RenderError::InvalidPartition { rows, chunk_size }) => {
                assert_eq!(rows, 0);
                assert_eq!(chunk_size, 2);
            }
            other => panic!("expected InvalidPartition, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn zero_width_raster_is_rejected() {
        let renderer = RowRenderer::new(RowFill, row_index_params(0));
        assert!(renderer.render(4, 2, 2).is_err());
    }

    #[test]
    fn one_bad_chunk_fails_the_render_but_not_its_siblings() {
        let kernel = FailingFrom {
            from: 2.0,
            attempts: AtomicUsize::new(0),
        };
        let renderer = RowRenderer::new(kernel, row_index_params(4));
        // Chunks [0,2) and [2,4); only the second can fail, at its
        // first row.
        match renderer.render(4, 2, 2) {
            Err(RenderError::RenderFailed { failures }) => {
                assert_eq!(
                    failures,
                    vec![WorkerFailure {
                        start_row: 2,
                        end_row: 4,
                        row: 2,
                        cause: KernelError::ZeroSamples,
                    }]
                );
            }
            other => panic!("expected RenderFailed, got {:?}", other.map(|_| ())),
        }
        // Rows 0 and 1 completed, row 2 was attempted and failed, row
        // 3 was never attempted.
        assert_eq!(renderer.kernel.attempts.load(Ordering::SeqCst), 3);
    }
}
