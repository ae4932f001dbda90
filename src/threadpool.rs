//! Explicit thread-pool backend.
//!
//! Every stage re-partitions the buffer: `blocks = n/m` butterfly blocks are
//! split into at most `workers` contiguous ranges, one scoped thread per
//! range. Each worker regenerates its own twiddle table, trading duplicated
//! O(m) compute for the absence of any shared state between workers. The end
//! of the `thread::scope` is the inter-stage barrier: block boundaries shift
//! as `m` doubles, and a stage may read any index the previous stage wrote.

use alloc::vec::Vec;
use std::thread;

use crate::fft::{bit_reverse_permute, butterfly_stage, log2_len, stage_twiddles, FftBackend, FftError};
use crate::num::{Complex, Float};
use crate::partition::block_ranges;

/// Backend spawning `workers` scoped threads per stage over manually
/// partitioned block ranges.
///
/// With `workers == 1` the schedule degenerates to the serial reference and
/// produces bitwise-identical output.
#[derive(Debug, Clone, Copy)]
pub struct ThreadPoolFft {
    pub workers: usize,
}

impl ThreadPoolFft {
    pub fn new(workers: usize) -> Self {
        Self { workers }
    }
}

impl Default for ThreadPoolFft {
    /// One worker per available hardware thread. A configuration default,
    /// not a correctness requirement.
    fn default() -> Self {
        Self {
            workers: num_cpus::get().max(1),
        }
    }
}

impl<T: Float + Send> FftBackend<T> for ThreadPoolFft {
    fn fft(&self, input: &mut [Complex<T>]) -> Result<(), FftError> {
        let n = input.len();
        if self.workers == 0 {
            return Err(FftError::IndivisiblePartition { len: n, parts: 0 });
        }
        let log2n = log2_len(n)?;
        bit_reverse_permute(input);
        for s in 1..=log2n {
            let m = 1usize << s;
            let blocks = n / m;
            let t = self.workers.min(blocks);
            #[cfg(feature = "verbose-logging")]
            log::debug!("thread-pool stage {s}: span {m}, {blocks} blocks over {t} workers");

            // Disjoint per-worker subslices, whole blocks only. The borrow
            // split is the partition invariant made structural.
            let mut parts: Vec<&mut [Complex<T>]> = Vec::with_capacity(t);
            let mut rest: &mut [Complex<T>] = &mut *input;
            for range in block_ranges(blocks, t) {
                let take = (range.end - range.start) * m;
                let (head, tail) = rest.split_at_mut(take);
                parts.push(head);
                rest = tail;
            }

            thread::scope(|scope| -> Result<(), FftError> {
                let mut handles = Vec::with_capacity(parts.len());
                for part in parts {
                    handles.push(scope.spawn(move || -> Result<(), FftError> {
                        let twiddles = stage_twiddles::<T>(m)?;
                        butterfly_stage(part, &twiddles);
                        Ok(())
                    }));
                }
                for handle in handles {
                    match handle.join() {
                        Ok(result) => result?,
                        // A worker failure is fatal to the run.
                        Err(payload) => std::panic::resume_unwind(payload),
                    }
                }
                Ok(())
            })?;
        }
        Ok(())
    }
}
