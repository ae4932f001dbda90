//! Index-space partitioning for the concurrent backends.
//!
//! Two schemes exist. A *block partition* splits a stage's `blocks = n/m`
//! butterfly blocks into contiguous per-worker ranges and is recomputed every
//! stage as `m` doubles. A *chunk partition* splits the sequence itself into
//! equal per-rank chunks once, before any stage runs, and stays fixed for the
//! whole run.

use core::ops::Range;

use crate::fft::FftError;

/// Contiguous, non-overlapping ranges covering `[0, blocks)`.
///
/// `workers` is clamped to `blocks` by the caller; sizes are `blocks/workers`
/// with the first `blocks % workers` ranges one block larger, so the cover is
/// exact for any divisibility.
pub fn block_ranges(blocks: usize, workers: usize) -> impl Iterator<Item = Range<usize>> {
    debug_assert!(workers >= 1 && workers <= blocks);
    let base = blocks / workers;
    let extra = blocks % workers;
    let mut start = 0;
    (0..workers).map(move |w| {
        let take = base + usize::from(w < extra);
        let range = start..start + take;
        start += take;
        range
    })
}

/// Validate a chunk partition of `len` elements over `parts` ranks and return
/// the chunk length.
///
/// Rejects the indivisible case explicitly instead of letting integer
/// division drop a remainder and corrupt the partition.
pub fn chunk_len(len: usize, parts: usize) -> Result<usize, FftError> {
    if parts == 0 || len % parts != 0 {
        return Err(FftError::IndivisiblePartition { len, parts });
    }
    Ok(len / parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn assert_exact_cover(blocks: usize, workers: usize) {
        let ranges: Vec<_> = block_ranges(blocks, workers).collect();
        assert_eq!(ranges.len(), workers);
        let mut next = 0;
        for r in &ranges {
            assert_eq!(r.start, next, "gap or overlap at block {next}");
            assert!(r.end >= r.start);
            next = r.end;
        }
        assert_eq!(next, blocks);
        let total: usize = ranges.iter().map(|r| r.end - r.start).sum();
        assert_eq!(total, blocks);
        // Sizes differ by at most one, larger ranges first.
        let sizes: Vec<usize> = ranges.iter().map(|r| r.end - r.start).collect();
        let min = *sizes.iter().min().unwrap();
        let max = *sizes.iter().max().unwrap();
        assert!(max - min <= 1);
        assert!(sizes.windows(2).all(|p| p[0] >= p[1]));
    }

    #[test]
    fn block_ranges_cover_exactly() {
        for blocks in 1..=64usize {
            for workers in 1..=blocks {
                assert_exact_cover(blocks, workers);
            }
        }
    }

    #[test]
    fn block_ranges_remainder_goes_first() {
        let ranges: Vec<_> = block_ranges(7, 3).collect();
        assert_eq!(ranges, [0..3, 3..5, 5..7]);
    }

    #[test]
    fn block_ranges_single_worker_takes_all() {
        let ranges: Vec<_> = block_ranges(16, 1).collect();
        assert_eq!(ranges, [0..16]);
    }

    #[test]
    fn chunk_len_requires_divisibility() {
        assert_eq!(chunk_len(16, 4), Ok(4));
        assert_eq!(chunk_len(16, 1), Ok(16));
        assert_eq!(
            chunk_len(16, 3),
            Err(FftError::IndivisiblePartition { len: 16, parts: 3 })
        );
        assert_eq!(
            chunk_len(8, 0),
            Err(FftError::IndivisiblePartition { len: 8, parts: 0 })
        );
    }
}

#[cfg(all(feature = "internal-tests", test))]
mod proptests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn block_partition_is_a_full_cover(blocks in 1usize..4096, workers in 1usize..256) {
            let workers = workers.min(blocks);
            let ranges: Vec<_> = block_ranges(blocks, workers).collect();
            let mut next = 0;
            for r in &ranges {
                prop_assert_eq!(r.start, next);
                next = r.end;
            }
            prop_assert_eq!(next, blocks);
        }
    }
}
