//! Data-parallel backend built on rayon.
//!
//! Both parallelized loops are fork/join: no worker touches stage `s + 1`
//! before every worker has finished stage `s`, because each `for_each`
//! returns only once the whole iteration space is done. The twiddle table is
//! built once per stage before the parallel region and shared read-only.

use rayon::prelude::*;

use crate::fft::{butterfly_stage, log2_len, stage_twiddles, FftBackend, FftError};
use crate::num::{Complex, Float};

/// Raw-pointer view used to run the swap loop of the permutation in
/// parallel. Disjointness, not locking, is the safety argument; see
/// `par_bit_reverse_permute`.
struct SharedSlice<T>(*mut T);

unsafe impl<T> Send for SharedSlice<T> {}
unsafe impl<T> Sync for SharedSlice<T> {}

/// Parallel bit-reversal permutation.
///
/// Element `j` participates in exactly one swap pair `(j, rev(j))`, and the
/// swap is executed only by the iteration holding the smaller index of the
/// pair, so no two iterations access the same element.
fn par_bit_reverse_permute<T: Float + Send + Sync>(x: &mut [Complex<T>]) {
    let n = x.len();
    debug_assert!(n.is_power_of_two());
    if n <= 2 {
        return;
    }
    let shift = usize::BITS - n.trailing_zeros();
    let ptr = SharedSlice(x.as_mut_ptr());
    (0..n).into_par_iter().for_each(|i| {
        // Capture the whole wrapper, not its pointer field; the Send/Sync
        // impls live on the wrapper.
        let ptr = &ptr;
        let r = i.reverse_bits() >> shift;
        if r > i {
            // SAFETY: iteration `i` is the unique iteration touching
            // elements `i` and `r`, and both are in bounds.
            unsafe {
                core::ptr::swap(ptr.0.add(i), ptr.0.add(r));
            }
        }
    });
}

/// Backend that hands each stage's block loop to rayon's worker pool.
///
/// Blocks are disjoint `m`-sized subslices, so `par_chunks_exact_mut` expresses
/// the per-stage partition directly and the borrow checker enforces it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParallelFft;

impl<T: Float + Send + Sync> FftBackend<T> for ParallelFft {
    fn fft(&self, input: &mut [Complex<T>]) -> Result<(), FftError> {
        let log2n = log2_len(input.len())?;
        par_bit_reverse_permute(input);
        for s in 1..=log2n {
            let m = 1usize << s;
            let twiddles = stage_twiddles::<T>(m)?;
            #[cfg(feature = "verbose-logging")]
            log::trace!("parallel stage {s}: span {m}, blocks {}", input.len() / m);
            input
                .par_chunks_exact_mut(m)
                .for_each(|block| butterfly_stage(block, &twiddles));
        }
        Ok(())
    }
}
