//! Radix-2 decimation-in-time FFT core.
//!
//! This module holds the pieces every backend shares: length validation, the
//! bit-reversal permutation, per-stage twiddle generation and the serial
//! butterfly stage executor. [`SerialFft`] applies them directly and is the
//! reference every concurrent backend is measured against.
//!
//! Convention: forward, unnormalized, negative exponent. The twiddles for a
//! stage of span `m` are `W[j] = exp(-2πi·j/m)`; no `1/N` scaling is applied
//! and no inverse transform is provided.

use alloc::vec::Vec;

use crate::num::{Complex, Float};

/// Errors reported by the transform backends.
///
/// Nothing is recovered internally; every variant is returned to the caller
/// before the buffer has been touched (except [`FftError::AllocationFailure`],
/// which can only interrupt a run between stages).
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum FftError {
    /// Zero-length input buffer.
    EmptyInput,
    /// The sequence length is not a power of two.
    NonPowerOfTwoLength { len: usize },
    /// The sequence cannot be split into `parts` equal chunks.
    IndivisiblePartition { len: usize, parts: usize },
    /// A twiddle table or exchange buffer could not be allocated.
    AllocationFailure,
    /// A participant dropped out of a collective exchange mid-run.
    RankFailure,
}

impl core::fmt::Display for FftError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "input buffer is empty"),
            Self::NonPowerOfTwoLength { len } => {
                write!(f, "sequence length {len} is not a power of two")
            }
            Self::IndivisiblePartition { len, parts } => {
                write!(f, "sequence length {len} is not divisible into {parts} equal parts")
            }
            Self::AllocationFailure => write!(f, "failed to allocate working memory"),
            Self::RankFailure => write!(f, "a participant dropped out of a collective exchange"),
        }
    }
}

impl core::fmt::Debug for FftError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FftError {}

/// Validate a transform length and return `log2(len)`.
pub fn log2_len(len: usize) -> Result<u32, FftError> {
    if len == 0 {
        return Err(FftError::EmptyInput);
    }
    if !len.is_power_of_two() {
        return Err(FftError::NonPowerOfTwoLength { len });
    }
    Ok(len.trailing_zeros())
}

/// In-place bit-reversal permutation over `log2(x.len())` bits.
///
/// Each index pair `(i, rev(i))` is swapped exactly once, by the iteration
/// whose index is the smaller of the two. Callers guarantee the length is a
/// power of two.
pub fn bit_reverse_permute<T: Float>(x: &mut [Complex<T>]) {
    let n = x.len();
    debug_assert!(n.is_power_of_two());
    if n <= 2 {
        return;
    }
    let shift = usize::BITS - n.trailing_zeros();
    for i in 0..n {
        let r = i.reverse_bits() >> shift;
        if r > i {
            x.swap(i, r);
        }
    }
}

/// Twiddle factors for one butterfly stage of span `m`: `m/2` values
/// `exp(-2πi·j/m)` for `j = 0..m/2`.
///
/// Rebuilt for every stage (and, in the thread-pool backend, redundantly per
/// worker). The table costs O(n log n) over a whole run against the same
/// O(n log n) butterfly arithmetic, so nothing is cached.
pub fn stage_twiddles<T: Float>(m: usize) -> Result<Vec<Complex<T>>, FftError> {
    debug_assert!(m >= 2 && m.is_power_of_two());
    let mh = m / 2;
    let step = -(T::from_f32(2.0) * T::pi()) / T::from_usize(m);
    let mut table = Vec::new();
    table
        .try_reserve_exact(mh)
        .map_err(|_| FftError::AllocationFailure)?;
    let mut jf = T::zero();
    for _ in 0..mh {
        table.push(Complex::expi(step * jf));
        jf = jf + T::one();
    }
    Ok(table)
}

/// Serial butterfly stage over a buffer whose length is a multiple of the
/// stage span `m = 2 * twiddles.len()`.
///
/// This is the unit of work every backend partitions: the rayon backend hands
/// it single blocks, the thread pool hands it contiguous runs of blocks and
/// the message-passing backend hands it chunks or the gathered full buffer.
pub fn butterfly_stage<T: Float>(x: &mut [Complex<T>], twiddles: &[Complex<T>]) {
    let mh = twiddles.len();
    let m = mh * 2;
    debug_assert!(m >= 2 && x.len() % m == 0);
    for block in x.chunks_exact_mut(m) {
        let (lo, hi) = block.split_at_mut(mh);
        for j in 0..mh {
            let u = lo[j];
            let v = twiddles[j].mul(hi[j]);
            lo[j] = u.add(v);
            hi[j] = u.sub(v);
        }
    }
}

/// Total squared magnitude `Σ|x_k|²` of a buffer.
///
/// With the unnormalized forward convention used here, a transform multiplies
/// this quantity by exactly `n`, which makes it a cheap self-check.
pub fn energy<T: Float>(x: &[Complex<T>]) -> T {
    let mut acc = T::zero();
    for c in x {
        acc = acc + c.norm_sqr();
    }
    acc
}

/// A forward-FFT implementation operating in place on a caller-owned buffer.
pub trait FftBackend<T: Float> {
    fn fft(&self, input: &mut [Complex<T>]) -> Result<(), FftError>;
}

/// Single-threaded reference backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialFft;

impl<T: Float> FftBackend<T> for SerialFft {
    fn fft(&self, input: &mut [Complex<T>]) -> Result<(), FftError> {
        let log2n = log2_len(input.len())?;
        bit_reverse_permute(input);
        for s in 1..=log2n {
            let m = 1usize << s;
            let twiddles = stage_twiddles::<T>(m)?;
            #[cfg(feature = "verbose-logging")]
            log::trace!("serial stage {s}: span {m}");
            butterfly_stage(input, &twiddles);
        }
        Ok(())
    }
}
