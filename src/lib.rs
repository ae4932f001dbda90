//! # parfft - parallel radix-2 FFT backends for Rust
//!
//! An iterative radix-2 decimation-in-time (Cooley–Tukey) FFT for
//! power-of-two lengths, with one serial reference implementation and three
//! parallel decompositions of the butterfly stages:
//!
//! - [`SerialFft`]: the single-threaded reference every other backend must
//!   reproduce.
//! - [`ParallelFft`]: data-parallel loops on the rayon worker pool
//!   (`parallel` feature).
//! - [`ThreadPoolFft`]: explicitly managed scoped threads over contiguous
//!   block ranges, re-partitioned every stage (`std` feature).
//! - [`ClusterFft`]: a fixed group of ranks owning disjoint chunks and
//!   communicating through channels, with a centralize–compute–redistribute
//!   exchange for stages that span chunks (`std` feature).
//!
//! All backends transform the caller's buffer in place and use the forward,
//! unnormalized, negative-exponent convention: `X_k = Σ x_n · e^(-2πikn/N)`.
//! There is no inverse transform and no `1/N` scaling.
//!
//! ## Cargo features
//!
//! - `std` (default): thread-based backends and `std::error::Error`
//! - `parallel` (default): the rayon backend
//! - `internal-tests`: property tests (proptest)
//! - `verbose-logging`: per-stage `log` output
//!
//! The crate core (`SerialFft` and the shared stage machinery) is no_std +
//! alloc.
//!
//! ## Example
//!
//! ```
//! use parfft::{Complex64, FftBackend, SerialFft};
//!
//! let mut signal = vec![Complex64::new(1.0, 0.0); 8];
//! SerialFft.fft(&mut signal)?;
//! assert!((signal[0].re - 8.0).abs() < 1e-12);
//! # Ok::<(), parfft::FftError>(())
//! ```

#![no_std]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// Transform core: validation, bit reversal, twiddles, the serial stage
/// executor and the reference backend.
pub mod fft;

/// Complex arithmetic and the float abstraction the butterflies run on.
pub mod num;

/// Block and chunk partitioning of the per-stage index space.
pub mod partition;

/// Data-parallel backend on rayon.
#[cfg(feature = "parallel")]
pub mod parallel;

/// Explicit per-stage thread pool over scoped threads.
#[cfg(feature = "std")]
pub mod threadpool;

/// Message-passing backend: chunked ranks and a rank-0 coordinator.
#[cfg(feature = "std")]
pub mod cluster;

#[cfg(feature = "std")]
pub use cluster::{ClusterFft, ExchangePlan};
pub use fft::{energy, FftBackend, FftError, SerialFft};
pub use num::{Complex, Complex32, Complex64, Float};
#[cfg(feature = "parallel")]
pub use parallel::ParallelFft;
#[cfg(feature = "std")]
pub use threadpool::ThreadPoolFft;
