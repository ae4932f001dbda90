//! Message-passing backend: a fixed group of ranks, each owning one chunk.
//!
//! The sequence is split once into `ranks` equal chunks. Every rank runs on
//! its own thread and holds an exclusive `&mut` view of its chunk; ranks
//! share nothing and communicate only through channels. Rank 0 doubles as
//! the coordinator and runs on the calling thread.
//!
//! Per stage of span `m`:
//!
//! - `m <= chunk_len` (*local stage*): every rank runs the butterfly stage
//!   over its own chunk as if it were a complete array. No communication.
//! - `m > chunk_len` (*global stage*): centralize–compute–redistribute.
//!   Ranks send chunk copies to rank 0, which assembles the full sequence,
//!   runs the stage serially and sends the updated chunks back. This moves
//!   O(n) data per global stage and serializes the global work on one rank;
//!   it is the deliberately simple strategy, kept behind [`ExchangePlan`] so
//!   a smarter exchange can replace it without touching the stage driver.
//!
//! The bit-reversal permutation is applied within each chunk independently.
//! For a single rank this is the full permutation and the output equals the
//! serial reference; for more ranks it is a preserved approximation of the
//! original scheme, so the output is the transform of a block-reindexed
//! input rather than of the natural-order sequence. Stage arithmetic is
//! unchanged either way, so the energy relation `Σ|X|² = n·Σ|x|²` holds for
//! every group size.

use alloc::vec::Vec;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::fft::{
    bit_reverse_permute, butterfly_stage, energy, log2_len, stage_twiddles, FftBackend, FftError,
};
use crate::num::{Complex, Float};
use crate::partition::chunk_len;

/// How one butterfly stage crosses (or does not cross) chunk boundaries.
///
/// The intended follow-on strategy is a pairwise partner exchange — partner
/// rank = own rank with bit `s - log2(chunk_len) - 1` flipped — which keeps
/// per-rank traffic at O(chunk_len) for any group size. It would slot in as
/// a third variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangePlan {
    /// The stage span fits inside one chunk; every rank proceeds alone.
    Local,
    /// The stage spans chunks; gather at rank 0, compute, scatter back.
    Centralized,
}

impl ExchangePlan {
    pub fn for_stage(m: usize, chunk_len: usize) -> Self {
        if m <= chunk_len {
            Self::Local
        } else {
            Self::Centralized
        }
    }
}

enum RankMessage<T: Float> {
    Chunk { rank: usize, data: Vec<Complex<T>> },
    Energy { value: T },
    Failed { error: FftError },
}

fn try_copy<T: Float>(src: &[Complex<T>]) -> Result<Vec<Complex<T>>, FftError> {
    let mut out = Vec::new();
    out.try_reserve_exact(src.len())
        .map_err(|_| FftError::AllocationFailure)?;
    out.extend_from_slice(src);
    Ok(out)
}

fn rank_worker<T: Float + Send>(
    rank: usize,
    chunk: &mut [Complex<T>],
    log2n: u32,
    coord_tx: &Sender<RankMessage<T>>,
    scatter_rx: &Receiver<Vec<Complex<T>>>,
) -> Result<(), FftError> {
    bit_reverse_permute(chunk);
    for s in 1..=log2n {
        let m = 1usize << s;
        match ExchangePlan::for_stage(m, chunk.len()) {
            ExchangePlan::Local => {
                let twiddles = stage_twiddles::<T>(m)?;
                butterfly_stage(chunk, &twiddles);
            }
            ExchangePlan::Centralized => {
                #[cfg(feature = "verbose-logging")]
                log::debug!("rank {rank}: global stage {s}, sending chunk for exchange");
                let data = try_copy(chunk)?;
                coord_tx
                    .send(RankMessage::Chunk { rank, data })
                    .map_err(|_| FftError::RankFailure)?;
                let updated = scatter_rx.recv().map_err(|_| FftError::RankFailure)?;
                if updated.len() != chunk.len() {
                    return Err(FftError::RankFailure);
                }
                chunk.copy_from_slice(&updated);
            }
        }
    }
    coord_tx
        .send(RankMessage::Energy {
            value: energy(chunk),
        })
        .map_err(|_| FftError::RankFailure)?;
    Ok(())
}

/// Backend running one rank per thread over statically chunked data, with a
/// rank-0 coordinator for global stages.
#[derive(Debug, Clone, Copy)]
pub struct ClusterFft {
    pub ranks: usize,
}

impl ClusterFft {
    pub fn new(ranks: usize) -> Self {
        Self { ranks }
    }

    /// Run the transform and return the group-wide `Σ|X_k|²`, reduced to the
    /// coordinating rank the way the distributed self-check does it.
    pub fn fft_with_energy<T: Float + Send>(
        &self,
        input: &mut [Complex<T>],
    ) -> Result<T, FftError> {
        let n = input.len();
        let log2n = log2_len(n)?;
        let cl = chunk_len(n, self.ranks)?;
        let p = self.ranks;

        thread::scope(|scope| -> Result<T, FftError> {
            let (coord_tx, coord_rx) = mpsc::channel::<RankMessage<T>>();
            let mut scatter: Vec<Sender<Vec<Complex<T>>>> = Vec::with_capacity(p - 1);

            let mut chunks = input.chunks_exact_mut(cl);
            let chunk0 = chunks.next().ok_or(FftError::EmptyInput)?;
            for (i, chunk) in chunks.enumerate() {
                let rank = i + 1;
                let (scatter_tx, scatter_rx) = mpsc::channel::<Vec<Complex<T>>>();
                scatter.push(scatter_tx);
                let coord_tx = coord_tx.clone();
                scope.spawn(move || {
                    if let Err(error) = rank_worker(rank, chunk, log2n, &coord_tx, &scatter_rx) {
                        let _ = coord_tx.send(RankMessage::Failed { error });
                    }
                });
            }
            drop(coord_tx);

            // Rank 0: same schedule as the workers, plus coordination.
            bit_reverse_permute(chunk0);
            for s in 1..=log2n {
                let m = 1usize << s;
                match ExchangePlan::for_stage(m, cl) {
                    ExchangePlan::Local => {
                        let twiddles = stage_twiddles::<T>(m)?;
                        butterfly_stage(chunk0, &twiddles);
                    }
                    ExchangePlan::Centralized => {
                        #[cfg(feature = "verbose-logging")]
                        log::debug!("rank 0: global stage {s}, gathering {} chunks", p - 1);
                        let mut full = Vec::new();
                        full.try_reserve_exact(n)
                            .map_err(|_| FftError::AllocationFailure)?;
                        full.resize(n, Complex::zero());
                        full[..cl].copy_from_slice(chunk0);
                        for _ in 1..p {
                            match coord_rx.recv() {
                                Ok(RankMessage::Chunk { rank, data })
                                    if rank > 0 && rank < p && data.len() == cl =>
                                {
                                    full[rank * cl..(rank + 1) * cl].copy_from_slice(&data);
                                }
                                Ok(RankMessage::Failed { error }) => return Err(error),
                                _ => return Err(FftError::RankFailure),
                            }
                        }
                        let twiddles = stage_twiddles::<T>(m)?;
                        butterfly_stage(&mut full, &twiddles);
                        chunk0.copy_from_slice(&full[..cl]);
                        for (i, tx) in scatter.iter().enumerate() {
                            let r = i + 1;
                            let data = try_copy(&full[r * cl..(r + 1) * cl])?;
                            tx.send(data).map_err(|_| FftError::RankFailure)?;
                        }
                    }
                }
            }

            let mut total = energy(chunk0);
            for _ in 1..p {
                match coord_rx.recv() {
                    Ok(RankMessage::Energy { value }) => total = total + value,
                    Ok(RankMessage::Failed { error }) => return Err(error),
                    _ => return Err(FftError::RankFailure),
                }
            }
            Ok(total)
        })
    }
}

impl<T: Float + Send> FftBackend<T> for ClusterFft {
    fn fft(&self, input: &mut [Complex<T>]) -> Result<(), FftError> {
        self.fft_with_energy(input).map(|_| ())
    }
}
