// Test intent: every concurrent backend must reproduce the serial reference
// element-wise, across sizes and worker counts.
#![cfg(feature = "std")]

use parfft::{Complex64, FftBackend, SerialFft, ThreadPoolFft};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_signal(n: usize, seed: u64) -> Vec<Complex64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Complex64::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0)))
        .collect()
}

fn assert_close(a: &[Complex64], b: &[Complex64], tol: f64, what: &str) {
    assert_eq!(a.len(), b.len());
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        assert!(
            (x.re - y.re).abs() < tol && (x.im - y.im).abs() < tol,
            "{what}: bin {i}: ({}, {}) vs ({}, {})",
            x.re,
            x.im,
            y.re,
            y.im
        );
    }
}

#[test]
fn thread_pool_matches_serial_across_sizes_and_workers() {
    for log2n in [0u32, 1, 2, 3, 6, 10] {
        let n = 1usize << log2n;
        for workers in [1usize, 2, 3, 4, 8, 16] {
            let mut pool = random_signal(n, 7 + log2n as u64);
            let mut serial = pool.clone();
            ThreadPoolFft::new(workers).fft(&mut pool).unwrap();
            SerialFft.fft(&mut serial).unwrap();
            assert_close(&pool, &serial, 1e-8, &format!("n={n} workers={workers}"));
        }
    }
}

#[test]
fn single_worker_output_is_bitwise_identical() {
    let mut pool = random_signal(512, 99);
    let mut serial = pool.clone();
    ThreadPoolFft::new(1).fft(&mut pool).unwrap();
    SerialFft.fft(&mut serial).unwrap();
    assert_eq!(pool, serial);
}

#[cfg(feature = "parallel")]
#[test]
fn rayon_backend_matches_serial_across_sizes() {
    use parfft::ParallelFft;
    for log2n in [0u32, 1, 4, 8, 12] {
        let n = 1usize << log2n;
        let mut par = random_signal(n, 3 * log2n as u64 + 1);
        let mut serial = par.clone();
        ParallelFft.fft(&mut par).unwrap();
        SerialFft.fft(&mut serial).unwrap();
        assert_close(&par, &serial, 1e-7, &format!("n={n}"));
    }
}

#[cfg(feature = "parallel")]
#[test]
fn all_backends_agree_on_one_signal() {
    use parfft::{ClusterFft, ParallelFft};
    let signal = random_signal(256, 2024);

    let mut serial = signal.clone();
    SerialFft.fft(&mut serial).unwrap();

    let mut par = signal.clone();
    ParallelFft.fft(&mut par).unwrap();
    assert_close(&par, &serial, 1e-8, "rayon");

    let mut pool = signal.clone();
    ThreadPoolFft::new(4).fft(&mut pool).unwrap();
    assert_close(&pool, &serial, 1e-8, "thread pool");

    // Single-rank cluster: the chunk-local permutation is the full one.
    let mut cluster = signal;
    ClusterFft::new(1).fft(&mut cluster).unwrap();
    assert_close(&cluster, &serial, 1e-8, "cluster p=1");
}
