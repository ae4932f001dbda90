// Test intent: the serial reference itself is a correct forward DFT —
// checked against a naive O(n²) evaluation, linearity and Parseval.
#![cfg(feature = "std")]

use parfft::{energy, Complex64, FftBackend, FftError, SerialFft};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

fn naive_dft(x: &[Complex64]) -> Vec<Complex64> {
    let n = x.len();
    (0..n)
        .map(|k| {
            let mut acc = Complex64::zero();
            for (j, &v) in x.iter().enumerate() {
                let angle = -2.0 * PI * ((k * j) % n) as f64 / n as f64;
                acc = acc.add(v.mul(Complex64::expi(angle)));
            }
            acc
        })
        .collect()
}

fn random_signal(n: usize, seed: u64) -> Vec<Complex64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect()
}

#[test]
fn matches_naive_dft() {
    for n in [2usize, 4, 8, 16, 32, 64] {
        let signal = random_signal(n, n as u64);
        let expected = naive_dft(&signal);
        let mut actual = signal;
        SerialFft.fft(&mut actual).unwrap();
        for (k, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
            assert!(
                (a.re - e.re).abs() < 1e-9 && (a.im - e.im).abs() < 1e-9,
                "n={n} bin {k}"
            );
        }
    }
}

#[test]
fn transform_is_linear() {
    let n = 64;
    let x = random_signal(n, 11);
    let y = random_signal(n, 22);
    let a = Complex64::new(0.8, -1.3);
    let b = Complex64::new(-2.1, 0.4);

    let mut combined: Vec<Complex64> = x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| a.mul(xi).add(b.mul(yi)))
        .collect();
    SerialFft.fft(&mut combined).unwrap();

    let mut fx = x;
    let mut fy = y;
    SerialFft.fft(&mut fx).unwrap();
    SerialFft.fft(&mut fy).unwrap();

    for (k, c) in combined.iter().enumerate() {
        let expected = a.mul(fx[k]).add(b.mul(fy[k]));
        assert!(
            (c.re - expected.re).abs() < 1e-9 && (c.im - expected.im).abs() < 1e-9,
            "bin {k}"
        );
    }
}

#[test]
fn parseval_holds() {
    for n in [1usize, 8, 128, 1024] {
        let mut signal = random_signal(n, 5 * n as u64 + 3);
        let before = energy(&signal);
        SerialFft.fft(&mut signal).unwrap();
        let after = energy(&signal);
        let scale = after / before;
        assert!(
            (scale - n as f64).abs() < 1e-6 * n as f64,
            "n={n}: energy scaled by {scale}"
        );
    }
}

#[test]
fn all_ones_is_a_delta_at_dc() {
    let mut signal = vec![Complex64::new(1.0, 0.0); 8];
    SerialFft.fft(&mut signal).unwrap();
    assert!((signal[0].re - 8.0).abs() < 1e-12 && signal[0].im.abs() < 1e-12);
    for c in &signal[1..] {
        assert!(c.norm_sqr() < 1e-24);
    }
}

#[test]
fn complex_tone_hits_bin_three() {
    let n = 16;
    let mut signal: Vec<Complex64> = (0..n)
        .map(|i| Complex64::expi(2.0 * PI * 3.0 * i as f64 / n as f64))
        .collect();
    SerialFft.fft(&mut signal).unwrap();
    let mags: Vec<f64> = signal.iter().map(|c| c.norm_sqr().sqrt()).collect();
    for (k, mag) in mags.iter().enumerate() {
        if k == 3 {
            assert!((mag - 16.0).abs() < 1e-9, "bin {k}: {mag}");
        } else {
            assert!(*mag < 1e-9, "bin {k}: {mag}");
        }
    }
}

#[test]
fn invalid_sizes_are_named() {
    let mut empty: Vec<Complex64> = Vec::new();
    assert_eq!(SerialFft.fft(&mut empty), Err(FftError::EmptyInput));

    let mut odd = vec![Complex64::zero(); 24];
    let err = SerialFft.fft(&mut odd).unwrap_err();
    assert_eq!(err, FftError::NonPowerOfTwoLength { len: 24 });
    assert_eq!(
        format!("{err}"),
        "sequence length 24 is not a power of two"
    );
}
