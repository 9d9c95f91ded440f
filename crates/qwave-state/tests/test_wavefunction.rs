//! Integration tests for wavefunctions, sampling and file I/O.

use std::collections::HashMap;

use num_complex::Complex64;
use proptest::prelude::*;
use qwave_state::{
    Amplitude, MeasurementOutcomeDistribution, Measurements, PauliTerm, StateError, Wavefunction,
    load_wavefunction, sample_from_wavefunction, save_wavefunction,
};

fn basis_state(n_qubits: usize, index: usize) -> Wavefunction {
    let mut amps = vec![Complex64::new(0.0, 0.0); 1 << n_qubits];
    amps[index] = Complex64::new(1.0, 0.0);
    Wavefunction::new(amps).unwrap()
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

#[test]
fn test_real_wavefunction_io() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wavefunction.json");
    let wf = basis_state(3, 1);

    save_wavefunction(&wf, &path).unwrap();
    let loaded = load_wavefunction(&path).unwrap();

    assert_eq!(loaded, wf);
}

#[test]
fn test_imag_wavefunction_io() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wavefunction.json");
    let mut amps = vec![Complex64::new(0.0, 0.0); 8];
    amps[1] = Complex64::new(0.0, 1.0);
    let wf = Wavefunction::new(amps).unwrap();

    save_wavefunction(&wf, &path).unwrap();
    let loaded = load_wavefunction(&path).unwrap();

    assert_eq!(loaded.amplitude(1), Some(Complex64::new(0.0, 1.0)));
}

#[test]
fn test_random_wavefunction_io() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("random.json");
    let wf = Wavefunction::random(5, 42).unwrap();

    save_wavefunction(&wf, &path).unwrap();
    let loaded = load_wavefunction(&path).unwrap();

    let original = wf.as_array().unwrap();
    let restored = loaded.as_array().unwrap();
    for (a, b) in original.iter().zip(restored.iter()) {
        assert!((a - b).norm() < 1e-15);
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_wavefunction(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, StateError::Io(_)));
    assert!(!err.is_validation());
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

#[test]
fn test_sampling_flat_column_and_list_inputs_agree() {
    let n_qubits = 4;
    let expected = vec![0, 0, 0, 1];

    let mut column = ndarray::Array2::<Complex64>::zeros((16, 1));
    column[[1, 0]] = Complex64::new(1.0, 0.0);
    let from_column = Wavefunction::from_matrix(column).unwrap();

    let mut flat = ndarray::Array1::<Complex64>::zeros(16);
    flat[1] = Complex64::new(1.0, 0.0);
    let from_flat = Wavefunction::from_array(flat).unwrap();

    let mut list = vec![0.0; 16];
    list[1] = 1.0;
    let from_list = Wavefunction::from_real(list).unwrap();

    for wf in [from_column, from_flat, from_list] {
        assert_eq!(wf.n_qubits(), n_qubits);
        let samples: Vec<_> = sample_from_wavefunction(&wf, 500, None).unwrap().collect();
        assert!(samples.iter().all(|s| *s == expected));
    }
}

#[test]
fn test_samples_feed_measurements() {
    let wf = Wavefunction::dicke_state(3, 1).unwrap();
    let measurements =
        Measurements::new(sample_from_wavefunction(&wf, 3000, Some(9)).unwrap().collect()).unwrap();
    let counts = measurements.get_counts();

    assert_eq!(counts.len(), 3);
    for key in ["001", "010", "100"] {
        let freq = counts[key] as f64 / 3000.0;
        assert!((freq - 1.0 / 3.0).abs() < 0.05);
    }
}

#[test]
fn test_sampled_z_expectation_matches_exact() {
    let wf = Wavefunction::random(3, 3).unwrap();
    let term = PauliTerm::parse("Z0 Z2").unwrap();
    let exact = wf.expectation_value(&term).unwrap();

    let measurements = Measurements::new(
        sample_from_wavefunction(&wf, 20_000, Some(17))
            .unwrap()
            .collect(),
    )
    .unwrap();
    let estimate = measurements.expectation_of_term(&term).unwrap();

    assert!((estimate - exact).abs() < 0.05, "{estimate} vs {exact}");
}

// ---------------------------------------------------------------------------
// Symbolic states
// ---------------------------------------------------------------------------

#[test]
fn test_symbolic_bind_then_distribution() {
    let wf = Wavefunction::from_amplitudes(vec![
        Amplitude::symbol("a"),
        Amplitude::zero(),
        Amplitude::zero(),
        Amplitude::symbol("b"),
    ])
    .unwrap();
    let values = HashMap::from([
        ("a".to_string(), std::f64::consts::FRAC_1_SQRT_2),
        ("b".to_string(), -std::f64::consts::FRAC_1_SQRT_2),
    ]);
    let bound = wf.bind(&values).unwrap();
    let dist = MeasurementOutcomeDistribution::from_wavefunction(&bound).unwrap();

    assert_eq!(dist.get_number_of_subsystems(), 2);
    assert!((dist.get(&[0, 0]) - 0.5).abs() < 1e-12);
    assert!((dist.get(&[1, 1]) - 0.5).abs() < 1e-12);
}

#[test]
fn test_cancelled_symbols_yield_sampleable_state() {
    let half = Amplitude::from(0.5);
    let cancelled = Amplitude::zero() * Amplitude::symbol("alpha") + half.clone();
    let wf = Wavefunction::from_amplitudes(vec![cancelled, half.clone(), half.clone(), half]).unwrap();
    assert!(!wf.is_symbolic());
    let samples: Vec<Vec<u8>> = sample_from_wavefunction(&wf, 10, Some(1)).unwrap().collect();
    assert_eq!(samples.len(), 10);

    let err = Wavefunction::from_amplitudes(vec![
        Amplitude::zero() * Amplitude::symbol("alpha"),
        Amplitude::from(0.5),
    ])
    .unwrap_err();
    assert!(matches!(err, StateError::NotNormalized { .. }));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn outcome_keys_index_probabilities(n in 1_usize..6, seed in any::<u64>()) {
        let wf = Wavefunction::random(n, seed).unwrap();
        let probs = wf.get_probabilities();
        let probs = probs.as_numeric().unwrap();
        for (key, p) in wf.get_outcome_probs().unwrap() {
            prop_assert_eq!(key.len(), n);
            let index = usize::from_str_radix(&key, 2).unwrap();
            prop_assert_eq!(probs[index], p);
        }
    }

    #[test]
    fn dicke_state_support_has_fixed_weight(n in 1_usize..7, k_frac in 0.0_f64..=1.0) {
        let k = ((n as f64) * k_frac).round() as usize;
        let wf = Wavefunction::dicke_state(n, k).unwrap();
        let array = wf.as_array().unwrap();
        for (i, a) in array.iter().enumerate() {
            prop_assert_eq!(a.norm() > 0.0, i.count_ones() as usize == k);
        }
    }

    #[test]
    fn sampled_bits_have_state_width(n in 1_usize..6, seed in any::<u64>(), count in 1_usize..50) {
        let wf = Wavefunction::random(n, seed).unwrap();
        let samples: Vec<_> = sample_from_wavefunction(&wf, count, Some(seed)).unwrap().collect();
        prop_assert_eq!(samples.len(), count);
        prop_assert!(samples.iter().all(|s| s.len() == n && s.iter().all(|&b| b <= 1)));
    }
}
