//! Mean Convergence Tests
//!
//! Sampled means from the trial aggregator against the exact expectations
//! from `exact.rs`. All runs use fixed seeds for reproducibility.

use super::exact::exact_expectation;
use crate::multiset::Multiset;
use crate::seed::SweepSeed;
use crate::simulation::run_trials;
use crate::types::{ParameterRange, SweepRanges, KEY_M, KEY_N, KEY_TRIALS};

// Results lie in [1, n] for these cases, so the per-trial standard deviation
// is below 2 and 0.02 is more than 4 standard errors at 200k trials.
const MEAN_TOLERANCE: f64 = 0.02;
const TRIALS: u32 = 200_000;

fn sampled_mean(n: u32, m: u32, trials: u32, seed: u64) -> f64 {
    let multiset = Multiset::build(n, m).unwrap();
    run_trials(&multiset, trials, &SweepSeed::from_u64(seed)).unwrap()
}

#[test]
fn test_mean_converges_for_small_multisets() {
    println!("\n  n |  m | exact    | sampled  | error");
    println!("{}", "-".repeat(44));

    for (n, m) in [(2u32, 2u32), (3, 1), (3, 2), (2, 3), (4, 2)] {
        let exact = exact_expectation(n, m);
        let sampled = sampled_mean(n, m, TRIALS, 42);
        let error = (sampled - exact).abs();

        println!("{:>3} | {:>2} | {:.6} | {:.6} | {:.6}", n, m, exact, sampled, error);

        assert!(
            error < MEAN_TOLERANCE,
            "n={} m={}: sampled {} deviates from exact {} by {}",
            n, m, sampled, exact, error
        );
    }
}

#[test]
fn test_convergence_by_sample_size() {
    let exact = exact_expectation(3, 2);
    let sample_sizes = [1_000u32, 10_000, 100_000, 400_000];

    println!("\nTrials     | Sampled  | Error    | 99% band");
    println!("{}", "-".repeat(48));

    let mut last_error = f64::MAX;
    for &trials in &sample_sizes {
        let sampled = sampled_mean(3, 2, trials, 12345);
        let error = (sampled - exact).abs();
        // Results lie in [1, 3], so sigma <= 1
        let band = 2.576 / f64::from(trials).sqrt();
        println!("{:>10} | {:.6} | {:.6} | {:.6}", trials, sampled, error, band);
        last_error = error;
    }

    assert!(last_error < 0.01, "error at largest sample size was {}", last_error);
}

#[test]
fn test_single_copy_approaches_e_minus_one() {
    // sum_{k=1..8} 1/k! = e - 1 - O(1/9!)
    let exact = exact_expectation(8, 1);
    assert!((exact - (std::f64::consts::E - 1.0)).abs() < 1e-5);

    let sampled = sampled_mean(8, 1, TRIALS, 7);
    println!("n=8 m=1 exact={:.6} sampled={:.6}", exact, sampled);
    assert!((sampled - exact).abs() < MEAN_TOLERANCE);
}

#[test]
fn test_mean_consistent_across_seeds() {
    const TRIALS_PER_SEED: u32 = 50_000;
    const NUM_SEEDS: u64 = 10;

    let exact = exact_expectation(3, 2);
    let means: Vec<f64> = (0..NUM_SEEDS)
        .map(|seed| sampled_mean(3, 2, TRIALS_PER_SEED, seed * 1000))
        .collect();

    for (i, mean) in means.iter().enumerate() {
        println!("  Seed {}: {:.6}", i * 1000, mean);
    }

    let max_deviation = means.iter().map(|&mean| (mean - exact).abs()).fold(0.0f64, f64::max);
    println!("Max deviation from {:.6}: {:.6}", exact, max_deviation);

    assert!(max_deviation < MEAN_TOLERANCE, "max deviation {} too large", max_deviation);

    // Different seeds must actually produce different streams
    let distinct = means.iter().filter(|&&mean| mean != means[0]).count();
    assert!(distinct > 0, "every seed produced the identical mean");
}

#[test]
fn test_table_independent_of_worker_count() {
    let ranges = SweepRanges {
        n: ParameterRange::new(KEY_N, 1, 4).unwrap(),
        m: ParameterRange::new(KEY_M, 1, 3).unwrap(),
        trials: ParameterRange::new(KEY_TRIALS, 200, 201).unwrap(),
    };
    let seed = SweepSeed::from_u64(2024);

    let single = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
    let many = rayon::ThreadPoolBuilder::new().num_threads(4).build().unwrap();

    let a = single.install(|| crate::simulate(ranges, &seed)).unwrap();
    let b = many.install(|| crate::simulate(ranges, &seed)).unwrap();

    assert_eq!(a.len(), 4 * 3 * 2);
    assert_eq!(a, b);
}
