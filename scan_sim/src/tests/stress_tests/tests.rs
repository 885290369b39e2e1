use super::generators::{arbitrary_sequence, cardinality, duplication, multiset_permutation, shuffled_case};
use super::*;
use crate::multiset::Multiset;
use crate::scan::scan_and_truncate;
use crate::seed::SweepSeed;
use crate::simulation::{run_trial, run_trials};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================
// CATEGORY 1: MULTISET & SHUFFLE INVARIANTS
// ============================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn test_multiset_counts(n in cardinality(), m in duplication()) {
        let multiset = Multiset::build(n, m).unwrap();
        prop_assert_eq!(multiset.len(), (n * m) as usize);

        let mut counts = vec![0u32; n as usize + 1];
        for &value in multiset.as_slice() {
            prop_assert!(value >= 1 && value <= n, "value {} outside 1..={}", value, n);
            counts[value as usize] += 1;
        }
        for value in 1..=n as usize {
            prop_assert_eq!(counts[value], m, "value {} count", value);
        }
    }

    #[test]
    fn test_shuffle_preserves_multiset((n, m, seed) in shuffled_case()) {
        let multiset = Multiset::build(n, m).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut shuffled = multiset.shuffled(&mut rng);
        let mut base = multiset.as_slice().to_vec();
        shuffled.sort_unstable();
        base.sort_unstable();
        prop_assert_eq!(shuffled, base);
    }
}

// ============================================
// CATEGORY 2: EVALUATOR AGAINST REFERENCE MODEL
// ============================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn test_cursor_matches_truncation_model(sequence in arbitrary_sequence()) {
        let model = TruncationModel::new(&sequence);
        let (expected, _) = model.run();
        prop_assert_eq!(scan_and_truncate(&sequence), expected);
    }

    #[test]
    fn test_model_accounts_for_every_element(sequence in arbitrary_sequence()) {
        let mut model = TruncationModel::new(&sequence);
        loop {
            model.check_invariant(sequence.len()).map_err(TestCaseError::fail)?;
            if !model.step() {
                break;
            }
        }
    }

    #[test]
    fn test_result_bounded_by_n((n, permutation) in multiset_permutation()) {
        let result = scan_and_truncate(&permutation);
        prop_assert!(result >= 1, "value 1 is always present");
        prop_assert!(result <= n, "result {} exceeds n={}", result, n);

        let (expected, removed) = TruncationModel::new(&permutation).run();
        prop_assert_eq!(result, expected);
        prop_assert!(removed <= permutation.len());
    }

    #[test]
    fn test_prefix_extension_never_lowers_result(
        sequence in arbitrary_sequence(),
        suffix in arbitrary_sequence(),
    ) {
        // Appending elements can only give the scan more to find
        let mut extended = sequence.clone();
        extended.extend_from_slice(&suffix);
        prop_assert!(scan_and_truncate(&extended) >= scan_and_truncate(&sequence));
    }
}

// ============================================
// CATEGORY 3: AGGREGATION
// ============================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_single_value_multiset_always_one(m in duplication(), trials in 1..=64u32, seed in any::<u64>()) {
        let multiset = Multiset::build(1, m).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        prop_assert_eq!(run_trial(&multiset, &mut rng), 1);
        prop_assert_eq!(run_trials(&multiset, trials, &SweepSeed::from_u64(seed)).unwrap(), 1.0);
    }

    #[test]
    fn test_one_trial_equals_its_result((n, m, seed) in shuffled_case()) {
        let multiset = Multiset::build(n, m).unwrap();
        let sweep_seed = SweepSeed::from_u64(seed);

        let mut rng = sweep_seed.trial_rng(n, m, 1, 0);
        let single = run_trial(&multiset, &mut rng);
        prop_assert_eq!(run_trials(&multiset, 1, &sweep_seed).unwrap(), f64::from(single));
    }

    #[test]
    fn test_mean_within_bounds((n, m, seed) in shuffled_case(), trials in 1..=50u32) {
        let multiset = Multiset::build(n, m).unwrap();
        let mean = run_trials(&multiset, trials, &SweepSeed::from_u64(seed)).unwrap();
        prop_assert!(mean >= 1.0 && mean <= f64::from(n), "mean {} outside [1, {}]", mean, n);
    }

    #[test]
    fn test_aggregation_is_deterministic_per_seed((n, m, seed) in shuffled_case(), trials in 1..=50u32) {
        let multiset = Multiset::build(n, m).unwrap();
        let sweep_seed = SweepSeed::from_u64(seed);
        prop_assert_eq!(
            run_trials(&multiset, trials, &sweep_seed).unwrap(),
            run_trials(&multiset, trials, &sweep_seed).unwrap()
        );
    }
}

// Deterministic regression test (reproducible with seed)
#[test]
fn test_deterministic_10k_shuffles_match_model() {
    let mut rng = ChaCha8Rng::seed_from_u64(12345);
    let multiset = Multiset::build(12, 3).unwrap();

    for i in 0..10_000 {
        let shuffled = multiset.shuffled(&mut rng);
        let (expected, _) = TruncationModel::new(&shuffled).run();
        assert_eq!(scan_and_truncate(&shuffled), expected, "mismatch at shuffle {}", i);
    }
}
