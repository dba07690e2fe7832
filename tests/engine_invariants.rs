use obst_dp::{build_optimal_bst, search_tree, Distribution, ObstEngineBuilder, ScanWindow};
use proptest::prelude::*;

fn keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("w{i:03}")).collect()
}

fn weights(max_keys: usize) -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (1..=max_keys).prop_flat_map(|n| {
        (
            prop::collection::vec(0.0f64..1.0, n),
            prop::collection::vec(0.0f64..1.0, n + 1),
        )
    })
}

#[test]
fn concrete_three_key_scenario() {
    let k = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let solution = build_optimal_bst(&k, &[0.2, 0.3, 0.1], &[0.1, 0.05, 0.15, 0.1]).unwrap();
    // b at depth 1, a and c at depth 2, all four gaps at depth 3
    let by_hand = 0.3 + 2.0 * (0.2 + 0.1) + 3.0 * (0.1 + 0.05 + 0.15 + 0.1);
    assert!((solution.optimal_cost() - by_hand).abs() < 1e-12);
    assert_eq!(solution.root().get(0, 3), 1);
    assert_eq!(k[solution.root().get(0, 3)], "b");
}

#[test]
fn single_key_boundary() {
    let k = vec!["solo".to_string()];
    let (p, q) = ([0.6], [0.15, 0.25]);
    let solution = build_optimal_bst(&k, &p, &q).unwrap();
    assert_eq!(solution.root().get(0, 1), 0);
    assert!((solution.cost()[(0, 1)] - (p[0] + 2.0 * (q[0] + q[1]))).abs() < 1e-12);
    assert!((solution.expected_comparisons() - (p[0] + q[0] + q[1])).abs() < 1e-12);

    let hit = search_tree(&k, solution.root(), "solo").unwrap();
    assert_eq!((hit.found, hit.comparisons), (true, 1));
    let miss = search_tree(&k, solution.root(), "zzz").unwrap();
    assert_eq!((miss.found, miss.comparisons), (false, 1));
}

proptest! {
    #[test]
    fn builds_are_deterministic((p, q) in weights(14)) {
        let k = keys(p.len());
        let first = build_optimal_bst(&k, &p, &q).unwrap();
        let second = build_optimal_bst(&k, &p, &q).unwrap();
        prop_assert_eq!(first.root(), second.root());
        prop_assert_eq!(first.cost(), second.cost());
    }

    #[test]
    fn roots_stay_inside_their_ranges((p, q) in weights(14)) {
        let k = keys(p.len());
        let n = k.len();
        let solution = build_optimal_bst(&k, &p, &q).unwrap();
        for i in 0..n {
            for j in (i + 1)..=n {
                let r = solution.root().get(i, j);
                prop_assert!(i <= r && r < j, "R[{}][{}] = {}", i, j, r);
            }
        }
    }

    #[test]
    fn every_key_is_found_at_the_end_of_its_path((p, q) in weights(20)) {
        let k = keys(p.len());
        let solution = build_optimal_bst(&k, &p, &q).unwrap();
        for key in &k {
            let outcome = search_tree(&k, solution.root(), key).unwrap();
            prop_assert!(outcome.found);
            prop_assert_eq!(outcome.path.last().copied(), Some(key.as_str()));
            prop_assert_eq!(outcome.comparisons, outcome.path.len());
        }
    }

    #[test]
    fn absent_words_walk_to_an_empty_gap((p, q) in weights(20), probe in "[a-z]{1,4}") {
        let k = keys(p.len());
        let solution = build_optimal_bst(&k, &p, &q).unwrap();
        let outcome = search_tree(&k, solution.root(), &probe).unwrap();
        prop_assert!(!outcome.found);
        prop_assert!(outcome.comparisons >= 1);
        prop_assert_eq!(outcome.comparisons, outcome.path.len());
    }

    #[test]
    fn knuth_window_reaches_the_same_cost((p, q) in weights(24)) {
        let dist = Distribution::new(keys(p.len()), p, q).unwrap();
        let full = ObstEngineBuilder::new(&dist).build().run();
        let knuth = ObstEngineBuilder::new(&dist)
            .with_window(ScanWindow::Knuth)
            .build()
            .run();
        let tolerance = 1e-9 * full.optimal_cost().max(1.0);
        prop_assert!((full.optimal_cost() - knuth.optimal_cost()).abs() <= tolerance);
    }
}
