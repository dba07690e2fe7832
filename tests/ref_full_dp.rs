use obst_dp::{
    expected_cost_of, materialize_tree,
    traits::{BalancedShape, ChainShape},
    Distribution, KeyRange, ObstEngine,
};
use proptest::prelude::*;

fn keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("k{i:02}")).collect()
}

fn normalized(key_weights: Vec<u32>, gap_weights: Vec<u32>) -> Distribution {
    let total: u32 = key_weights.iter().chain(gap_weights.iter()).sum();
    let total = f64::from(total.max(1));
    let p = key_weights.iter().map(|&w| f64::from(w) / total).collect();
    let q = gap_weights.iter().map(|&w| f64::from(w) / total).collect();
    Distribution::new(keys(key_weights.len()), p, q).unwrap()
}

fn distribution(max_keys: usize) -> impl Strategy<Value = Distribution> {
    (1..=max_keys).prop_flat_map(|n| {
        (
            prop::collection::vec(0u32..100, n),
            prop::collection::vec(0u32..100, n + 1),
        )
            .prop_map(|(p, q)| normalized(p, q))
    })
}

/// Exhaustive minimum over every BST shape, charging depth explicitly.
fn brute_force(p: &[f64], q: &[f64], i: usize, j: usize, depth: usize) -> f64 {
    if i == j {
        return q[i] * depth as f64;
    }
    (i..j)
        .map(|r| {
            p[r] * depth as f64
                + brute_force(p, q, i, r, depth + 1)
                + brute_force(p, q, r + 1, j, depth + 1)
        })
        .fold(f64::INFINITY, f64::min)
}

proptest! {
    #[test]
    fn optimal_cost_matches_exhaustive_search(dist in distribution(7)) {
        let solution = ObstEngine::new(&dist).run();
        let n = dist.len();
        let reference = brute_force(dist.p(), dist.q(), 0, n, 1);
        prop_assert!((solution.optimal_cost() - reference).abs() < 1e-9);
        prop_assert_eq!(solution.optimal_cost(), solution.cost()[(0, n)]);
    }

    #[test]
    fn materialized_tree_costs_the_optimum(dist in distribution(12)) {
        let solution = ObstEngine::new(&dist).run();
        let tree = materialize_tree(solution.root(), &dist, KeyRange::full(dist.len()))
            .unwrap()
            .unwrap();
        let cost = tree.expected_cost(dist.q()).unwrap();
        prop_assert!((cost - solution.optimal_cost()).abs() < 1e-9);
        let comparisons = tree.expected_comparisons(dist.q()).unwrap();
        prop_assert!((comparisons - solution.expected_comparisons()).abs() < 1e-9);
        prop_assert_eq!(tree.len(), dist.len());
        let in_order: Vec<&str> = dist.keys().iter().map(String::as_str).collect();
        prop_assert_eq!(tree.in_order_keys(), in_order);
    }

    #[test]
    fn no_fixed_shape_beats_the_optimum(dist in distribution(16)) {
        let n = dist.len();
        let optimum = ObstEngine::new(&dist).run().optimal_cost();
        let balanced = expected_cost_of(&BalancedShape { n }, &dist).unwrap();
        let left_chain = expected_cost_of(&ChainShape { n, leftmost: true }, &dist).unwrap();
        let right_chain = expected_cost_of(&ChainShape { n, leftmost: false }, &dist).unwrap();
        for other in [balanced, left_chain, right_chain] {
            prop_assert!(optimum <= other + 1e-9);
        }
    }

    #[test]
    fn weight_table_is_the_range_mass(dist in distribution(10)) {
        let solution = ObstEngine::new(&dist).run();
        let n = dist.len();
        for i in 0..=n {
            for j in i..=n {
                let mass: f64 = dist.p()[i..j].iter().sum::<f64>() + dist.q()[i..=j].iter().sum::<f64>();
                prop_assert!((solution.weight()[(i, j)] - mass).abs() < 1e-9);
            }
        }
    }
}
