#![cfg(feature = "parallel")]

use obst_dp::{builder::ObstEngineBuilder, Distribution, ScanWindow};
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_distribution(rng: &mut StdRng, n: usize) -> Distribution {
    let keys = (0..n).map(|i| format!("key{i:05}")).collect();
    let p: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..1.0)).collect();
    let q: Vec<f64> = (0..=n).map(|_| rng.gen_range(0.0..1.0)).collect();
    let total: f64 = p.iter().chain(q.iter()).sum();
    Distribution::new(
        keys,
        p.iter().map(|v| v / total).collect(),
        q.iter().map(|v| v / total).collect(),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn parallel_fill_is_bit_identical(seed in any::<u64>(), n in 1usize..48) {
        let mut rng = StdRng::seed_from_u64(seed);
        let dist = random_distribution(&mut rng, n);
        let sequential = ObstEngineBuilder::new(&dist)
            .with_parallel_min_width(usize::MAX)
            .build()
            .run();
        let parallel = ObstEngineBuilder::new(&dist)
            .with_parallel_min_width(1)
            .build()
            .run();
        prop_assert_eq!(sequential, parallel);
    }
}

#[test]
fn parallel_knuth_matches_sequential_knuth() {
    let mut rng = StdRng::seed_from_u64(7);
    let dist = random_distribution(&mut rng, 300);
    let sequential = ObstEngineBuilder::new(&dist)
        .with_window(ScanWindow::Knuth)
        .with_parallel_min_width(usize::MAX)
        .build()
        .run();
    let parallel = ObstEngineBuilder::new(&dist)
        .with_window(ScanWindow::Knuth)
        .with_parallel_min_width(8)
        .build()
        .run();
    assert_eq!(sequential.root(), parallel.root());
    assert_eq!(sequential.optimal_cost(), parallel.optimal_cost());
}
