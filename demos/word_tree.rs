//! Example: optimal BST over a small word-frequency corpus.
//!
//! Run with:
//! `cargo run --example word_tree --features tracing`
//!
//! Set `RUST_LOG=obst_dp=debug` to see the per-search events.

use obst_dp::{materialize_tree, FrequencyTable, KeyRange, Pipeline, TreeNode};
use tracing_subscriber::EnvFilter;

const CORPUS: &str = "\
52 and
9 apple
41 back
48 could
3 cat
44 said
70 the
40 under
12 zebra
";

fn print_tree(node: &TreeNode, depth: usize) {
    if let Some(right) = &node.right {
        print_tree(right, depth + 1);
    }
    println!("{}{} ({:.4})", "    ".repeat(depth), node.key, node.probability);
    if let Some(left) = &node.left {
        print_tree(left, depth + 1);
    }
}

fn main() -> obst_dp::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let (corpus, stats) = FrequencyTable::from_text(CORPUS);
    println!("loaded {} words ({} lines skipped)", stats.loaded, stats.skipped);

    let report = Pipeline::new()
        .with_threshold(40)
        .with_query("said")
        .with_query("cat")
        .with_query("the")
        .run_on(&corpus)?;
    print!("{report}");

    let dist = &report.distribution;
    if let Some(tree) = materialize_tree(report.solution.root(), dist, KeyRange::full(dist.len()))? {
        println!("\nTree (right subtree above, left below):");
        print_tree(&tree, 0);
    }
    Ok(())
}
