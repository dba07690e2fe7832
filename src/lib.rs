//! Optimal Binary Search Trees over word-frequency corpora.
//!
//! This crate builds the binary search tree that minimizes expected search
//! cost for a set of weighted keys, using the Knuth / Gilbert–Moore dynamic
//! program with both successful (key) and unsuccessful (gap) probabilities,
//! and then searches that tree while tracing every comparison.
//!
//! ## Pipeline
//! 1. Load word frequencies into a [`FrequencyTable`] (merge several corpora
//!    if needed).
//! 2. Pick an ordered key set and derive key probabilities `p` and gap
//!    probabilities `q` with [`Distribution`].
//! 3. Run [`ObstEngine`] to fill the cost, weight and root tables.
//! 4. Search with [`search_tree`] straight from the root table, or
//!    materialize an owned tree with [`materialize_tree`] for inspection.
//!
//! ## Quick start
//! ```
//! use obst_dp::{search_tree, Distribution, FrequencyTable, ObstEngine};
//!
//! let (table, _stats) = FrequencyTable::from_text("50 and\n7 apple\n40 back\n3 cat\n45 said\n");
//! let dist = Distribution::from_threshold(&table, 40).unwrap();
//! let solution = ObstEngine::new(&dist).run();
//!
//! let outcome = search_tree(dist.keys(), solution.root(), "said").unwrap();
//! assert!(outcome.found);
//! assert_eq!(outcome.path.last(), Some(&"said"));
//! assert_eq!(outcome.comparisons, outcome.path.len());
//! ```
//!
//! For whole-corpus runs with diagnostics see [`Pipeline`].

pub mod builder;
pub mod engine;
pub mod error;
pub mod frequency;
pub mod pipeline;
pub mod probability;
pub mod range;
pub mod search;
pub mod table;
pub mod traits;
pub mod tree;
pub mod utils;

pub use crate::builder::ObstEngineBuilder;
pub use crate::engine::{build_optimal_bst, ObstEngine, ObstSolution, RootTable, ScanWindow};
pub use crate::error::{ObstError, Result};
pub use crate::frequency::{FrequencyTable, LoadStats};
pub use crate::pipeline::{ObstReport, Pipeline};
pub use crate::probability::{compute_probabilities, Distribution};
pub use crate::range::KeyRange;
pub use crate::search::{search_tree, SearchOutcome};
pub use crate::traits::TreeShape;
pub use crate::tree::{expected_cost_of, materialize_tree, TreeNode};
