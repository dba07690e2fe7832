//! Search along a BST shape, recording the visited keys.
//!
//! [`search_tree`] walks the root table (or any [`TreeShape`]) directly over
//! half-open ranges, so it never needs a materialized tree; walking a
//! materialized [`TreeNode`] with [`TreeNode::search`] yields the same outcome.

use std::cmp::Ordering;

use crate::error::{ObstError, Result};
use crate::range::KeyRange;
use crate::traits::TreeShape;
use crate::tree::{checked_root, TreeNode};

/// Trace of one search.
///
/// `comparisons == path.len()`, and the last path entry is the node where the
/// search stopped (the target itself when `found`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome<'a> {
    pub path: Vec<&'a str>,
    pub comparisons: usize,
    pub found: bool,
}

impl SearchOutcome<'_> {
    fn new() -> Self {
        Self {
            path: Vec::new(),
            comparisons: 0,
            found: false,
        }
    }
}

/// Search `target` in the tree `shape` describes over `keys`.
///
/// A missing word is not an error: the outcome has `found == false` and still
/// carries the path walked. A root outside its range means the shape is
/// corrupt and fails with [`ObstError::InvalidRange`].
pub fn search_tree<'a, S: TreeShape + ?Sized>(
    keys: &'a [String],
    shape: &S,
    target: &str,
) -> Result<SearchOutcome<'a>> {
    if shape.num_keys() != keys.len() {
        return Err(ObstError::LengthMismatch {
            what: "tree shape",
            expected: keys.len(),
            actual: shape.num_keys(),
        });
    }

    let mut outcome = SearchOutcome::new();
    let mut range = KeyRange::full(keys.len());
    while !range.is_empty() {
        let r = checked_root(shape, range)?;
        let key = keys[r].as_str();
        outcome.path.push(key);
        outcome.comparisons += 1;
        match target.cmp(key) {
            Ordering::Equal => {
                outcome.found = true;
                break;
            }
            Ordering::Less => range.end = r,
            Ordering::Greater => range.start = r + 1,
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        target_word = target,
        comparisons = outcome.comparisons,
        found = outcome.found,
        "search finished"
    );
    Ok(outcome)
}

impl TreeNode {
    /// Search `target` by walking the materialized tree.
    pub fn search(&self, target: &str) -> SearchOutcome<'_> {
        let mut outcome = SearchOutcome::new();
        let mut node = Some(self);
        while let Some(n) = node {
            outcome.path.push(&n.key);
            outcome.comparisons += 1;
            node = match target.cmp(&n.key) {
                Ordering::Equal => {
                    outcome.found = true;
                    break;
                }
                Ordering::Less => n.left.as_deref(),
                Ordering::Greater => n.right.as_deref(),
            };
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ObstEngine, RootTable};
    use crate::probability::Distribution;
    use crate::table::Table;
    use crate::tree::materialize_tree;

    fn abc() -> Distribution {
        Distribution::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![0.2, 0.3, 0.1],
            vec![0.1, 0.05, 0.15, 0.1],
        )
        .unwrap()
    }

    #[test]
    fn finds_every_key() {
        let dist = abc();
        let sol = ObstEngine::new(&dist).run();
        for key in dist.keys() {
            let out = search_tree(dist.keys(), sol.root(), key).unwrap();
            assert!(out.found);
            assert_eq!(out.path.last().copied(), Some(key.as_str()));
            assert_eq!(out.comparisons, out.path.len());
        }
        let root = search_tree(dist.keys(), sol.root(), "b").unwrap();
        assert_eq!(root.path, vec!["b"]);
        let leaf = search_tree(dist.keys(), sol.root(), "c").unwrap();
        assert_eq!(leaf.path, vec!["b", "c"]);
        assert_eq!(leaf.comparisons, 2);
    }

    #[test]
    fn missing_word_reports_the_walk() {
        let dist = abc();
        let sol = ObstEngine::new(&dist).run();
        let out = search_tree(dist.keys(), sol.root(), "bb").unwrap();
        assert!(!out.found);
        assert_eq!(out.path, vec!["b", "c"]);
        assert_eq!(out.comparisons, 2);

        let before = search_tree(dist.keys(), sol.root(), "0").unwrap();
        assert_eq!(before.path, vec!["b", "a"]);
        assert!(!before.found);
    }

    #[test]
    fn matrix_walk_equals_tree_walk() {
        let dist = abc();
        let sol = ObstEngine::new(&dist).run();
        let tree = materialize_tree(sol.root(), &dist, KeyRange::full(3))
            .unwrap()
            .unwrap();
        for target in ["", "a", "ab", "b", "bz", "c", "zz"] {
            let by_table = search_tree(dist.keys(), sol.root(), target).unwrap();
            assert_eq!(by_table, tree.search(target), "target {target:?}");
        }
    }

    #[test]
    fn corrupt_root_table_fails() {
        let dist = abc();
        let mut raw: Table<usize> = Table::new(4);
        raw[(0, 3)] = 7;
        let corrupt = RootTable::from_table(raw);
        assert!(matches!(
            search_tree(dist.keys(), &corrupt, "a"),
            Err(ObstError::InvalidRange { start: 0, end: 3, root: 7 })
        ));
    }

    #[test]
    fn shape_size_must_match_keys() {
        let dist = abc();
        let small: Table<usize> = Table::new(2);
        assert!(matches!(
            search_tree(dist.keys(), &RootTable::from_table(small), "a"),
            Err(ObstError::LengthMismatch { .. })
        ));
    }
}
