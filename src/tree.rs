//! Explicit tree materialization and depth-weighted cost evaluation.
//!
//! The root table alone is enough to search, but an owned tree is easier to
//! inspect and gives an independent check of the DP: the depth-weighted cost
//! of the materialized tree must equal `C[0][n]`.
//!
//! Cost convention: a key at (1-indexed) depth `d` contributes `p · d`; an
//! empty gap hanging under a node at depth `d` contributes `q · (d + 1)`.

use crate::error::{ObstError, Result};
use crate::probability::Distribution;
use crate::range::KeyRange;
use crate::traits::TreeShape;

/// Immutable BST node; each node exclusively owns its children.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    pub key: String,
    pub probability: f64,
    pub left: Option<Box<TreeNode>>,
    pub right: Option<Box<TreeNode>>,
}

/// Resolve the root of a non-empty `range`, rejecting corrupt answers.
pub(crate) fn checked_root<S: TreeShape + ?Sized>(shape: &S, range: KeyRange) -> Result<usize> {
    let r = shape.root_of(range);
    if range.contains(r) && r < shape.num_keys() {
        Ok(r)
    } else {
        Err(ObstError::InvalidRange {
            start: range.start,
            end: range.end,
            root: r,
        })
    }
}

fn check_shape<S: TreeShape + ?Sized>(shape: &S, dist: &Distribution) -> Result<()> {
    if shape.num_keys() != dist.len() {
        return Err(ObstError::LengthMismatch {
            what: "tree shape",
            expected: dist.len(),
            actual: shape.num_keys(),
        });
    }
    Ok(())
}

/// Build the subtree over `range` described by `shape`.
///
/// Returns `Ok(None)` for an empty range. Fails with
/// [`ObstError::InvalidRange`] if the shape answers with a root outside the
/// range, and with [`ObstError::LengthMismatch`] if it was built for a
/// different number of keys.
pub fn materialize_tree<S: TreeShape + ?Sized>(
    shape: &S,
    dist: &Distribution,
    range: KeyRange,
) -> Result<Option<Box<TreeNode>>> {
    check_shape(shape, dist)?;
    if range.end > dist.len() {
        return Err(ObstError::InvalidRange {
            start: range.start,
            end: range.end,
            root: range.end,
        });
    }
    build(shape, dist, range)
}

fn build<S: TreeShape + ?Sized>(
    shape: &S,
    dist: &Distribution,
    range: KeyRange,
) -> Result<Option<Box<TreeNode>>> {
    if range.is_empty() {
        return Ok(None);
    }
    let r = checked_root(shape, range)?;
    let (left, right) = range.split_at(r);
    Ok(Some(Box::new(TreeNode {
        key: dist.keys()[r].clone(),
        probability: dist.p()[r],
        left: build(shape, dist, left)?,
        right: build(shape, dist, right)?,
    })))
}

/// Expected cost of the tree `shape` describes, evaluated straight from the
/// shape without materializing nodes.
pub fn expected_cost_of<S: TreeShape + ?Sized>(shape: &S, dist: &Distribution) -> Result<f64> {
    check_shape(shape, dist)?;
    range_cost(shape, dist, KeyRange::full(dist.len()), 1)
}

fn range_cost<S: TreeShape + ?Sized>(
    shape: &S,
    dist: &Distribution,
    range: KeyRange,
    depth: usize,
) -> Result<f64> {
    if range.is_empty() {
        return Ok(dist.q()[range.start] * depth as f64);
    }
    let r = checked_root(shape, range)?;
    let (left, right) = range.split_at(r);
    Ok(dist.p()[r] * depth as f64
        + range_cost(shape, dist, left, depth + 1)?
        + range_cost(shape, dist, right, depth + 1)?)
}

impl TreeNode {
    /// Number of keys in the subtree.
    pub fn len(&self) -> usize {
        1 + self.left.as_ref().map_or(0, |n| n.len()) + self.right.as_ref().map_or(0, |n| n.len())
    }

    /// Always false; a node holds at least its own key.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of levels, counting this node as level 1.
    pub fn height(&self) -> usize {
        let l = self.left.as_ref().map_or(0, |n| n.height());
        let r = self.right.as_ref().map_or(0, |n| n.height());
        1 + l.max(r)
    }

    /// Keys in ascending (in-order) order.
    pub fn in_order_keys(&self) -> Vec<&str> {
        let mut out = Vec::with_capacity(self.len());
        self.collect_keys(&mut out);
        out
    }

    fn collect_keys<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(left) = &self.left {
            left.collect_keys(out);
        }
        out.push(&self.key);
        if let Some(right) = &self.right {
            right.collect_keys(out);
        }
    }

    /// Depth-weighted expected cost, gaps taken in order from `q`.
    ///
    /// `q` must hold one entry per gap, i.e. `self.len() + 1`.
    pub fn expected_cost(&self, q: &[f64]) -> Result<f64> {
        let gaps = self.len() + 1;
        if q.len() != gaps {
            return Err(ObstError::LengthMismatch {
                what: "q",
                expected: gaps,
                actual: q.len(),
            });
        }
        let mut gap = 0;
        Ok(Self::weigh(Some(self), 1, q, &mut gap))
    }

    /// Expected number of key comparisons: unsuccessful searches are charged
    /// at the depth of their last compared key.
    pub fn expected_comparisons(&self, q: &[f64]) -> Result<f64> {
        Ok(self.expected_cost(q)? - crate::utils::sum(q))
    }

    fn weigh(node: Option<&TreeNode>, depth: usize, q: &[f64], gap: &mut usize) -> f64 {
        match node {
            None => {
                let cost = q[*gap] * depth as f64;
                *gap += 1;
                cost
            }
            Some(n) => {
                let left = Self::weigh(n.left.as_deref(), depth + 1, q, gap);
                let own = n.probability * depth as f64;
                let right = Self::weigh(n.right.as_deref(), depth + 1, q, gap);
                left + own + right
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ObstEngine, RootTable};
    use crate::table::Table;
    use crate::traits::{BalancedShape, ChainShape};

    fn abc() -> Distribution {
        Distribution::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![0.2, 0.3, 0.1],
            vec![0.1, 0.05, 0.15, 0.1],
        )
        .unwrap()
    }

    #[test]
    fn materialized_tree_follows_root_table() {
        let dist = abc();
        let sol = ObstEngine::new(&dist).run();
        let tree = materialize_tree(sol.root(), &dist, KeyRange::full(3))
            .unwrap()
            .unwrap();
        assert_eq!(tree.key, "b");
        assert_eq!(tree.probability, 0.3);
        assert_eq!(tree.left.as_ref().unwrap().key, "a");
        assert_eq!(tree.right.as_ref().unwrap().key, "c");
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.in_order_keys(), vec!["a", "b", "c"]);

        let cost = tree.expected_cost(dist.q()).unwrap();
        assert!((cost - sol.optimal_cost()).abs() < 1e-12);
        let cmp = tree.expected_comparisons(dist.q()).unwrap();
        assert!((cmp - sol.expected_comparisons()).abs() < 1e-12);
    }

    #[test]
    fn empty_range_materializes_nothing() {
        let dist = abc();
        let sol = ObstEngine::new(&dist).run();
        assert!(materialize_tree(sol.root(), &dist, KeyRange::new(2, 2))
            .unwrap()
            .is_none());
    }

    #[test]
    fn shape_cost_matches_materialized_cost() {
        let dist = abc();
        for shape in [
            &BalancedShape { n: 3 } as &dyn TreeShape,
            &ChainShape { n: 3, leftmost: true },
            &ChainShape { n: 3, leftmost: false },
        ] {
            let tree = materialize_tree(shape, &dist, KeyRange::full(3))
                .unwrap()
                .unwrap();
            let direct = expected_cost_of(shape, &dist).unwrap();
            assert!((direct - tree.expected_cost(dist.q()).unwrap()).abs() < 1e-12);
            assert_eq!(tree.in_order_keys(), vec!["a", "b", "c"]);
        }
    }

    #[test]
    fn corrupt_root_is_reported() {
        let dist = abc();
        let mut raw: Table<usize> = Table::new(4);
        raw[(0, 3)] = 3; // outside [0, 3)
        let corrupt = RootTable::from_table(raw);
        assert!(matches!(
            materialize_tree(&corrupt, &dist, KeyRange::full(3)),
            Err(ObstError::InvalidRange { start: 0, end: 3, root: 3 })
        ));
        assert!(matches!(
            expected_cost_of(&corrupt, &dist),
            Err(ObstError::InvalidRange { .. })
        ));
    }

    #[test]
    fn mismatched_shape_is_rejected() {
        let dist = abc();
        assert!(matches!(
            materialize_tree(&BalancedShape { n: 4 }, &dist, KeyRange::full(3)),
            Err(ObstError::LengthMismatch { what: "tree shape", .. })
        ));
        let tree = materialize_tree(&BalancedShape { n: 3 }, &dist, KeyRange::full(3))
            .unwrap()
            .unwrap();
        assert!(tree.expected_cost(&[0.0; 3]).is_err());
    }
}
