//! Core trait for anything that fixes the shape of a BST over ordered keys.
//!
//! A BST over keys `0..n` is fully determined by answering, for every
//! half-open [`KeyRange`] that can appear during a top-down walk, which key
//! index roots that range. The optimal [`RootTable`](crate::engine::RootTable)
//! is one such answer; [`BalancedShape`] and [`ChainShape`] are others and are
//! handy as baselines when checking optimality.
//!
//! Materialization, expected-cost evaluation and search are all written
//! against this trait, so they walk every shape the same way.

use crate::range::KeyRange;

/// Trait for a fixed BST shape over `num_keys()` ordered keys.
///
/// Semantics:
/// - `root_of(range)` is only asked for non-empty ranges reachable from
///   `KeyRange::full(num_keys())` by repeatedly splitting at the returned root.
/// - A well-formed shape always returns an index inside `range`. Callers treat
///   anything else as corruption (see [`ObstError::InvalidRange`](crate::ObstError::InvalidRange)).
pub trait TreeShape {
    /// Number of keys the shape is defined over.
    fn num_keys(&self) -> usize;

    /// Root key index for the non-empty `range`.
    fn root_of(&self, range: KeyRange) -> usize;
}

impl<S: TreeShape + ?Sized> TreeShape for &S {
    fn num_keys(&self) -> usize {
        (**self).num_keys()
    }

    fn root_of(&self, range: KeyRange) -> usize {
        (**self).root_of(range)
    }
}

/// Shape that always roots a range at its (lower) midpoint.
#[derive(Clone, Copy, Debug)]
pub struct BalancedShape {
    pub n: usize,
}

impl TreeShape for BalancedShape {
    fn num_keys(&self) -> usize {
        self.n
    }

    fn root_of(&self, range: KeyRange) -> usize {
        range.start + (range.len() - 1) / 2
    }
}

/// Degenerate shape rooting every range at its first (or last) key.
#[derive(Clone, Copy, Debug)]
pub struct ChainShape {
    pub n: usize,
    pub leftmost: bool,
}

impl TreeShape for ChainShape {
    fn num_keys(&self) -> usize {
        self.n
    }

    fn root_of(&self, range: KeyRange) -> usize {
        if self.leftmost {
            range.start
        } else {
            range.end - 1
        }
    }
}
