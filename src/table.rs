//! Dense square tables backing the cost, weight and root matrices.

use std::ops::{Index, IndexMut};

/// Row-major `(n + 1) × (n + 1)` table indexed by `(i, j)`.
///
/// Only the upper triangle (`i <= j`) is meaningful for the OBST tables; the
/// rest is left at `T::default()`.
#[derive(Clone, Debug, PartialEq)]
pub struct Table<T> {
    dim: usize,
    cells: Vec<T>,
}

impl<T: Copy + Default> Table<T> {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            cells: vec![T::default(); dim * dim],
        }
    }

    /// Side length of the table.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        if i < self.dim && j < self.dim {
            Some(self.cells[i * self.dim + j])
        } else {
            None
        }
    }

    /// Row `i` as a slice.
    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        &self.cells[i * self.dim..(i + 1) * self.dim]
    }

    /// Iterate over the rows of the table.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.dim.max(1))
    }
}

impl<T> Index<(usize, usize)> for Table<T> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.cells[i * self.dim + j]
    }
}

impl<T> IndexMut<(usize, usize)> for Table<T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        &mut self.cells[i * self.dim + j]
    }
}
