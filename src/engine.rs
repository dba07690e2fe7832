//! Optimal-BST dynamic program.
//!
//! The engine fills three `(n + 1) × (n + 1)` tables over half-open key
//! ranges `[i, j)`:
//! - `W[i][j]`: probability mass spanned by the range (keys `i..j`, gaps `i..=j`),
//! - `C[i][j]`: minimum expected search cost of a subtree over the range,
//! - `R[i][j]`: the key index rooting that optimal subtree.
//!
//! Base case: `C[i][i] = W[i][i] = q[i]`, `R[i][i] = i`. Ranges are then
//! processed by increasing length `L = j - i`:
//!
//! ```text
//! W[i][j] = W[i][j-1] + p[j-1] + q[j]
//! C[i][j] = min over r in [i, j) of C[i][r] + C[r+1][j] + W[i][j]
//! R[i][j] = the first r reaching that minimum
//! ```
//!
//! Every cell of diagonal `L` reads only diagonals `< L`, so with the
//! `parallel` feature a diagonal is filled concurrently and then written back
//! in one step; results are bit-identical to the sequential fill.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::Result;
use crate::probability::Distribution;
use crate::range::KeyRange;
use crate::table::Table;
use crate::traits::TreeShape;

/// Which roots are scanned for each range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScanWindow {
    /// Every `r` in `[i, j)`; O(n³) overall.
    #[default]
    Full,
    /// Knuth's bound `R[i][j-1] <= r <= R[i+1][j]`; O(n²) overall.
    Knuth,
}

/// Root matrix of a solved instance. Encodes the whole optimal tree shape.
#[derive(Clone, Debug, PartialEq)]
pub struct RootTable {
    table: Table<usize>,
}

impl RootTable {
    /// Wrap a raw `(n + 1) × (n + 1)` root table.
    ///
    /// No validation happens here; lookups that escape their range are
    /// reported by the consumers as [`ObstError::InvalidRange`](crate::ObstError::InvalidRange).
    pub fn from_table(table: Table<usize>) -> Self {
        Self { table }
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> usize {
        self.table[(i, j)]
    }

    pub fn table(&self) -> &Table<usize> {
        &self.table
    }
}

impl TreeShape for RootTable {
    fn num_keys(&self) -> usize {
        self.table.dim().saturating_sub(1)
    }

    fn root_of(&self, range: KeyRange) -> usize {
        self.table[(range.start, range.end)]
    }
}

/// Output of [`ObstEngine::run`].
#[derive(Clone, Debug, PartialEq)]
pub struct ObstSolution {
    cost: Table<f64>,
    weight: Table<f64>,
    root: RootTable,
    dummy_mass: f64,
}

impl ObstSolution {
    /// Number of keys the tables were built over.
    pub fn num_keys(&self) -> usize {
        self.root.num_keys()
    }

    /// `C[0][n]`: expected cost with every gap charged one level below its
    /// parent key.
    pub fn optimal_cost(&self) -> f64 {
        self.cost[(0, self.num_keys())]
    }

    /// Expected number of key comparisons per search: `C[0][n] - sum(q)`.
    ///
    /// An unsuccessful search stops at the last key compared, one level above
    /// the gap `C` charges it to.
    pub fn expected_comparisons(&self) -> f64 {
        self.optimal_cost() - self.dummy_mass
    }

    pub fn cost(&self) -> &Table<f64> {
        &self.cost
    }

    pub fn weight(&self) -> &Table<f64> {
        &self.weight
    }

    pub fn root(&self) -> &RootTable {
        &self.root
    }

    pub fn into_parts(self) -> (Table<f64>, Table<f64>, RootTable) {
        (self.cost, self.weight, self.root)
    }
}

/// One solved cell of a diagonal.
#[derive(Clone, Copy, Debug)]
struct Cell {
    weight: f64,
    cost: f64,
    root: usize,
}

/// Optimal-BST engine for a validated [`Distribution`].
///
/// Typical usage:
/// ```
/// use obst_dp::{Distribution, ObstEngine};
///
/// let keys = vec!["a".to_string(), "b".to_string(), "c".to_string()];
/// let dist = Distribution::new(keys, vec![0.2, 0.3, 0.1], vec![0.1, 0.05, 0.15, 0.1]).unwrap();
/// let solution = ObstEngine::new(&dist).run();
/// assert_eq!(solution.root().get(0, 3), 1);
/// println!("optimal cost: {}", solution.optimal_cost());
/// ```
pub struct ObstEngine<'a> {
    dist: &'a Distribution,
    window: ScanWindow,
    parallel_min_width: usize,
}

/// Diagonals narrower than this are filled sequentially by default.
pub const DEFAULT_PARALLEL_MIN_WIDTH: usize = 64;

impl<'a> ObstEngine<'a> {
    /// Create an engine with the full root scan.
    pub fn new(dist: &'a Distribution) -> Self {
        Self::with_options(dist, ScanWindow::Full, DEFAULT_PARALLEL_MIN_WIDTH)
    }

    /// Create an engine with explicit options.
    ///
    /// `parallel_min_width` only matters with the `parallel` feature; it is
    /// clamped to at least 1.
    pub fn with_options(
        dist: &'a Distribution,
        window: ScanWindow,
        parallel_min_width: usize,
    ) -> Self {
        Self {
            dist,
            window,
            parallel_min_width: parallel_min_width.max(1),
        }
    }

    pub fn distribution(&self) -> &Distribution {
        self.dist
    }

    pub fn window(&self) -> ScanWindow {
        self.window
    }

    pub fn parallel_min_width(&self) -> usize {
        self.parallel_min_width
    }

    /// Fill the tables and return the solution.
    pub fn run(&self) -> ObstSolution {
        let n = self.dist.len();
        let q = self.dist.q();
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("build_obst", n, window = ?self.window).entered();

        let mut cost = Table::new(n + 1);
        let mut weight = Table::new(n + 1);
        let mut root = Table::new(n + 1);
        for (i, &qi) in q.iter().enumerate() {
            cost[(i, i)] = qi;
            weight[(i, i)] = qi;
            root[(i, i)] = i;
        }

        for len in 1..=n {
            let width = n - len + 1;
            #[cfg(feature = "tracing")]
            let _diag = tracing::trace_span!("fill_diagonal", len, width).entered();

            let cells = self.solve_diagonal(len, width, &cost, &weight, &root);
            for (i, cell) in cells.into_iter().enumerate() {
                let j = i + len;
                weight[(i, j)] = cell.weight;
                cost[(i, j)] = cell.cost;
                root[(i, j)] = cell.root;
            }
        }

        let dummy_mass = self.dist.dummy_mass();
        #[cfg(feature = "tracing")]
        tracing::debug!(optimal_cost = cost[(0, n)], root = root[(0, n)], "obst built");

        ObstSolution {
            cost,
            weight,
            root: RootTable::from_table(root),
            dummy_mass,
        }
    }

    #[cfg(feature = "parallel")]
    fn solve_diagonal(
        &self,
        len: usize,
        width: usize,
        cost: &Table<f64>,
        weight: &Table<f64>,
        root: &Table<usize>,
    ) -> Vec<Cell> {
        if width >= self.parallel_min_width {
            (0..width)
                .into_par_iter()
                .map(|i| self.solve_cell(i, i + len, cost, weight, root))
                .collect()
        } else {
            (0..width)
                .map(|i| self.solve_cell(i, i + len, cost, weight, root))
                .collect()
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn solve_diagonal(
        &self,
        len: usize,
        width: usize,
        cost: &Table<f64>,
        weight: &Table<f64>,
        root: &Table<usize>,
    ) -> Vec<Cell> {
        (0..width)
            .map(|i| self.solve_cell(i, i + len, cost, weight, root))
            .collect()
    }

    /// Solve range `[i, j)` from already-final shorter ranges.
    fn solve_cell(
        &self,
        i: usize,
        j: usize,
        cost: &Table<f64>,
        weight: &Table<f64>,
        root: &Table<usize>,
    ) -> Cell {
        let p = self.dist.p();
        let q = self.dist.q();
        let w = weight[(i, j - 1)] + p[j - 1] + q[j];

        let (lo, hi) = match self.window {
            ScanWindow::Knuth if j - i >= 2 => {
                let lo = root[(i, j - 1)];
                let hi = root[(i + 1, j)];
                // float noise can in principle cross the bounds
                if lo <= hi {
                    (lo, hi)
                } else {
                    (i, j - 1)
                }
            }
            _ => (i, j - 1),
        };

        let mut best = f64::INFINITY;
        let mut best_r = lo;
        for r in lo..=hi {
            let candidate = cost[(i, r)] + cost[(r + 1, j)] + w;
            if candidate < best {
                best = candidate;
                best_r = r;
            }
        }

        Cell {
            weight: w,
            cost: best,
            root: best_r,
        }
    }
}

/// Validate raw inputs and build the optimal BST tables.
///
/// `keys` must be non-empty and strictly ascending, `p` must hold one entry
/// per key and `q` one more. No tables are produced on failure.
pub fn build_optimal_bst(keys: &[String], p: &[f64], q: &[f64]) -> Result<ObstSolution> {
    let dist = Distribution::new(keys.to_vec(), p.to_vec(), q.to_vec())?;
    Ok(ObstEngine::new(&dist).run())
}
