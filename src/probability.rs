//! Probability model: turns a frequency table and an ordered key subset into
//! key probabilities `p` and gap ("dummy") probabilities `q`.
//!
//! For keys `k_0 < k_1 < … < k_{n-1}`:
//! - `p[i]` is the frequency of `k_i` divided by the corpus total,
//! - `q[0]` collects every excluded word below `k_0`, `q[i]` every excluded
//!   word strictly between `k_{i-1}` and `k_i`, and `q[n]` every excluded word
//!   above `k_{n-1}`.
//!
//! Because [`FrequencyTable`] iterates in word order, the gaps are filled in a
//! single merge pass over the table with a cursor into the key list.

use crate::error::{ObstError, Result};
use crate::frequency::FrequencyTable;
use crate::utils;

/// Ordered keys with their key and gap probabilities.
///
/// Invariants (checked on construction):
/// - `keys` is non-empty and strictly ascending,
/// - `p.len() == keys.len()`, `q.len() == keys.len() + 1`,
/// - every probability is finite and non-negative.
#[derive(Clone, Debug, PartialEq)]
pub struct Distribution {
    keys: Vec<String>,
    p: Vec<f64>,
    q: Vec<f64>,
}

pub(crate) fn check_ascending<K: AsRef<str>>(keys: &[K]) -> Result<()> {
    match keys
        .windows(2)
        .position(|w| w[0].as_ref() >= w[1].as_ref())
    {
        Some(i) => Err(ObstError::UnsortedKeys { index: i + 1 }),
        None => Ok(()),
    }
}

fn check_probabilities(what: &'static str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite() || *v < 0.0) {
        Some(index) => Err(ObstError::NegativeProbability { what, index }),
        None => Ok(()),
    }
}

impl Distribution {
    /// Wrap raw vectors after validating the invariants above.
    pub fn new(keys: Vec<String>, p: Vec<f64>, q: Vec<f64>) -> Result<Self> {
        let n = keys.len();
        if n == 0 {
            return Err(ObstError::EmptyKeySet);
        }
        if p.len() != n {
            return Err(ObstError::LengthMismatch {
                what: "p",
                expected: n,
                actual: p.len(),
            });
        }
        if q.len() != n + 1 {
            return Err(ObstError::LengthMismatch {
                what: "q",
                expected: n + 1,
                actual: q.len(),
            });
        }
        check_ascending(&keys)?;
        check_probabilities("p", &p)?;
        check_probabilities("q", &q)?;
        Ok(Self { keys, p, q })
    }

    /// Compute `p` and `q` for `keys` against `table`.
    ///
    /// Fails with [`ObstError::EmptyCorpus`] when the table total is zero,
    /// [`ObstError::EmptyKeySet`] for an empty key list,
    /// [`ObstError::UnsortedKeys`] when keys are not strictly ascending and
    /// [`ObstError::UnknownKey`] when a key is missing from the table.
    pub fn from_table(table: &FrequencyTable, keys: Vec<String>) -> Result<Self> {
        let total = table.total();
        if total == 0 {
            return Err(ObstError::EmptyCorpus);
        }
        if keys.is_empty() {
            return Err(ObstError::EmptyKeySet);
        }
        check_ascending(&keys)?;

        let n = keys.len();
        let mut key_freq = Vec::with_capacity(n);
        for key in &keys {
            let freq = table
                .get(key)
                .ok_or_else(|| ObstError::UnknownKey(key.clone()))?;
            key_freq.push(freq);
        }

        // Single merge pass: `gap` is the first key not below the current word.
        let mut gap_freq = vec![0u64; n + 1];
        let mut gap = 0usize;
        for (word, freq) in table.iter() {
            while gap < n && keys[gap].as_str() < word {
                gap += 1;
            }
            if gap < n && keys[gap] == word {
                continue;
            }
            gap_freq[gap] = gap_freq[gap].saturating_add(freq);
        }

        let total = total as f64;
        let p = key_freq.into_iter().map(|f| f as f64 / total).collect();
        let q = gap_freq.into_iter().map(|f| f as f64 / total).collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(keys = n, corpus = table.len(), "probabilities computed");

        Ok(Self { keys, p, q })
    }

    /// Use every word with frequency `>= threshold` as a key.
    pub fn from_threshold(table: &FrequencyTable, threshold: u64) -> Result<Self> {
        Self::from_table(table, table.keys_at_least(threshold))
    }

    /// Number of keys `n`.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false; a distribution holds at least one key.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Key probabilities, `n` entries.
    pub fn p(&self) -> &[f64] {
        &self.p
    }

    /// Gap probabilities, `n + 1` entries.
    pub fn q(&self) -> &[f64] {
        &self.q
    }

    /// Index of `key` in the ordered key list.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.keys.binary_search_by(|k| k.as_str().cmp(key)).ok()
    }

    pub fn key_mass(&self) -> f64 {
        utils::sum(&self.p)
    }

    pub fn dummy_mass(&self) -> f64 {
        utils::sum(&self.q)
    }

    /// `sum(p) + sum(q)`; one (within tolerance) for table-derived models.
    pub fn total_mass(&self) -> f64 {
        self.key_mass() + self.dummy_mass()
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<f64>, Vec<f64>) {
        (self.keys, self.p, self.q)
    }
}

/// Compute the key/gap distribution for `keys` over `table`.
pub fn compute_probabilities(table: &FrequencyTable, keys: &[String]) -> Result<Distribution> {
    Distribution::from_table(table, keys.to_vec())
}
