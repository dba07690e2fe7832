//! Word-frequency tables: loading, merging and threshold selection.
//!
//! Input files hold one `"<frequency> <word>"` entry per line. Blank lines are
//! ignored and malformed lines are skipped (and counted) rather than aborting
//! the load. Words are kept in a `BTreeMap`, so iteration is always in the
//! lexicographic order the probability model relies on.

use std::collections::btree_map::{self, BTreeMap};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{ObstError, Result};

/// Mapping word → non-negative integer frequency, ordered by word.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    words: BTreeMap<String, u64>,
}

/// Outcome counters for a single load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Lines that produced an entry (duplicates included).
    pub loaded: usize,
    /// Non-blank lines that failed to parse.
    pub skipped: usize,
}

/// Parse one line of a frequency file.
///
/// Returns `Ok(None)` for blank lines. `line_no` is 1-based and only used for
/// error reporting.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<(String, u64)>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let mut tokens = line.split_whitespace();
    let (Some(freq), Some(word), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(ObstError::MalformedInputLine {
            line: line_no,
            reason: "expected `<frequency> <word>`".to_string(),
        });
    };
    let freq: u64 = freq.parse().map_err(|e| ObstError::MalformedInputLine {
        line: line_no,
        reason: format!("invalid frequency {freq:?}: {e}"),
    })?;
    Ok(Some((word.to_string(), freq)))
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from in-memory text.
    pub fn from_text(text: &str) -> (Self, LoadStats) {
        let mut table = Self::new();
        let mut stats = LoadStats::default();
        for (idx, line) in text.lines().enumerate() {
            table.ingest(idx + 1, line, &mut stats);
        }
        (table, stats)
    }

    /// Build a table from a buffered reader.
    ///
    /// Lines that are not valid UTF-8 count as malformed; any other read
    /// failure is returned as [`ObstError::Io`].
    pub fn from_reader<R: BufRead>(reader: R) -> Result<(Self, LoadStats)> {
        let mut table = Self::new();
        let mut stats = LoadStats::default();
        for (idx, line) in reader.lines().enumerate() {
            match line {
                Ok(line) => table.ingest(idx + 1, &line, &mut stats),
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    stats.skipped += 1;
                    #[cfg(feature = "tracing")]
                    tracing::warn!(line = idx + 1, "skipping non UTF-8 line");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok((table, stats))
    }

    /// Load a frequency file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, LoadStats)> {
        let path = path.as_ref();
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("load_frequencies", path = %path.display()).entered();
        let file = File::open(path)?;
        let (table, stats) = Self::from_reader(BufReader::new(file))?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            words = table.len(),
            loaded = stats.loaded,
            skipped = stats.skipped,
            "frequency file loaded"
        );
        Ok((table, stats))
    }

    fn ingest(&mut self, line_no: usize, line: &str, stats: &mut LoadStats) {
        match parse_line(line_no, line) {
            Ok(Some((word, freq))) => {
                self.insert(word, freq);
                stats.loaded += 1;
            }
            Ok(None) => {}
            Err(_err) => {
                stats.skipped += 1;
                #[cfg(feature = "tracing")]
                tracing::warn!("{_err}");
            }
        }
    }

    /// Set the frequency of `word`, replacing any previous value.
    pub fn insert(&mut self, word: impl Into<String>, freq: u64) -> Option<u64> {
        self.words.insert(word.into(), freq)
    }

    pub fn get(&self, word: &str) -> Option<u64> {
        self.words.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Sum of all frequencies (saturating).
    pub fn total(&self) -> u64 {
        self.words
            .values()
            .fold(0u64, |acc, &f| acc.saturating_add(f))
    }

    /// Entries in ascending word order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.words.iter().map(|(w, &f)| (w.as_str(), f))
    }

    /// Add every entry of `other` into `self`, summing on collision.
    pub fn merge(&mut self, other: &FrequencyTable) {
        for (word, &freq) in &other.words {
            match self.words.entry(word.clone()) {
                btree_map::Entry::Occupied(mut e) => {
                    let merged = e.get().saturating_add(freq);
                    e.insert(merged);
                }
                btree_map::Entry::Vacant(e) => {
                    e.insert(freq);
                }
            }
        }
    }

    /// Non-destructive variant of [`merge`](Self::merge).
    pub fn merged(&self, other: &FrequencyTable) -> FrequencyTable {
        let mut out = self.clone();
        out.merge(other);
        out
    }

    /// Keep only words whose frequency is at least `threshold`.
    pub fn filter_threshold(&self, threshold: u64) -> FrequencyTable {
        self.words
            .iter()
            .filter(|(_, &f)| f >= threshold)
            .map(|(w, &f)| (w.clone(), f))
            .collect()
    }

    /// Ascending list of words whose frequency is at least `threshold`.
    pub fn keys_at_least(&self, threshold: u64) -> Vec<String> {
        self.words
            .iter()
            .filter(|(_, &f)| f >= threshold)
            .map(|(w, _)| w.clone())
            .collect()
    }
}

impl FromIterator<(String, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, u64)>>(iter: I) -> Self {
        iter.into_iter().map(|(w, f)| (w.to_string(), f)).collect()
    }
}
