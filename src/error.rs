//! Error taxonomy shared by every stage of the pipeline.
//!
//! Loader-local problems (`MalformedInputLine`) are produced by the line
//! parser and swallowed by [`crate::frequency::FrequencyTable`]; everything
//! else reaches the caller through [`Result`].

use std::io;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ObstError>;

#[derive(Debug, thiserror::Error)]
pub enum ObstError {
    /// Total corpus frequency is zero, so no probability can be formed.
    #[error("corpus has zero total frequency")]
    EmptyCorpus,

    /// No key survived selection; callers may retry with a lower threshold.
    #[error("key set is empty")]
    EmptyKeySet,

    #[error("malformed input at line {line}: {reason}")]
    MalformedInputLine { line: usize, reason: String },

    /// Keys must be strictly increasing; `index` is the first offending key.
    #[error("keys are not strictly ascending at index {index}")]
    UnsortedKeys { index: usize },

    #[error("key {0:?} is not present in the frequency table")]
    UnknownKey(String),

    #[error("{what} has length {actual}, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{what}[{index}] is negative or not finite")]
    NegativeProbability { what: &'static str, index: usize },

    /// A root lookup escaped its window; the root table is corrupt.
    #[error("root {root} lies outside range [{start}, {end})")]
    InvalidRange {
        start: usize,
        end: usize,
        root: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
