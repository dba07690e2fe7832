//! End-to-end pipeline: load corpora, merge, select keys, build, search.
//!
//! ```no_run
//! use obst_dp::Pipeline;
//!
//! let report = Pipeline::new()
//!     .with_source("dictionary1.txt")
//!     .with_source("dictionary2.txt")
//!     .with_threshold(40_000)
//!     .with_query("said")
//!     .run()?;
//! println!("{report}");
//! # Ok::<(), obst_dp::ObstError>(())
//! ```
//!
//! A source that cannot be opened is logged and recorded in the report; the
//! remaining sources are still merged.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::builder::ObstEngineBuilder;
use crate::engine::{ObstSolution, ScanWindow, DEFAULT_PARALLEL_MIN_WIDTH};
use crate::error::Result;
use crate::frequency::{FrequencyTable, LoadStats};
use crate::probability::Distribution;
use crate::search::search_tree;

/// Frequency threshold used when none is configured.
pub const DEFAULT_THRESHOLD: u64 = 40_000;

/// Pipeline configuration.
#[derive(Clone, Debug)]
pub struct Pipeline {
    sources: Vec<PathBuf>,
    threshold: u64,
    window: ScanWindow,
    parallel_min_width: usize,
    queries: Vec<String>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            threshold: DEFAULT_THRESHOLD,
            window: ScanWindow::Full,
            parallel_min_width: DEFAULT_PARALLEL_MIN_WIDTH,
            queries: Vec::new(),
        }
    }
}

/// Outcome of loading one source file.
#[derive(Clone, Debug)]
pub struct SourceReport {
    pub path: PathBuf,
    /// `None` when the file could not be read.
    pub stats: Option<LoadStats>,
    pub error: Option<String>,
}

/// Owned trace of one configured query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchTrace {
    pub target: String,
    pub path: Vec<String>,
    pub comparisons: usize,
    pub found: bool,
}

/// Diagnostics and artifacts of one pipeline run.
#[derive(Clone, Debug)]
pub struct ObstReport {
    pub sources: Vec<SourceReport>,
    /// Distinct words in the merged corpus.
    pub corpus_words: usize,
    pub total_frequency: u64,
    /// Combined frequency of the selected keys.
    pub key_frequency: u64,
    pub threshold: u64,
    pub searches: Vec<SearchTrace>,
    pub distribution: Distribution,
    pub solution: ObstSolution,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(path.into());
        self
    }

    pub fn with_sources<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.sources.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Words with frequency `>= threshold` become keys.
    pub fn with_threshold(mut self, threshold: u64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_window(mut self, window: ScanWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_parallel_min_width(mut self, width: usize) -> Self {
        self.parallel_min_width = width;
        self
    }

    /// Word to search once the tree is built; may be repeated.
    pub fn with_query(mut self, word: impl Into<String>) -> Self {
        self.queries.push(word.into());
        self
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Load and merge every configured source, then build.
    pub fn run(&self) -> Result<ObstReport> {
        let mut corpus = FrequencyTable::new();
        let mut sources = Vec::with_capacity(self.sources.len());
        for path in &self.sources {
            sources.push(load_into(&mut corpus, path));
        }
        let mut report = self.run_on(&corpus)?;
        report.sources = sources;
        Ok(report)
    }

    /// Build from an already merged corpus.
    pub fn run_on(&self, corpus: &FrequencyTable) -> Result<ObstReport> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("pipeline", threshold = self.threshold).entered();

        let distribution = Distribution::from_threshold(corpus, self.threshold)?;
        let key_frequency = distribution
            .keys()
            .iter()
            .filter_map(|k| corpus.get(k))
            .fold(0u64, |acc, f| acc.saturating_add(f));

        #[cfg(feature = "tracing")]
        tracing::info!(
            corpus_words = corpus.len(),
            total_frequency = corpus.total(),
            keys = distribution.len(),
            key_frequency,
            "keys selected"
        );

        let solution = ObstEngineBuilder::new(&distribution)
            .with_window(self.window)
            .with_parallel_min_width(self.parallel_min_width)
            .build()
            .run();

        let mut searches = Vec::with_capacity(self.queries.len());
        for target in &self.queries {
            let outcome = search_tree(distribution.keys(), solution.root(), target)?;
            searches.push(SearchTrace {
                target: target.clone(),
                path: outcome.path.iter().map(|k| k.to_string()).collect(),
                comparisons: outcome.comparisons,
                found: outcome.found,
            });
        }

        Ok(ObstReport {
            sources: Vec::new(),
            corpus_words: corpus.len(),
            total_frequency: corpus.total(),
            key_frequency,
            threshold: self.threshold,
            searches,
            distribution,
            solution,
        })
    }
}

fn load_into(corpus: &mut FrequencyTable, path: &Path) -> SourceReport {
    match FrequencyTable::load(path) {
        Ok((table, stats)) => {
            corpus.merge(&table);
            SourceReport {
                path: path.to_path_buf(),
                stats: Some(stats),
                error: None,
            }
        }
        Err(err) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(path = %path.display(), "skipping unreadable source: {err}");
            SourceReport {
                path: path.to_path_buf(),
                stats: None,
                error: Some(err.to_string()),
            }
        }
    }
}

impl ObstReport {
    pub fn key_count(&self) -> usize {
        self.distribution.len()
    }

    pub fn optimal_cost(&self) -> f64 {
        self.solution.optimal_cost()
    }

    pub fn expected_comparisons(&self) -> f64 {
        self.solution.expected_comparisons()
    }

    /// Key at the root of the optimal tree.
    pub fn root_key(&self) -> &str {
        let n = self.distribution.len();
        &self.distribution.keys()[self.solution.root().get(0, n)]
    }
}

impl fmt::Display for ObstReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for source in &self.sources {
            match (&source.stats, &source.error) {
                (Some(stats), _) => writeln!(
                    f,
                    "source {}: {} lines loaded, {} skipped",
                    source.path.display(),
                    stats.loaded,
                    stats.skipped
                )?,
                (None, Some(err)) => {
                    writeln!(f, "source {}: unreadable ({err})", source.path.display())?
                }
                (None, None) => writeln!(f, "source {}: not loaded", source.path.display())?,
            }
        }
        writeln!(f, "corpus words:          {}", self.corpus_words)?;
        writeln!(f, "total frequency:       {}", self.total_frequency)?;
        writeln!(
            f,
            "keys (freq >= {}):  {} (frequency {})",
            self.threshold,
            self.key_count(),
            self.key_frequency
        )?;
        writeln!(
            f,
            "key / dummy mass:      {:.6} / {:.6}",
            self.distribution.key_mass(),
            self.distribution.dummy_mass()
        )?;
        writeln!(f, "root key:              {}", self.root_key())?;
        writeln!(f, "optimal cost:          {:.6}", self.optimal_cost())?;
        writeln!(f, "expected comparisons:  {:.6}", self.expected_comparisons())?;
        for trace in &self.searches {
            writeln!(
                f,
                "search {:?}: {} ({} comparisons) via [{}]",
                trace.target,
                if trace.found { "found" } else { "not found" },
                trace.comparisons,
                trace.path.join(" -> ")
            )?;
        }
        Ok(())
    }
}
