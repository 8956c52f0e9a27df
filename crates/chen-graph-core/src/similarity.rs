//! Two-tier similarity decision: structural identity first, edit distance second

use crate::diff::diff;
use crate::edit_distance::{search_edit_distance, SearchBounds, DEFAULT_UPPER_BOUND};
use crate::graph::Graph;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Thresholds for [`is_similar`].
///
/// The defaults are empirical; there is no deeper derivation behind them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Graphs closer than this many edits are similar.
    pub edit_distance_threshold: usize,
    pub upper_bound: usize,
    pub timeout_secs: u64,
}

impl SimilarityConfig {
    pub fn bounds(&self) -> SearchBounds {
        SearchBounds {
            upper_bound: self.upper_bound,
            timeout: Some(Duration::from_secs(self.timeout_secs)),
        }
    }
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            edit_distance_threshold: 10,
            upper_bound: DEFAULT_UPPER_BOUND,
            timeout_secs: 5,
        }
    }
}

/// How a similarity decision was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Label-set identical; no edit-distance search was run.
    Identical,
    /// Edit distance below the threshold.
    Near(usize),
    /// Edit distance at or above the threshold.
    Distant(usize),
    /// The search produced no distance within its bounds.
    Unresolved,
}

impl Verdict {
    pub fn is_similar(&self) -> bool {
        matches!(self, Verdict::Identical | Verdict::Near(_))
    }
}

/// Compare two graphs and report how the decision was reached.
pub fn compare(first: &Graph, second: &Graph, config: &SimilarityConfig) -> Verdict {
    if diff(Some(first), Some(second), false).is_empty() {
        tracing::debug!("Graphs are structurally identical");
        return Verdict::Identical;
    }
    match search_edit_distance(first, second, &config.bounds()) {
        None => Verdict::Unresolved,
        Some(d) if d < config.edit_distance_threshold => Verdict::Near(d),
        Some(d) => Verdict::Distant(d),
    }
}

/// True if the graphs are label-set identical or within the edit-distance threshold.
pub fn is_similar(first: &Graph, second: &Graph, config: &SimilarityConfig) -> bool {
    compare(first, second, config).is_similar()
}
