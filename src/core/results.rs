//! Result records exposed to the external reporting component.
//!
//! Everything here is plain serde data: the reporting collaborator renders
//! human-readable text/JSON from these records, the engine never does.

use serde::{Deserialize, Serialize};

use crate::core::config::StructuralMethod;

/// Severity band derived from the final fused score.
///
/// Bands are closed on the lower edge of the higher band: 90.0 is SEVERE,
/// 60.0 is PARTIAL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Score below the partial threshold; no action suggested
    Clean,
    /// Score in the partial band; significant overlap
    Partial,
    /// Score at or above the severe threshold; near-identical logic
    Severe,
}

/// Explanation depth requested from the reporting collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationDepth {
    /// Standard interpretation
    Medium,
    /// Detailed walkthrough for high scores or complex questions
    Deep,
}

/// Per-method structural scores feeding the combined structural signal.
///
/// A `None` component was unavailable for this comparison (for example the
/// tree engine ran against an unparseable submission); the combiner
/// renormalizes its weights over what remains.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralBreakdown {
    /// Greedy string tiling coverage percentage
    pub tiling: Option<f64>,
    /// Tree similarity percentage
    pub tree: Option<f64>,
    /// Optional third structural method percentage
    pub third_method: Option<f64>,
    /// True when a component was missing or flagged unparseable, so the
    /// structural signal carries reduced confidence
    pub degraded: bool,
}

/// Complete result of one pairwise comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    /// Lexical similarity signal, as provided by the external analyzer
    pub lexical: f64,
    /// Combined structural similarity percentage
    pub structural: f64,
    /// Semantic similarity signal, as provided by the external analyzer
    pub semantic: f64,
    /// Weighted base score before bias adjustments
    pub raw_score: f64,
    /// Final score after the bias pipeline, in [0, 100]
    pub final_score: f64,
    /// Ordered, human-readable log of every bias adjustment applied
    pub adjustments: Vec<String>,
    /// Severity band of `final_score`
    pub severity: Severity,
    /// Identifier of the most similar counterpart submission; filled by
    /// the batch driver, `None` for standalone pair comparisons
    pub most_similar_to: Option<String>,
    /// Confidence in the final score, in [0, 1]
    pub confidence: f64,
    /// Structural method that produced the structural signal
    pub structural_method: StructuralMethod,
    /// Per-method structural scores
    pub structural_breakdown: StructuralBreakdown,
}

/// Marker for a pairwise comparison that failed.
///
/// A failing pair never aborts the batch; it is recorded here and excluded
/// from most-similar selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairError {
    /// First submission of the failed pair
    pub a: String,
    /// Second submission of the failed pair
    pub b: String,
    /// Human-readable failure description
    pub error: String,
}

/// Batch result for one submission: its strongest match across the batch
/// plus any comparisons that failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReport {
    /// Submission this report covers
    pub submission_id: String,
    /// Result against the most similar counterpart; `None` when every
    /// comparison involving this submission failed or the batch had no
    /// counterpart
    pub best_match: Option<SimilarityResult>,
    /// Comparisons involving this submission that failed
    pub failed_pairs: Vec<PairError>,
}
