//! Engine facade and pairwise batch driver.
//!
//! [`TesseraEngine`] validates its configuration once at construction and
//! then exposes pure pairwise comparison. The batch driver fans the O(N²)
//! comparisons out across a rayon worker pool; each comparison is a pure
//! function of two immutable submissions and the configuration, so the
//! result is independent of thread scheduling. A failing pair is recorded
//! with an error marker and never aborts the batch.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::core::config::TesseraConfig;
use crate::core::errors::{Result, TesseraError};
use crate::core::results::{PairError, SimilarityResult, SubmissionReport};
use crate::core::submission::Submission;
use crate::detectors::structural::StructuralCombiner;
use crate::detectors::tiling::TilingEngine;
use crate::detectors::tree::TreeSimilarityEngine;
use crate::fusion::explanation::ExplanationSelector;
use crate::fusion::{SignalFusionEngine, SignalSet};

/// Pre-computed external signals for one pair, supplied by the lexical and
/// semantic analyzers. The engine treats them as opaque floats in [0, 100].
#[derive(Debug, Clone, Copy, Default)]
pub struct ExternalSignals {
    /// Lexical similarity score
    pub lexical: f64,
    /// Semantic similarity score
    pub semantic: f64,
    /// Boilerplate/common-algorithm fingerprint, when the external
    /// fingerprinter flagged this pair
    pub boilerplate: Option<f64>,
    /// Optional third structural method score, when a third structural
    /// engine runs alongside tiling and tree matching
    pub structural_third: Option<f64>,
}

impl ExternalSignals {
    /// Create a signal set from the two mandatory analyzer scores.
    pub fn new(lexical: f64, semantic: f64) -> Self {
        Self {
            lexical,
            semantic,
            ..Self::default()
        }
    }
}

/// One pairwise comparison request.
#[derive(Debug, Clone, Copy)]
pub struct PairInput<'a> {
    /// First submission
    pub a: &'a Submission,
    /// Second submission
    pub b: &'a Submission,
    /// External analyzer signals for this pair
    pub signals: ExternalSignals,
}

/// Seam for the external lexical/semantic analyzers used during batch
/// analysis. A provider error marks that pair as failed; the batch
/// proceeds with the remaining pairs.
pub trait PairSignalProvider: Sync {
    /// Produce the external signals for one ordered pair.
    fn signals(&self, a: &Submission, b: &Submission) -> Result<ExternalSignals>;
}

/// The structural-similarity and signal-fusion engine.
#[derive(Debug, Clone)]
pub struct TesseraEngine {
    config: TesseraConfig,
    tiling: TilingEngine,
    tree: TreeSimilarityEngine,
    combiner: StructuralCombiner,
    fusion: SignalFusionEngine,
    explanation: ExplanationSelector,
}

impl TesseraEngine {
    /// Create an engine. Invalid configuration fails here, before any
    /// comparison runs.
    pub fn new(config: TesseraConfig) -> Result<Self> {
        config.validate()?;

        let fusion = SignalFusionEngine::new(&config.fusion, &config.bias, &config.thresholds)?;

        Ok(Self {
            tiling: TilingEngine::new(&config.tiling),
            tree: TreeSimilarityEngine::new(&config.tree),
            combiner: StructuralCombiner::new(&config.structural),
            explanation: ExplanationSelector::new(&config.thresholds),
            fusion,
            config,
        })
    }

    /// The validated configuration this engine runs with.
    pub fn config(&self) -> &TesseraConfig {
        &self.config
    }

    /// Explanation depth selector for the reporting collaborator.
    pub fn explanation_selector(&self) -> &ExplanationSelector {
        &self.explanation
    }

    /// Run one pairwise comparison.
    ///
    /// Empty token streams score 0% by definition (two blank submissions
    /// are not similar to each other); a missing syntax tree degrades the
    /// structural signal instead of failing.
    pub fn compare_pair(&self, input: &PairInput<'_>) -> Result<SimilarityResult> {
        if let Some(third) = input.signals.structural_third {
            if !(0.0..=100.0).contains(&third) {
                return Err(TesseraError::validation_with_values(
                    "third structural score out of range",
                    "structural_third",
                    "0.0..=100.0",
                    format!("{third}"),
                ));
            }
        }

        let tiling = self.tiling.compare(&input.a.tokens, &input.b.tokens);

        let tree = self
            .tree
            .compare(input.a.tree.as_ref(), input.b.tree.as_ref());
        let tree_component = if tree.is_unparseable() {
            None
        } else {
            Some(tree.score)
        };

        let structural = self.combiner.combine(
            Some(tiling.coverage),
            tree_component,
            input.signals.structural_third,
        );

        debug!(
            a = %input.a.id,
            b = %input.b.id,
            tiling = tiling.coverage,
            tree = ?tree_component,
            structural = structural.score,
            "pairwise structural scores"
        );

        self.fusion.fuse(&SignalSet {
            lexical: input.signals.lexical,
            structural,
            semantic: input.signals.semantic,
            boilerplate: input.signals.boilerplate,
        })
    }

    /// Analyze a whole batch of submissions against each other.
    ///
    /// Every unordered pair is compared once, in parallel. Each submission's
    /// report carries the result against its most similar counterpart
    /// (highest final score; ties broken by submission input order) plus
    /// markers for any comparisons that failed.
    pub fn analyze_batch(
        &self,
        submissions: &[Submission],
        provider: &dyn PairSignalProvider,
    ) -> Vec<SubmissionReport> {
        let n = submissions.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();

        info!(
            submissions = n,
            comparisons = pairs.len(),
            "starting batch analysis"
        );

        let outcomes: Vec<(usize, usize, Result<SimilarityResult>)> = pairs
            .par_iter()
            .map(|&(i, j)| {
                let result = provider
                    .signals(&submissions[i], &submissions[j])
                    .and_then(|signals| {
                        self.compare_pair(&PairInput {
                            a: &submissions[i],
                            b: &submissions[j],
                            signals,
                        })
                    });
                (i, j, result)
            })
            .collect();

        let mut reports: Vec<SubmissionReport> = submissions
            .iter()
            .map(|s| SubmissionReport {
                submission_id: s.id.clone(),
                best_match: None,
                failed_pairs: Vec::new(),
            })
            .collect();

        // Sequential selection keeps ties deterministic: pairs arrive in
        // (i, j) order, and only a strictly higher score replaces the
        // current best.
        for (i, j, outcome) in outcomes {
            match outcome {
                Ok(result) => {
                    for (own, other) in [(i, j), (j, i)] {
                        let report = &mut reports[own];
                        let better = report
                            .best_match
                            .as_ref()
                            .map_or(true, |best| result.final_score > best.final_score);
                        if better {
                            let mut own_result = result.clone();
                            own_result.most_similar_to = Some(submissions[other].id.clone());
                            report.best_match = Some(own_result);
                        }
                    }
                }
                Err(error) => {
                    warn!(
                        a = %submissions[i].id,
                        b = %submissions[j].id,
                        %error,
                        "pairwise comparison failed; continuing batch"
                    );
                    let marker = PairError {
                        a: submissions[i].id.clone(),
                        b: submissions[j].id.clone(),
                        error: error.to_string(),
                    };
                    reports[i].failed_pairs.push(marker.clone());
                    reports[j].failed_pairs.push(marker);
                }
            }
        }

        reports
    }
}
