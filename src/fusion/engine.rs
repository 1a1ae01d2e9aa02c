//! Multi-signal fusion engine.
//!
//! Merges the lexical, structural, and semantic signals into one score: a
//! weighted base combination followed by the ordered student-safe bias
//! pipeline, severity classification, and a deterministic confidence
//! derivation. A pure function of its inputs and configuration — no hidden
//! state, no randomness.

use tracing::debug;

use crate::core::config::{BiasConfig, FusionWeights, ThresholdConfig};
use crate::core::errors::{Result, TesseraError};
use crate::core::results::SimilarityResult;
use crate::detectors::structural::StructuralScore;
use crate::fusion::bias::{BiasInputs, PIPELINE};
use crate::fusion::severity::SeverityClassifier;

// Confidence shrink applied when the structural signal is degraded
// (unparseable tree or missing component).
const DEGRADED_CONFIDENCE_FACTOR: f64 = 0.6;

/// The three signals for one pairwise comparison, plus the optional
/// boilerplate fingerprint.
///
/// Lexical and semantic scores are opaque floats from external analyzers;
/// the engine never inspects how they were produced.
#[derive(Debug, Clone)]
pub struct SignalSet {
    /// Lexical similarity in [0, 100]
    pub lexical: f64,
    /// Combined structural score with its breakdown
    pub structural: StructuralScore,
    /// Semantic similarity in [0, 100]
    pub semantic: f64,
    /// External boilerplate/common-algorithm fingerprint, when present
    pub boilerplate: Option<f64>,
}

/// Signal fusion engine. Weights and thresholds are validated once here,
/// at construction, never per call.
#[derive(Debug, Clone)]
pub struct SignalFusionEngine {
    weights: FusionWeights,
    bias: BiasConfig,
    classifier: SeverityClassifier,
}

impl SignalFusionEngine {
    /// Create a fusion engine, validating the weight and threshold
    /// configuration. Invalid configuration fails here, never mid-batch.
    pub fn new(
        weights: &FusionWeights,
        bias: &BiasConfig,
        thresholds: &ThresholdConfig,
    ) -> Result<Self> {
        weights.validate()?;
        bias.validate()?;
        thresholds.validate()?;

        Ok(Self {
            weights: weights.clone(),
            bias: bias.clone(),
            classifier: SeverityClassifier::new(thresholds),
        })
    }

    /// Fuse one signal set into a populated [`SimilarityResult`].
    ///
    /// `most_similar_to` is left unset; the batch driver fills it.
    pub fn fuse(&self, signals: &SignalSet) -> Result<SimilarityResult> {
        ensure_signal_range(signals.lexical, "lexical")?;
        ensure_signal_range(signals.semantic, "semantic")?;
        ensure_signal_range(signals.structural.score, "structural")?;
        if let Some(fingerprint) = signals.boilerplate {
            ensure_signal_range(fingerprint, "boilerplate")?;
        }

        let raw_score = self.weights.lexical * signals.lexical
            + self.weights.structural * signals.structural.score
            + self.weights.semantic * signals.semantic;

        let inputs = BiasInputs {
            lexical: signals.lexical,
            structural: signals.structural.score,
            semantic: signals.semantic,
            boilerplate: signals.boilerplate,
        };

        let mut adjustments = Vec::new();
        let mut score = raw_score.clamp(0.0, 100.0);
        for rule in PIPELINE {
            score = rule(&self.bias, &inputs, score, &mut adjustments);
        }

        let severity = self.classifier.classify(score)?;
        let confidence = self.confidence(&inputs, signals.structural.breakdown.degraded);

        debug!(
            raw_score,
            final_score = score,
            ?severity,
            adjustments = adjustments.len(),
            "signal fusion complete"
        );

        Ok(SimilarityResult {
            lexical: signals.lexical,
            structural: signals.structural.score,
            semantic: signals.semantic,
            raw_score,
            final_score: score,
            adjustments,
            severity,
            most_similar_to: None,
            confidence,
            structural_method: signals.structural.method,
            structural_breakdown: signals.structural.breakdown.clone(),
        })
    }

    /// Deterministic confidence: full agreement gives 1.0, the widest
    /// possible spread gives 0.5, and a degraded structural signal shrinks
    /// the result further.
    fn confidence(&self, inputs: &BiasInputs, degraded: bool) -> f64 {
        let lowest = inputs.lexical.min(inputs.structural).min(inputs.semantic);
        let highest = inputs.lexical.max(inputs.structural).max(inputs.semantic);
        let spread = highest - lowest;

        let mut confidence = 1.0 - spread / 200.0;
        if degraded {
            confidence *= DEGRADED_CONFIDENCE_FACTOR;
        }
        confidence.clamp(0.0, 1.0)
    }
}

fn ensure_signal_range(value: f64, name: &str) -> Result<()> {
    if !(0.0..=100.0).contains(&value) {
        return Err(TesseraError::validation_with_values(
            format!("{name} signal out of range"),
            name,
            "0.0..=100.0",
            format!("{value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{StructuralMethod, TesseraConfig};
    use crate::core::results::{Severity, StructuralBreakdown};

    fn engine() -> SignalFusionEngine {
        let config = TesseraConfig::default();
        SignalFusionEngine::new(&config.fusion, &config.bias, &config.thresholds).unwrap()
    }

    fn structural(score: f64) -> StructuralScore {
        StructuralScore {
            score,
            method: StructuralMethod::Hybrid,
            breakdown: StructuralBreakdown {
                tiling: Some(score),
                tree: Some(score),
                third_method: Some(score),
                degraded: false,
            },
        }
    }

    fn signals(lexical: f64, structural_score: f64, semantic: f64) -> SignalSet {
        SignalSet {
            lexical,
            structural: structural(structural_score),
            semantic,
            boilerplate: None,
        }
    }

    #[test]
    fn invalid_weights_fail_at_construction() {
        let mut config = TesseraConfig::default();
        config.fusion.lexical = 0.9;
        let err = SignalFusionEngine::new(&config.fusion, &config.bias, &config.thresholds)
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn pure_lexical_similarity_never_reaches_severe() {
        let result = engine().fuse(&signals(100.0, 0.0, 0.0)).unwrap();
        assert!(result.final_score <= 15.0);
        assert_eq!(result.severity, Severity::Clean);
        assert!(!result.adjustments.is_empty());
    }

    #[test]
    fn agreeing_strong_signals_classify_severe() {
        // Renamed-identifier copy: tiling and tree both saturate, semantic
        // agrees, raw lexical similarity is lower.
        let result = engine().fuse(&signals(78.0, 100.0, 95.0)).unwrap();
        assert!(result.final_score >= 90.0);
        assert_eq!(result.severity, Severity::Severe);
        assert!(result
            .adjustments
            .iter()
            .any(|a| a.contains("agreement")));
    }

    #[test]
    fn disagreement_pulls_independent_work_below_partial() {
        // Independent implementations of the same simple algorithm:
        // moderate lexical, low structural, middling semantic.
        let result = engine().fuse(&signals(65.0, 35.0, 55.0)).unwrap();
        assert_eq!(result.severity, Severity::Clean);
        assert!(result.final_score < 60.0);
    }

    #[test]
    fn output_stays_in_range_for_extremes() {
        for (l, s, m) in [
            (0.0, 0.0, 0.0),
            (100.0, 100.0, 100.0),
            (100.0, 0.0, 0.0),
            (0.0, 100.0, 100.0),
        ] {
            let result = engine().fuse(&signals(l, s, m)).unwrap();
            assert!((0.0..=100.0).contains(&result.final_score));
            assert!((0.0..=1.0).contains(&result.confidence));
        }
    }

    #[test]
    fn fusion_is_reproducible_including_log_order() {
        let set = SignalSet {
            boilerplate: Some(60.0),
            ..signals(85.0, 30.0, 90.0)
        };
        let first = engine().fuse(&set).unwrap();
        let second = engine().fuse(&set).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.adjustments, second.adjustments);
    }

    #[test]
    fn out_of_range_signal_is_rejected() {
        assert!(engine().fuse(&signals(101.0, 50.0, 50.0)).is_err());
        assert!(engine().fuse(&signals(50.0, 50.0, -1.0)).is_err());
    }

    #[test]
    fn degraded_structural_signal_shrinks_confidence() {
        let mut degraded = structural(40.0);
        degraded.breakdown.degraded = true;

        let intact = engine().fuse(&signals(40.0, 40.0, 40.0)).unwrap();
        let with_degraded = engine()
            .fuse(&SignalSet {
                lexical: 40.0,
                structural: degraded,
                semantic: 40.0,
                boilerplate: None,
            })
            .unwrap();

        assert!(with_degraded.confidence < intact.confidence);
    }
}
