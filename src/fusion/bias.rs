//! The ordered student-safe bias pipeline.
//!
//! Each rule is a pure function of the signal set, the running score, and
//! the bias configuration. A rule that fires appends one human-readable
//! reason to the adjustments log and returns the adjusted score clamped to
//! [0, 100]; a rule that does not fire returns the score unchanged. The
//! pipeline order is fixed, so the log is reproducible for identical
//! inputs.

use crate::core::config::BiasConfig;

/// Signals visible to the bias rules.
#[derive(Debug, Clone, Copy)]
pub struct BiasInputs {
    /// Lexical similarity signal
    pub lexical: f64,
    /// Combined structural similarity
    pub structural: f64,
    /// Semantic similarity signal
    pub semantic: f64,
    /// External boilerplate/common-algorithm fingerprint, when present
    pub boilerplate: Option<f64>,
}

impl BiasInputs {
    fn lowest(&self) -> f64 {
        self.lexical.min(self.structural).min(self.semantic)
    }

    fn spread(&self) -> f64 {
        let highest = self.lexical.max(self.structural).max(self.semantic);
        highest - self.lowest()
    }
}

/// One step of the bias pipeline.
pub type BiasRule = fn(&BiasConfig, &BiasInputs, f64, &mut Vec<String>) -> f64;

/// The pipeline, in its fixed application order.
pub const PIPELINE: [BiasRule; 4] = [
    lexical_dominant_suppression,
    multi_signal_agreement_boost,
    disagreement_leniency_pull,
    common_pattern_dampener,
];

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

/// Rule 1: superficial textual similarity without structural or semantic
/// agreement must not drive the score up.
pub fn lexical_dominant_suppression(
    config: &BiasConfig,
    inputs: &BiasInputs,
    score: f64,
    log: &mut Vec<String>,
) -> f64 {
    if inputs.lexical >= config.lexical_high
        && inputs.structural < config.structural_low
        && inputs.semantic < config.semantic_low
    {
        let adjusted = clamp_score(score - config.lexical_only_reduction);
        log.push(format!(
            "Reduced by {:.1} points (lexical-only similarity)",
            score - adjusted
        ));
        return adjusted;
    }
    score
}

/// Rule 2: independent structural and semantic signals that concur
/// reinforce confidence with a small bounded boost.
pub fn multi_signal_agreement_boost(
    config: &BiasConfig,
    inputs: &BiasInputs,
    score: f64,
    log: &mut Vec<String>,
) -> f64 {
    if inputs.structural >= config.agreement_threshold
        && inputs.semantic >= config.agreement_threshold
        && (inputs.structural - inputs.semantic).abs() <= config.agreement_margin
    {
        let adjusted = clamp_score(score + config.agreement_boost);
        log.push(format!(
            "Boosted by {:.1} points (structural/semantic agreement)",
            adjusted - score
        ));
        return adjusted;
    }
    score
}

/// Rule 3: when the signals disagree widely, pull the score toward the
/// lowest of them rather than trusting the mean — err toward leniency
/// when uncertain.
pub fn disagreement_leniency_pull(
    config: &BiasConfig,
    inputs: &BiasInputs,
    score: f64,
    log: &mut Vec<String>,
) -> f64 {
    if inputs.spread() > config.disagreement_spread {
        let lowest = inputs.lowest();
        if score > lowest {
            let adjusted = clamp_score(score - config.leniency_pull * (score - lowest));
            log.push(format!(
                "Pulled down by {:.1} points toward the lowest signal (signal disagreement)",
                score - adjusted
            ));
            return adjusted;
        }
    }
    score
}

/// Rule 4: an external boilerplate/common-algorithm fingerprint reduces
/// the score by a fixed amount; no fingerprint, no-op.
pub fn common_pattern_dampener(
    config: &BiasConfig,
    inputs: &BiasInputs,
    score: f64,
    log: &mut Vec<String>,
) -> f64 {
    if let Some(fingerprint) = inputs.boilerplate {
        let adjusted = clamp_score(score - config.common_pattern_reduction);
        log.push(format!(
            "Reduced by {:.1} points (common-pattern fingerprint {:.1})",
            score - adjusted,
            fingerprint
        ));
        return adjusted;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(lexical: f64, structural: f64, semantic: f64) -> BiasInputs {
        BiasInputs {
            lexical,
            structural,
            semantic,
            boilerplate: None,
        }
    }

    #[test]
    fn lexical_dominance_is_suppressed() {
        let config = BiasConfig::default();
        let mut log = Vec::new();
        let score =
            lexical_dominant_suppression(&config, &inputs(95.0, 20.0, 30.0), 40.0, &mut log);
        assert_eq!(score, 25.0);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn suppression_clamps_at_zero() {
        let config = BiasConfig::default();
        let mut log = Vec::new();
        let score =
            lexical_dominant_suppression(&config, &inputs(100.0, 0.0, 0.0), 10.0, &mut log);
        assert_eq!(score, 0.0);
        assert!(log[0].contains("10.0 points"));
    }

    #[test]
    fn agreement_boost_requires_consistency() {
        let config = BiasConfig::default();
        let mut log = Vec::new();

        // High but inconsistent: |98 - 86| > margin of 10.
        let score =
            multi_signal_agreement_boost(&config, &inputs(50.0, 98.0, 86.0), 80.0, &mut log);
        assert_eq!(score, 80.0);
        assert!(log.is_empty());

        let score =
            multi_signal_agreement_boost(&config, &inputs(50.0, 95.0, 90.0), 80.0, &mut log);
        assert_eq!(score, 85.0);
    }

    #[test]
    fn agreement_boost_caps_at_one_hundred() {
        let config = BiasConfig::default();
        let mut log = Vec::new();
        let score =
            multi_signal_agreement_boost(&config, &inputs(90.0, 98.0, 97.0), 99.0, &mut log);
        assert_eq!(score, 100.0);
        assert!(log[0].contains("1.0 points"));
    }

    #[test]
    fn disagreement_pulls_toward_lowest_signal() {
        let config = BiasConfig::default();
        let mut log = Vec::new();
        // Spread 60 > 25; halfway from 50 toward 20 is 35.
        let score = disagreement_leniency_pull(&config, &inputs(80.0, 20.0, 50.0), 50.0, &mut log);
        assert_eq!(score, 35.0);
    }

    #[test]
    fn small_spread_leaves_score_alone() {
        let config = BiasConfig::default();
        let mut log = Vec::new();
        let score = disagreement_leniency_pull(&config, &inputs(60.0, 55.0, 50.0), 55.0, &mut log);
        assert_eq!(score, 55.0);
        assert!(log.is_empty());
    }

    #[test]
    fn dampener_is_noop_without_fingerprint() {
        let config = BiasConfig::default();
        let mut log = Vec::new();
        let score = common_pattern_dampener(&config, &inputs(50.0, 50.0, 50.0), 50.0, &mut log);
        assert_eq!(score, 50.0);
        assert!(log.is_empty());

        let with_fingerprint = BiasInputs {
            boilerplate: Some(88.0),
            ..inputs(50.0, 50.0, 50.0)
        };
        let score = common_pattern_dampener(&config, &with_fingerprint, 50.0, &mut log);
        assert_eq!(score, 40.0);
        assert!(log[0].contains("88.0"));
    }
}
