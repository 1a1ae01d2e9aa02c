//! Explanation depth selection.
//!
//! Pure mapping consumed by the external reporting component; this module
//! never produces report text.

use crate::core::config::ThresholdConfig;
use crate::core::results::ExplanationDepth;

/// Selects how deep the generated explanation should go.
#[derive(Debug, Clone)]
pub struct ExplanationSelector {
    deep_threshold: f64,
}

impl ExplanationSelector {
    /// Create a selector from validated thresholds.
    pub fn new(config: &ThresholdConfig) -> Self {
        Self {
            deep_threshold: config.deep_explanation,
        }
    }

    /// DEEP when the score clears the threshold or the question is
    /// externally flagged as algorithmically complex; MEDIUM otherwise.
    pub fn select(&self, final_score: f64, complex_question: bool) -> ExplanationDepth {
        if final_score >= self.deep_threshold || complex_question {
            ExplanationDepth::Deep
        } else {
            ExplanationDepth::Medium
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> ExplanationSelector {
        ExplanationSelector::new(&ThresholdConfig::default())
    }

    #[test]
    fn high_scores_select_deep() {
        assert_eq!(selector().select(70.0, false), ExplanationDepth::Deep);
        assert_eq!(selector().select(95.0, false), ExplanationDepth::Deep);
    }

    #[test]
    fn complex_questions_select_deep_regardless_of_score() {
        assert_eq!(selector().select(10.0, true), ExplanationDepth::Deep);
    }

    #[test]
    fn low_scores_on_simple_questions_select_medium() {
        assert_eq!(selector().select(69.999, false), ExplanationDepth::Medium);
    }
}
