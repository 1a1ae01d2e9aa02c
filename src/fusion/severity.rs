//! Severity banding over the final fused score.

use crate::core::config::ThresholdConfig;
use crate::core::errors::{Result, TesseraError};
use crate::core::results::Severity;

/// Pure, total classifier over [0, 100].
///
/// Bands are closed on the lower edge of the higher band: with the default
/// thresholds, 90.0 is SEVERE and 60.0 is PARTIAL — no gap, no overlap.
#[derive(Debug, Clone)]
pub struct SeverityClassifier {
    severe: f64,
    partial: f64,
}

impl SeverityClassifier {
    /// Create a classifier from validated thresholds.
    pub fn new(config: &ThresholdConfig) -> Self {
        Self {
            severe: config.severe,
            partial: config.partial,
        }
    }

    /// Classify a final score. Out-of-range input is rejected.
    pub fn classify(&self, score: f64) -> Result<Severity> {
        if !(0.0..=100.0).contains(&score) {
            return Err(TesseraError::validation_with_values(
                "score out of range for severity classification",
                "score",
                "0.0..=100.0",
                format!("{score}"),
            ));
        }

        Ok(if score >= self.severe {
            Severity::Severe
        } else if score >= self.partial {
            Severity::Partial
        } else {
            Severity::Clean
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> SeverityClassifier {
        SeverityClassifier::new(&ThresholdConfig::default())
    }

    #[test]
    fn band_boundaries_are_closed_on_the_higher_band() {
        let c = classifier();
        assert_eq!(c.classify(89.999).unwrap(), Severity::Partial);
        assert_eq!(c.classify(90.0).unwrap(), Severity::Severe);
        assert_eq!(c.classify(59.999).unwrap(), Severity::Clean);
        assert_eq!(c.classify(60.0).unwrap(), Severity::Partial);
    }

    #[test]
    fn extremes_classify_without_error() {
        let c = classifier();
        assert_eq!(c.classify(0.0).unwrap(), Severity::Clean);
        assert_eq!(c.classify(100.0).unwrap(), Severity::Severe);
    }

    #[test]
    fn out_of_range_scores_are_rejected() {
        let c = classifier();
        assert!(c.classify(-0.001).is_err());
        assert!(c.classify(100.001).is_err());
        assert!(c.classify(f64::NAN).is_err());
    }
}
