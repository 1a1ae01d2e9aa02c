//! Structural score combination.
//!
//! Blends the tiling and tree scores (plus an optional third structural
//! method) into a single structural percentage according to the configured
//! [`StructuralMethod`]. When a component is unavailable the remaining
//! weights are renormalized instead of failing the comparison, and the
//! result is flagged as degraded.

use tracing::debug;

use crate::core::config::{StructuralConfig, StructuralMethod};
use crate::core::results::StructuralBreakdown;

/// Combined structural score with its per-method breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralScore {
    /// Blended structural percentage in [0, 100]
    pub score: f64,
    /// Method that produced the blend
    pub method: StructuralMethod,
    /// Per-method components and the degraded flag
    pub breakdown: StructuralBreakdown,
}

/// Combines per-method structural scores into one percentage.
#[derive(Debug, Clone)]
pub struct StructuralCombiner {
    config: StructuralConfig,
}

impl StructuralCombiner {
    /// Create a combiner from validated configuration.
    pub fn new(config: &StructuralConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Blend the available components. `None` marks a component whose
    /// engine could not produce a score for this comparison.
    ///
    /// The blend is a weighted average, so it is monotonic non-decreasing
    /// in every component held fixed.
    pub fn combine(
        &self,
        tiling: Option<f64>,
        tree: Option<f64>,
        third_method: Option<f64>,
    ) -> StructuralScore {
        let selected: Vec<(Option<f64>, f64)> = match self.config.method {
            StructuralMethod::TilingOnly => vec![(tiling, 1.0)],
            StructuralMethod::TreeOnly => vec![(tree, 1.0)],
            StructuralMethod::Hybrid => vec![
                (tiling, self.config.tiling_weight),
                (tree, self.config.tree_weight),
                (third_method, self.config.third_method_weight),
            ],
        };

        // A third method is optional by configuration; only a missing
        // tiling or tree component marks the signal as degraded.
        let degraded = match self.config.method {
            StructuralMethod::TilingOnly => tiling.is_none(),
            StructuralMethod::TreeOnly => tree.is_none(),
            StructuralMethod::Hybrid => tiling.is_none() || tree.is_none(),
        };

        let mut weight_sum = 0.0;
        let mut weighted = 0.0;
        for (score, weight) in &selected {
            if let Some(score) = score {
                weight_sum += weight;
                weighted += score * weight;
            }
        }

        let score = if weight_sum > 0.0 {
            weighted / weight_sum
        } else {
            0.0
        };

        if degraded {
            debug!(
                method = ?self.config.method,
                "structural component unavailable; weights renormalized"
            );
        }

        StructuralScore {
            score,
            method: self.config.method,
            breakdown: StructuralBreakdown {
                tiling,
                tree,
                third_method,
                degraded,
            },
        }
    }
}
