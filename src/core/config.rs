//! Configuration types for the similarity engines and fusion pipeline.
//!
//! All configuration is immutable once the engine is constructed:
//! [`TesseraConfig::validate`] runs exactly once, at construction, so no
//! data-dependent invalid state can reach the scoring logic mid-batch.

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, TesseraError};

/// Tolerance used when checking that weight sets sum to 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TesseraConfig {
    /// Fusion weights for the lexical/structural/semantic signals
    pub fusion: FusionWeights,

    /// Greedy string tiling parameters
    pub tiling: TilingConfig,

    /// Tree similarity parameters
    pub tree: TreeConfig,

    /// Structural method selection and hybrid weights
    pub structural: StructuralConfig,

    /// Student-safe bias rule thresholds
    pub bias: BiasConfig,

    /// Severity banding and explanation depth thresholds
    pub thresholds: ThresholdConfig,
}

impl TesseraConfig {
    /// Validate the full configuration.
    pub fn validate(&self) -> Result<()> {
        self.fusion.validate()?;
        self.tiling.validate()?;
        self.tree.validate()?;
        self.structural.validate()?;
        self.bias.validate()?;
        self.thresholds.validate()?;
        Ok(())
    }
}

/// Weights applied to the three similarity signals when computing the
/// base fused score. Must sum to 1.0 within [`WEIGHT_SUM_TOLERANCE`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FusionWeights {
    /// Weight of the lexical signal (weak, supporting evidence only)
    pub lexical: f64,

    /// Weight of the structural signal (primary detector)
    pub structural: f64,

    /// Weight of the semantic signal (algorithmic intent)
    pub semantic: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            lexical: 0.15,
            structural: 0.45,
            semantic: 0.40,
        }
    }
}

impl FusionWeights {
    /// Validate the fusion weights.
    pub fn validate(&self) -> Result<()> {
        validate_unit_range(self.lexical, "fusion.lexical")?;
        validate_unit_range(self.structural, "fusion.structural")?;
        validate_unit_range(self.semantic, "fusion.semantic")?;
        validate_weights_sum(
            &[self.lexical, self.structural, self.semantic],
            WEIGHT_SUM_TOLERANCE,
            "fusion weights",
        )
    }
}

/// Greedy string tiling (RK-GST) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilingConfig {
    /// Minimum token run length for a match to become a tile
    pub min_match_length: usize,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            min_match_length: 3,
        }
    }
}

impl TilingConfig {
    /// Validate the tiling configuration.
    pub fn validate(&self) -> Result<()> {
        validate_positive_usize(self.min_match_length, "tiling.min_match_length")
    }
}

/// Tree similarity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Minimum proportion of matched children for a node with children to
    /// count as matched. Leaves match on label alone.
    pub child_match_threshold: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            child_match_threshold: 0.5,
        }
    }
}

impl TreeConfig {
    /// Validate the tree similarity configuration.
    pub fn validate(&self) -> Result<()> {
        validate_unit_range(self.child_match_threshold, "tree.child_match_threshold")
    }
}

/// Structural method selector. A closed set of variants rather than a
/// runtime-pluggable hierarchy, so configuration alone decides the blend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralMethod {
    /// Greedy string tiling only
    TilingOnly,
    /// Tree similarity only
    TreeOnly,
    /// Weighted blend of tiling, tree, and an optional third method
    Hybrid,
}

/// Structural combination configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuralConfig {
    /// Which structural method(s) contribute to the structural score
    pub method: StructuralMethod,

    /// Hybrid weight of the tiling score
    pub tiling_weight: f64,

    /// Hybrid weight of the tree score
    pub tree_weight: f64,

    /// Hybrid weight of the optional third structural method
    pub third_method_weight: f64,
}

impl Default for StructuralConfig {
    fn default() -> Self {
        Self {
            method: StructuralMethod::Hybrid,
            tiling_weight: 0.3,
            tree_weight: 0.3,
            third_method_weight: 0.4,
        }
    }
}

impl StructuralConfig {
    /// Validate the structural configuration.
    pub fn validate(&self) -> Result<()> {
        validate_unit_range(self.tiling_weight, "structural.tiling_weight")?;
        validate_unit_range(self.tree_weight, "structural.tree_weight")?;
        validate_unit_range(self.third_method_weight, "structural.third_method_weight")?;

        if self.method == StructuralMethod::Hybrid {
            validate_weights_sum(
                &[
                    self.tiling_weight,
                    self.tree_weight,
                    self.third_method_weight,
                ],
                WEIGHT_SUM_TOLERANCE,
                "structural hybrid weights",
            )?;
        }

        Ok(())
    }
}

/// Thresholds for the ordered student-safe bias pipeline.
///
/// All scores and deltas are in percentage points on the 0-100 scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiasConfig {
    /// Lexical score at or above which the signal counts as "high"
    pub lexical_high: f64,

    /// Structural score below which the signal counts as "low"
    pub structural_low: f64,

    /// Semantic score below which the signal counts as "low"
    pub semantic_low: f64,

    /// Points subtracted when lexical similarity dominates alone
    pub lexical_only_reduction: f64,

    /// Structural and semantic score at or above which both count as "high"
    pub agreement_threshold: f64,

    /// Maximum |structural - semantic| gap for the signals to count as
    /// mutually consistent
    pub agreement_margin: f64,

    /// Points added when structural and semantic agree (capped at 100)
    pub agreement_boost: f64,

    /// Signal spread (max - min) above which the leniency pull applies
    pub disagreement_spread: f64,

    /// Fraction of the gap toward the lowest signal the score is pulled
    /// when signals disagree
    pub leniency_pull: f64,

    /// Points subtracted when the external boilerplate fingerprint fires
    pub common_pattern_reduction: f64,
}

impl Default for BiasConfig {
    fn default() -> Self {
        Self {
            lexical_high: 80.0,
            structural_low: 50.0,
            semantic_low: 50.0,
            lexical_only_reduction: 15.0,
            agreement_threshold: 85.0,
            agreement_margin: 10.0,
            agreement_boost: 5.0,
            disagreement_spread: 25.0,
            leniency_pull: 0.5,
            common_pattern_reduction: 10.0,
        }
    }
}

impl BiasConfig {
    /// Validate the bias-rule thresholds.
    pub fn validate(&self) -> Result<()> {
        validate_score_range(self.lexical_high, "bias.lexical_high")?;
        validate_score_range(self.structural_low, "bias.structural_low")?;
        validate_score_range(self.semantic_low, "bias.semantic_low")?;
        validate_score_range(self.lexical_only_reduction, "bias.lexical_only_reduction")?;
        validate_score_range(self.agreement_threshold, "bias.agreement_threshold")?;
        validate_score_range(self.agreement_margin, "bias.agreement_margin")?;
        validate_score_range(self.agreement_boost, "bias.agreement_boost")?;
        validate_score_range(self.disagreement_spread, "bias.disagreement_spread")?;
        validate_unit_range(self.leniency_pull, "bias.leniency_pull")?;
        validate_score_range(
            self.common_pattern_reduction,
            "bias.common_pattern_reduction",
        )
    }
}

/// Severity banding and explanation depth thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Scores at or above this are SEVERE
    pub severe: f64,

    /// Scores at or above this (and below `severe`) are PARTIAL
    pub partial: f64,

    /// Scores at or above this trigger a deep explanation
    pub deep_explanation: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            severe: 90.0,
            partial: 60.0,
            deep_explanation: 70.0,
        }
    }
}

impl ThresholdConfig {
    /// Validate the severity and explanation thresholds.
    pub fn validate(&self) -> Result<()> {
        validate_score_range(self.severe, "thresholds.severe")?;
        validate_score_range(self.partial, "thresholds.partial")?;
        validate_score_range(self.deep_explanation, "thresholds.deep_explanation")?;

        if self.partial >= self.severe {
            return Err(TesseraError::config_field(
                "partial threshold must be below severe threshold",
                "thresholds.partial",
            ));
        }

        Ok(())
    }
}

/// Validate that a usize value is greater than zero.
pub fn validate_positive_usize(value: usize, field: &str) -> Result<()> {
    if value == 0 {
        return Err(TesseraError::config_field(
            format!("{field} must be greater than 0"),
            field,
        ));
    }
    Ok(())
}

/// Validate that an f64 value is in the unit range [0.0, 1.0].
pub fn validate_unit_range(value: f64, field: &str) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(TesseraError::config_field(
            format!("{field} must be between 0.0 and 1.0"),
            field,
        ));
    }
    Ok(())
}

/// Validate that an f64 value is in the percentage range [0.0, 100.0].
pub fn validate_score_range(value: f64, field: &str) -> Result<()> {
    if !(0.0..=100.0).contains(&value) {
        return Err(TesseraError::config_field(
            format!("{field} must be between 0.0 and 100.0"),
            field,
        ));
    }
    Ok(())
}

/// Validate that weights sum to approximately 1.0 (within tolerance).
pub fn validate_weights_sum(weights: &[f64], tolerance: f64, field: &str) -> Result<()> {
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > tolerance {
        return Err(TesseraError::config_field(
            format!("{field} must sum to 1.0 (got {sum:.3})"),
            field,
        ));
    }
    Ok(())
}
