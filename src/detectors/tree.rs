//! Order-preserving greedy subtree matching over canonicalized syntax trees.
//!
//! Children are compared pairwise in original order. A node counts as
//! matched when its label equals its counterpart's and the proportion of
//! matched children clears the configured threshold; an unmatched subtree
//! contributes zero. Reordering tolerance (e.g. treating independent
//! statement blocks as unordered) belongs to the upstream canonicalizer,
//! not this engine.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::TreeConfig;
use crate::core::submission::{SyntaxTree, TreeNode};

/// Availability flag on a tree comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeFlag {
    /// Both trees were available and compared
    Scored,
    /// At least one tree was missing (upstream parse failure); the score
    /// is a sentinel zero, never a penalty or a reward
    Unparseable,
}

/// Result of one tree comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeScore {
    /// Similarity percentage: `2 * matched / (totalA + totalB) * 100`
    pub score: f64,
    /// Whether the comparison actually ran
    pub flag: TreeFlag,
}

impl TreeScore {
    /// Sentinel for a comparison where a tree was unavailable.
    pub fn unparseable() -> Self {
        Self {
            score: 0.0,
            flag: TreeFlag::Unparseable,
        }
    }

    /// True when this score is the unparseable sentinel.
    pub fn is_unparseable(&self) -> bool {
        self.flag == TreeFlag::Unparseable
    }
}

/// Tree similarity engine.
#[derive(Debug, Clone)]
pub struct TreeSimilarityEngine {
    child_match_threshold: f64,
}

impl TreeSimilarityEngine {
    /// Create a tree engine from validated configuration.
    pub fn new(config: &TreeConfig) -> Self {
        Self {
            child_match_threshold: config.child_match_threshold,
        }
    }

    /// Compare two trees. Either tree missing yields the unparseable
    /// sentinel instead of an error.
    pub fn compare(&self, a: Option<&SyntaxTree>, b: Option<&SyntaxTree>) -> TreeScore {
        let (Some(a), Some(b)) = (a, b) else {
            return TreeScore::unparseable();
        };

        let matched = self.matched_nodes(&a.root, &b.root);
        let total = a.node_count() + b.node_count();
        let score = (2 * matched) as f64 / total as f64 * 100.0;

        debug!(matched, total, score, "tree comparison complete");

        TreeScore {
            score,
            flag: TreeFlag::Scored,
        }
    }

    /// Number of matched node pairs in the two subtrees. Zero when the
    /// roots do not match; an unmatched subtree contributes nothing even
    /// if descendants happen to coincide.
    fn matched_nodes(&self, a: &TreeNode, b: &TreeNode) -> usize {
        if a.label != b.label {
            return 0;
        }

        let pair_count = a.children.len().min(b.children.len());
        let max_children = a.children.len().max(b.children.len());

        if max_children == 0 {
            // Leaves match on label alone.
            return 1;
        }

        let mut matched_children = 0;
        let mut descendant_matches = 0;
        for index in 0..pair_count {
            let sub = self.matched_nodes(&a.children[index], &b.children[index]);
            if sub > 0 {
                matched_children += 1;
                descendant_matches += sub;
            }
        }

        // Extra children on either side dilute the proportion.
        let proportion = matched_children as f64 / max_children as f64;
        if proportion >= self.child_match_threshold {
            1 + descendant_matches
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> TreeSimilarityEngine {
        TreeSimilarityEngine::new(&TreeConfig::default())
    }

    fn simple_function() -> SyntaxTree {
        SyntaxTree::new(TreeNode::with_children(
            "module",
            vec![TreeNode::with_children(
                "function",
                vec![
                    TreeNode::with_children("for", vec![TreeNode::leaf("assign")]),
                    TreeNode::leaf("return"),
                ],
            )],
        ))
    }

    #[test]
    fn identical_trees_score_full() {
        let tree = simple_function();
        let score = engine().compare(Some(&tree), Some(&tree.clone()));
        assert_eq!(score.score, 100.0);
        assert_eq!(score.flag, TreeFlag::Scored);
    }

    #[test]
    fn missing_tree_yields_unparseable_sentinel() {
        let tree = simple_function();
        let score = engine().compare(Some(&tree), None);
        assert!(score.is_unparseable());
        assert_eq!(score.score, 0.0);

        let score = engine().compare(None, None);
        assert!(score.is_unparseable());
    }

    #[test]
    fn different_root_labels_score_zero() {
        let a = SyntaxTree::new(TreeNode::leaf("module"));
        let b = SyntaxTree::new(TreeNode::leaf("expression"));
        assert_eq!(engine().compare(Some(&a), Some(&b)).score, 0.0);
    }

    #[test]
    fn diverging_bodies_score_partially() {
        // Same module/function skeleton, iterative vs recursive body.
        let iterative = simple_function();
        let recursive = SyntaxTree::new(TreeNode::with_children(
            "module",
            vec![TreeNode::with_children(
                "function",
                vec![
                    TreeNode::with_children("if", vec![TreeNode::leaf("call")]),
                    TreeNode::leaf("return"),
                ],
            )],
        ));

        let score = engine().compare(Some(&iterative), Some(&recursive)).score;
        assert!(score > 0.0, "shared skeleton should contribute");
        assert!(score < 70.0, "diverging bodies should not look near-identical");
    }

    #[test]
    fn unmatched_subtree_contributes_zero_despite_matching_descendants() {
        // The "while" and "for" subtrees differ at their roots, so their
        // identical "assign" children must not count.
        let a = SyntaxTree::new(TreeNode::with_children(
            "module",
            vec![TreeNode::with_children(
                "for",
                vec![TreeNode::leaf("assign")],
            )],
        ));
        let b = SyntaxTree::new(TreeNode::with_children(
            "module",
            vec![TreeNode::with_children(
                "while",
                vec![TreeNode::leaf("assign")],
            )],
        ));

        // Root labels match but the only child pair does not, so the
        // proportion (0/1) misses the threshold and nothing matches.
        assert_eq!(engine().compare(Some(&a), Some(&b)).score, 0.0);
    }
}
