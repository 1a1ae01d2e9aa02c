//! Immutable per-submission inputs.
//!
//! Token streams and syntax trees are produced by an external
//! normalizer/parser before the engine runs: token values arrive already
//! canonicalized (identifiers rewritten to `VAR_k`, literals collapsed to
//! `NUM`/`STR` placeholders) and trees are already language-canonicalized.
//! The engine never mutates these inputs.

use serde::{Deserialize, Serialize};

/// Half-open span into the original (pre-normalization) source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Start offset, inclusive
    pub start: usize,
    /// End offset, exclusive
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Coarse token classification carried through from the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Canonicalized identifier (`VAR_k`)
    Identifier,
    /// Language keyword
    Keyword,
    /// Collapsed literal placeholder (`NUM`, `STR`)
    Literal,
    /// Operator
    Operator,
    /// Punctuation and delimiters
    Punctuation,
    /// Anything the normalizer did not classify
    Other,
}

/// One normalized token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Canonicalized token text; equality of `value` defines a match
    pub value: String,
    /// Token classification
    pub kind: TokenKind,
    /// Position in the original source
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(value: impl Into<String>, kind: TokenKind, span: Span) -> Self {
        Self {
            value: value.into(),
            kind,
            span,
        }
    }
}

/// Ordered, immutable token sequence for one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create a token stream from normalizer output.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Number of tokens in the stream.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when the stream holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// All tokens in order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Canonicalized value at `index`. Panics when out of range; callers
    /// stay within `0..len()`.
    pub(crate) fn value(&self, index: usize) -> &str {
        &self.tokens[index].value
    }
}

/// One node of a canonicalized syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Node label (e.g. the production or node-type name)
    pub label: String,
    /// Ordered children
    pub children: Vec<TreeNode>,
    /// Position in the original source, when the parser provides one
    pub span: Option<Span>,
}

impl TreeNode {
    /// Create a leaf node.
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
            span: None,
        }
    }

    /// Create an interior node with ordered children.
    pub fn with_children(label: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            label: label.into(),
            children,
            span: None,
        }
    }

    /// Total number of nodes in this subtree, including this node.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }
}

/// Rooted ordered syntax tree for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxTree {
    /// Root node
    pub root: TreeNode,
}

impl SyntaxTree {
    /// Create a tree from parser output.
    pub fn new(root: TreeNode) -> Self {
        Self { root }
    }

    /// Total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }
}

/// One submission as the engine sees it: an identifier, a normalized token
/// stream, and a syntax tree when the upstream parse succeeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Stable submission identifier from the ingestion layer
    pub id: String,
    /// Normalized token stream
    pub tokens: TokenStream,
    /// Canonicalized syntax tree; `None` when the upstream parse failed
    pub tree: Option<SyntaxTree>,
}

impl Submission {
    /// Create a submission without a syntax tree.
    pub fn new(id: impl Into<String>, tokens: TokenStream) -> Self {
        Self {
            id: id.into(),
            tokens,
            tree: None,
        }
    }

    /// Attach a syntax tree.
    pub fn with_tree(mut self, tree: SyntaxTree) -> Self {
        self.tree = Some(tree);
        self
    }
}
