//! Greedy string tiling (RK-GST) over normalized token streams.
//!
//! Repeatedly extracts the longest contiguous run of tokens common to the
//! unused portions of both streams, marks it as a tile, and repeats until no
//! run of at least `min_match_length` remains. Candidate positions come from
//! an n-gram hash index over stream B; every hash hit is verified by full
//! token comparison, so hashing only accelerates the search and never
//! changes the result.
//!
//! Tie-break, applied deterministically: among equal-length maximal matches,
//! the one starting earliest in A wins, then earliest in B.

use std::hash::{BuildHasher, Hasher};

use ahash::RandomState;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::TilingConfig;
use crate::core::submission::TokenStream;

// Fixed seeds keep index bucketing reproducible across runs. Correctness
// never depends on the hash: collisions are resolved by token comparison.
const INDEX_SEEDS: (u64, u64, u64, u64) = (
    0x7465_7373_6572_6131,
    0x7465_7373_6572_6132,
    0x7465_7373_6572_6133,
    0x7465_7373_6572_6134,
);

/// One maximal matched run between the two streams.
///
/// Tiles produced for a single comparison never overlap in either stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Start index in stream A
    pub start_a: usize,
    /// Start index in stream B
    pub start_b: usize,
    /// Number of matched tokens
    pub length: usize,
}

/// Output of one tiling comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilingOutcome {
    /// Selected tiles, in selection (greedy longest-first) order
    pub tiles: Vec<Tile>,
    /// Symmetric coverage percentage: `2 * tiled / (|A| + |B|) * 100`
    pub coverage: f64,
}

impl TilingOutcome {
    fn empty() -> Self {
        Self {
            tiles: Vec::new(),
            coverage: 0.0,
        }
    }

    /// Total number of tokens covered by tiles, counted once per stream.
    pub fn tiled_tokens(&self) -> usize {
        self.tiles.iter().map(|t| t.length).sum()
    }
}

/// Greedy string tiling engine.
#[derive(Debug, Clone)]
pub struct TilingEngine {
    min_match_length: usize,
    index_state: RandomState,
}

impl TilingEngine {
    /// Create a tiling engine from validated configuration.
    pub fn new(config: &TilingConfig) -> Self {
        Self {
            min_match_length: config.min_match_length,
            index_state: RandomState::with_seeds(
                INDEX_SEEDS.0,
                INDEX_SEEDS.1,
                INDEX_SEEDS.2,
                INDEX_SEEDS.3,
            ),
        }
    }

    /// Compare two token streams and return the selected tiles plus the
    /// symmetric coverage percentage.
    ///
    /// Either stream empty, or `min_match_length` exceeding both stream
    /// lengths, yields 0% with no tiles.
    pub fn compare(&self, a: &TokenStream, b: &TokenStream) -> TilingOutcome {
        let (len_a, len_b) = (a.len(), b.len());
        let mml = self.min_match_length;

        if len_a == 0 || len_b == 0 || mml > len_a || mml > len_b {
            return TilingOutcome::empty();
        }

        // Index every min-length gram of B by hash.
        let index = self.build_gram_index(b);

        let mut marked_a = vec![false; len_a];
        let mut marked_b = vec![false; len_b];
        let mut tiles = Vec::new();

        loop {
            let best = self.find_longest_match(a, b, &marked_a, &marked_b, &index);

            let Some(tile) = best else {
                break;
            };

            for offset in 0..tile.length {
                marked_a[tile.start_a + offset] = true;
                marked_b[tile.start_b + offset] = true;
            }
            tiles.push(tile);
        }

        let tiled: usize = tiles.iter().map(|t| t.length).sum();
        let coverage = (2 * tiled) as f64 / (len_a + len_b) as f64 * 100.0;

        debug!(
            tiles = tiles.len(),
            tiled_tokens = tiled,
            coverage,
            "tiling comparison complete"
        );

        TilingOutcome { tiles, coverage }
    }

    /// Map each `min_match_length`-gram of B to its start positions, in
    /// ascending order.
    fn build_gram_index(&self, b: &TokenStream) -> ahash::AHashMap<u64, Vec<usize>> {
        let mml = self.min_match_length;
        let mut index: ahash::AHashMap<u64, Vec<usize>> = ahash::AHashMap::new();

        for j in 0..=(b.len() - mml) {
            let key = self.gram_hash(b, j);
            index.entry(key).or_default().push(j);
        }

        index
    }

    /// Hash the `min_match_length`-gram starting at `start`.
    fn gram_hash(&self, stream: &TokenStream, start: usize) -> u64 {
        let mut hasher = self.index_state.build_hasher();
        for offset in 0..self.min_match_length {
            hasher.write(stream.value(start + offset).as_bytes());
            // Separator byte so ["ab","c"] and ["a","bc"] hash apart.
            hasher.write_u8(0xff);
        }
        hasher.finish()
    }

    /// Find the longest unmarked matching run of at least
    /// `min_match_length` tokens, honoring the earliest-A / earliest-B
    /// tie-break.
    fn find_longest_match(
        &self,
        a: &TokenStream,
        b: &TokenStream,
        marked_a: &[bool],
        marked_b: &[bool],
        index: &ahash::AHashMap<u64, Vec<usize>>,
    ) -> Option<Tile> {
        let mml = self.min_match_length;
        let mut best: Option<Tile> = None;

        for i in 0..=(a.len() - mml) {
            if marked_a[i..i + mml].iter().any(|&m| m) {
                continue;
            }

            // An existing longer tile starting here cannot be beaten by a
            // shorter candidate; skip index probing when even the maximal
            // possible extension from i is too short.
            if let Some(current) = best {
                if a.len() - i < current.length + 1 {
                    break;
                }
            }

            let Some(candidates) = index.get(&self.gram_hash(a, i)) else {
                continue;
            };

            for &j in candidates {
                if marked_b[j..j + mml].iter().any(|&m| m) {
                    continue;
                }

                // Verify the gram itself (hash collisions), then extend.
                if !self.grams_equal(a, i, b, j) {
                    continue;
                }

                let length = self.extend_match(a, b, marked_a, marked_b, i, j);

                // Strictly greater keeps the earliest-A then earliest-B
                // winner among equal lengths.
                if best.map_or(true, |t| length > t.length) {
                    best = Some(Tile {
                        start_a: i,
                        start_b: j,
                        length,
                    });
                }
            }
        }

        best
    }

    fn grams_equal(&self, a: &TokenStream, i: usize, b: &TokenStream, j: usize) -> bool {
        (0..self.min_match_length).all(|offset| a.value(i + offset) == b.value(j + offset))
    }

    /// Length of the maximal unmarked equal run starting at (i, j). Callers
    /// guarantee the first `min_match_length` tokens already match.
    fn extend_match(
        &self,
        a: &TokenStream,
        b: &TokenStream,
        marked_a: &[bool],
        marked_b: &[bool],
        i: usize,
        j: usize,
    ) -> usize {
        let mut length = self.min_match_length;

        while i + length < a.len()
            && j + length < b.len()
            && !marked_a[i + length]
            && !marked_b[j + length]
            && a.value(i + length) == b.value(j + length)
        {
            length += 1;
        }

        length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::submission::{Span, Token, TokenKind, TokenStream};

    fn stream(values: &[&str]) -> TokenStream {
        TokenStream::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| Token::new(*v, TokenKind::Identifier, Span::new(i, i + 1)))
                .collect(),
        )
    }

    fn engine(min_match_length: usize) -> TilingEngine {
        TilingEngine::new(&TilingConfig { min_match_length })
    }

    #[test]
    fn identical_streams_score_full_coverage() {
        let a = stream(&["def", "VAR_1", "(", "VAR_2", ")", ":", "return", "VAR_2"]);
        let outcome = engine(3).compare(&a, &a.clone());
        assert_eq!(outcome.coverage, 100.0);
        assert_eq!(outcome.tiled_tokens(), 8);
    }

    #[test]
    fn disjoint_streams_score_zero() {
        let a = stream(&["for", "VAR_1", "in", "VAR_2"]);
        let b = stream(&["while", "VAR_3", ">", "NUM"]);
        let outcome = engine(3).compare(&a, &b);
        assert_eq!(outcome.coverage, 0.0);
        assert!(outcome.tiles.is_empty());
    }

    #[test]
    fn empty_stream_scores_zero() {
        let a = stream(&[]);
        let b = stream(&["x", "y", "z"]);
        assert_eq!(engine(3).compare(&a, &b).coverage, 0.0);
        assert_eq!(engine(3).compare(&b, &a).coverage, 0.0);
    }

    #[test]
    fn min_match_length_exceeding_streams_scores_zero() {
        let a = stream(&["x", "y"]);
        let outcome = engine(3).compare(&a, &a.clone());
        assert_eq!(outcome.coverage, 0.0);
    }

    #[test]
    fn tiles_never_overlap_in_either_stream() {
        let a = stream(&["a", "b", "c", "d", "a", "b", "c", "e", "f", "g"]);
        let b = stream(&["a", "b", "c", "e", "f", "g", "a", "b", "c", "d"]);
        let outcome = engine(3).compare(&a, &b);

        let mut seen_a = vec![false; a.len()];
        let mut seen_b = vec![false; b.len()];
        for tile in &outcome.tiles {
            for offset in 0..tile.length {
                assert!(!seen_a[tile.start_a + offset], "overlap in A at {tile:?}");
                assert!(!seen_b[tile.start_b + offset], "overlap in B at {tile:?}");
                seen_a[tile.start_a + offset] = true;
                seen_b[tile.start_b + offset] = true;
            }
        }
    }

    #[test]
    fn longest_match_is_selected_first() {
        let a = stream(&["p", "q", "r", "x", "a", "b", "c", "d"]);
        let b = stream(&["a", "b", "c", "d", "y", "p", "q", "r"]);
        let outcome = engine(3).compare(&a, &b);

        assert_eq!(outcome.tiles[0].length, 4);
        assert_eq!(outcome.tiles[0].start_a, 4);
        assert_eq!(outcome.tiles[0].start_b, 0);
    }

    #[test]
    fn equal_length_matches_prefer_earliest_in_a_then_b() {
        // Both ["a","b","c"] occurrences in A match both occurrences in B.
        let a = stream(&["a", "b", "c", "x", "a", "b", "c"]);
        let b = stream(&["y", "a", "b", "c", "z", "a", "b", "c"]);
        let outcome = engine(3).compare(&a, &b);

        assert_eq!(outcome.tiles[0].start_a, 0);
        assert_eq!(outcome.tiles[0].start_b, 1);
        assert_eq!(outcome.tiles[1].start_a, 4);
        assert_eq!(outcome.tiles[1].start_b, 5);
    }

    #[test]
    fn shared_run_below_min_match_length_contributes_nothing() {
        // Shared boilerplate of two tokens sits below the minimum of three.
        let a = stream(&["import", "sys", "p", "q", "r", "s"]);
        let b = stream(&["import", "sys", "w", "x", "y", "z"]);
        let outcome = engine(3).compare(&a, &b);
        assert_eq!(outcome.coverage, 0.0);
    }

    #[test]
    fn comparison_is_deterministic() {
        let a = stream(&["a", "b", "c", "a", "b", "c", "d", "e", "f"]);
        let b = stream(&["d", "e", "f", "a", "b", "c", "a", "b", "c"]);
        let eng = engine(3);
        let first = eng.compare(&a, &b);
        let second = eng.compare(&a, &b);
        assert_eq!(first, second);
    }
}
