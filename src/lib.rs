//! # Tessera-RS: Structural Similarity & Signal Fusion Engine
//!
//! The algorithmic core of a source-code plagiarism screening system,
//! designed for deterministic results and safe-by-default scoring. This
//! library provides:
//!
//! - **Greedy string tiling**: RK-GST maximal-match extraction over
//!   normalized token streams, accelerated by an exact n-gram hash index
//! - **Tree similarity**: order-preserving greedy subtree matching over
//!   parsed program structure
//! - **Structural combination**: tiling/tree/hybrid blending with weight
//!   renormalization when a method is unavailable
//! - **Signal fusion**: lexical + structural + semantic scores merged
//!   through an ordered, auditable student-safe bias pipeline
//! - **Severity classification**: CLEAN / PARTIAL / SEVERE banding with
//!   closed lower boundaries
//!
//! ## Determinism
//!
//! Every comparison is a pure function of two immutable inputs and an
//! immutable configuration validated once at engine construction. Tiling
//! tie-breaks and the bias-pipeline order are fully specified, so identical
//! inputs always produce a bit-identical [`SimilarityResult`] regardless of
//! thread scheduling or invocation order.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tessera_rs::{TesseraConfig, TesseraEngine};
//! use tessera_rs::api::engine::{ExternalSignals, PairInput};
//! use tessera_rs::core::submission::Submission;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = TesseraEngine::new(TesseraConfig::default())?;
//!     # let (a, b): (Submission, Submission) = unimplemented!();
//!     let result = engine.compare_pair(&PairInput {
//!         a: &a,
//!         b: &b,
//!         signals: ExternalSignals::new(42.0, 38.5),
//!     })?;
//!     println!("{}: {:?}", result.final_score, result.severity);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

// Core data structures and configuration
pub mod core {
    //! Core data model, configuration, errors, and result records.

    pub mod config;
    pub mod errors;
    pub mod results;
    pub mod submission;
}

// Per-signal similarity engines
pub mod detectors {
    //! Structural similarity detectors.

    pub mod structural;
    pub mod tiling;
    pub mod tree;
}

// Signal fusion and classification
pub mod fusion {
    //! Multi-signal fusion, bias pipeline, and classification.

    pub mod bias;
    pub mod explanation;
    pub mod severity;

    mod engine;
    pub use engine::{SignalFusionEngine, SignalSet};
}

// Outward-facing engine facade
pub mod api {
    //! Public engine facade and batch driver.

    pub mod engine;
}

pub use api::engine::TesseraEngine;
pub use core::config::TesseraConfig;
pub use core::errors::{Result, TesseraError};
pub use core::results::{Severity, SimilarityResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
