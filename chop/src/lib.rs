//! Composition series of modules over finite fields.
//!
//! Given generator matrices of a representation over GF(q), the engine
//! splits the module recursively into a submodule and a quotient until
//! every piece is irreducible. Irreducible pieces are sorted into
//! isomorphism classes, each stored once in a canonical basis.
//!
//! # Pipeline
//!
//! ```text
//! node ──► saved vectors ──► good words ──► words 1, 2, … ──► GAME OVER
//!   │            │                │                │
//!   │            └── split ◄──────┴── Norton test ─┤
//!   │                                              └── exceptional case
//!   └── irreducible ──► fingerprint ──► isomorphism test ──► table
//! ```
//!
//! | Piece | Module |
//! |-------|--------|
//! | Node arena, bad words | [`node`] |
//! | Run state | [`context`] |
//! | Constituent table | [`table`] |
//! | Output | [`report`], [`persist`] |
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chop::{chop, ChopOptions};
//! use mtx::{Field, Matrix};
//!
//! let f = Arc::new(Field::new(2).unwrap());
//! let report = chop(vec![Matrix::identity(f, 2)], ChopOptions::default()).unwrap();
//! assert_eq!(report.constituents.len(), 1);
//! assert_eq!(report.constituents[0].name, "1a");
//! assert_eq!(report.constituents[0].multiplicity, 2);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

// Run-wide state
pub mod context;

// Node arena
pub mod node;

// Search parameters
pub mod options;

// Constituent sinks
pub mod persist;

// Statistics and serializable results
pub mod report;

// Distinct constituents
pub mod table;

// The chop loop
mod engine;

// Errors
mod error;

// Exceptional case
mod exceptional;

// Registration of irreducibles
mod irred;

// Norton test
mod poly_split;

// Per-word trial state
mod trial;

pub use context::{ChopContext, KnownIdWord};
pub use engine::ChopEngine;
pub use error::{ChopError, Result};
pub use node::{Node, NodeId, NodeTree, Piece};
pub use options::ChopOptions;
pub use persist::{ConstituentSink, FileSink, MemorySink};
pub use report::{ChopReport, ConstituentRecord, SeriesEntry, Statistics};
pub use table::{class_letters, Constituent, ConstituentTable, NewConstituent};

use mtx::Matrix;

/// Chop `gens` with an in-memory sink.
///
/// # Errors
///
/// See [`ChopEngine::run`].
pub fn chop(gens: Vec<Matrix>, options: ChopOptions) -> Result<ChopReport> {
    ChopEngine::new(ChopContext::new(options, MemorySink::new())).run(gens)
}
