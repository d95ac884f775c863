//! Error type of the chop engine.

use mtx::MtxError;
use thiserror::Error;

/// Failures of a chop run. All of them end the run.
#[derive(Debug, Error)]
pub enum ChopError {
    /// No word split the node or proved it irreducible within the trial
    /// bound.
    #[error("GAME OVER: node {node} (dim {dim}) undecided after {tries} words, last word {last_word}")]
    Exhausted {
        /// Node id.
        node: usize,
        /// Dimension of the node.
        dim: usize,
        /// Number of words tried.
        tries: u64,
        /// Last word number tried.
        last_word: u64,
    },

    /// No identifying word was found for a new irreducible.
    #[error("no identifying word for node {node} (dim {dim}) after {tries} tries")]
    IdWordNotFound {
        /// Node id.
        node: usize,
        /// Dimension of the node.
        dim: usize,
        /// Number of words examined.
        tries: u64,
    },

    /// An internal invariant was violated.
    #[error("inconsistent state: {0}")]
    Inconsistent(String),

    /// A matrix or polynomial primitive failed.
    #[error(transparent)]
    Mtx(#[from] MtxError),

    /// The persistence sink failed.
    #[error("persistence failed: {0}")]
    Persist(String),
}

/// Result alias for engine operations.
pub type Result<T> = core::result::Result<T, ChopError>;
