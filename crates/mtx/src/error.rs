//! Error type shared by all `mtx` primitives.

use thiserror::Error;

/// Errors raised by field, matrix and polynomial operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MtxError {
    /// The requested field order is not a prime power, or exceeds 256.
    #[error("unsupported field order {0} (need a prime power q <= 256)")]
    UnsupportedField(u32),

    /// Two operands live over different fields.
    #[error("field mismatch: GF({left}) vs GF({right})")]
    FieldMismatch {
        /// Order of the left operand's field.
        left: u32,
        /// Order of the right operand's field.
        right: u32,
    },

    /// Operand shapes do not fit the operation.
    #[error("dimension mismatch in {op}: {left:?} vs {right:?}")]
    DimensionMismatch {
        /// Name of the failing operation.
        op: &'static str,
        /// (rows, cols) of the left operand.
        left: (usize, usize),
        /// (rows, cols) of the right operand.
        right: (usize, usize),
    },

    /// Inversion of a singular matrix or of the field element zero.
    #[error("{0} is not invertible")]
    NotInvertible(&'static str),

    /// Operation undefined for the zero polynomial.
    #[error("zero polynomial in {0}")]
    ZeroPolynomial(&'static str),

    /// A generator list was empty or its matrices were not square of equal size.
    #[error("invalid generators: {0}")]
    InvalidGenerators(String),

    /// A field element is out of range for the field.
    #[error("element {value} out of range for GF({q})")]
    ElementOutOfRange {
        /// Offending value.
        value: u32,
        /// Field order.
        q: u32,
    },

    /// Malformed text matrix input.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },
}

/// Result alias for `mtx` operations.
pub type Result<T> = core::result::Result<T, MtxError>;
