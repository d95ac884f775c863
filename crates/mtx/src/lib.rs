//! Linear algebra over small finite fields for chopping modules.
//!
//! A *representation* is a list of square generator matrices over GF(q).
//! Vectors are rows and generators act from the right, so a subspace `S` is
//! invariant when `S·g ⊆ S` for every generator `g`.
//!
//! # Layers
//!
//! | Layer | Modules |
//! |-------|---------|
//! | Arithmetic | [`field`], [`matrix`], [`echelon`] |
//! | Polynomials | [`poly`], [`factor`], [`charpoly`] |
//! | Modules | [`spinup`], [`split`], [`words`], [`endo`] |
//! | Persistence | [`text`] |
//!
//! # Example: a split by spin-up
//!
//! ```
//! use std::sync::Arc;
//! use mtx::{spin_up, split, Field, Matrix, SpinMode};
//!
//! let f = Arc::new(Field::new(2).unwrap());
//! // e1 spans the only invariant line of this unipotent matrix.
//! let g = Matrix::from_rows(f.clone(), &[vec![1, 1], vec![0, 1]]).unwrap();
//! let seed = Matrix::row_vector(f, &[0, 1]);
//! let sub = spin_up(&seed, &[g.clone()], SpinMode::First).unwrap();
//! assert_eq!(sub.dim(), 1);
//!
//! let parts = split(&sub, &[g]).unwrap();
//! assert_eq!(parts.sub[0].shape(), (1, 1));
//! assert_eq!(parts.quot[0].shape(), (1, 1));
//! ```
//!
//! # Example: words and fingerprints
//!
//! ```
//! use std::sync::Arc;
//! use mtx::{fingerprint, Field, Matrix, WordGenerator};
//!
//! let f = Arc::new(Field::new(3).unwrap());
//! let a = Matrix::identity(f.clone(), 2);
//! let b = Matrix::from_rows(f, &[vec![0, 1], vec![1, 0]]).unwrap();
//! let mut words = WordGenerator::new(vec![a, b]).unwrap();
//! assert_eq!(words.symbolic_name(6), "aa+b");
//! // Word 3 is a + b = [[1,1],[1,1]], which has a one-dimensional kernel.
//! assert_eq!(fingerprint(&mut words).unwrap()[2], 1);
//! ```

// GF(q) arithmetic tables
pub mod field;

// Growable bit sets over word numbers
pub mod bitset;

// Dense matrices and null spaces
pub mod matrix;

// Incremental reduced echelon bases
pub mod echelon;

// Polynomials over GF(q)
pub mod poly;

// Square-free and Berlekamp factorisation
pub mod factor;

// Lazy characteristic polynomial
pub mod charpoly;

// Invariant subspace closure and standard bases
pub mod spinup;

// Subspace and quotient actions
pub mod split;

// Word generator and fingerprints
pub mod words;

// Isomorphism and splitting-field tests
pub mod endo;

// Text matrix format
pub mod text;

mod error;

pub use bitset::BitSet;
pub use charpoly::{char_poly, CharPolyFactorizer};
pub use echelon::EchelonBasis;
pub use endo::{canonical_form, check_splitting_degree, is_isomorphic};
pub use error::{MtxError, Result};
pub use factor::{factor, is_irreducible, FactorSet};
pub use field::{Field, MAX_Q};
pub use matrix::{axpy, vec_mul, Matrix};
pub use poly::Poly;
pub use spinup::{
    apply_script, check_generators, conjugate, spin_up, standard_basis, SpinMode, StandardBasis,
};
pub use split::{quotient_projection, split, ModuleSplit};
pub use text::{format_matrices, format_matrix, parse_matrices, parse_matrix};
pub use words::{fingerprint, WordGenerator, MAXFP};
