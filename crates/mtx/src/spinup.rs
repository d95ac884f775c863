//! Spin-up: the smallest invariant subspace containing given seeds.
//!
//! | Mode | Seeds used | Result |
//! |------|------------|--------|
//! | `First` | first nonzero seed | its closure |
//! | `Each` | every seed row separately | first proper closure, else full |
//! | `Combine` | span of all seeds | closure of the span |
//! | `Make` | every projective point of the seed span | first proper closure, else full |
//!
//! [`standard_basis`] is the canonical variant: it spins a single seed,
//! recording which (row, generator) products extended the basis. Replaying
//! that script from the image of the seed under a module isomorphism yields
//! the image basis, which is what the isomorphism and splitting-field tests
//! rely on.

use std::sync::Arc;

use tracing::trace;

use crate::echelon::EchelonBasis;
use crate::error::{MtxError, Result};
use crate::field::Field;
use crate::matrix::{vec_mul, Matrix};

/// How the seed vectors are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinMode {
    /// Spin the first nonzero seed only.
    First,
    /// Spin each seed row on its own.
    Each,
    /// Spin the span of all seeds together.
    Combine,
    /// Spin every one-dimensional subspace of the seed span.
    Make,
}

/// Check that `gens` is a nonempty list of `n × n` matrices over one field.
///
/// # Errors
///
/// Returns [`MtxError::InvalidGenerators`] otherwise.
pub fn check_generators(gens: &[Matrix]) -> Result<usize> {
    let first = gens
        .first()
        .ok_or_else(|| MtxError::InvalidGenerators("no generators".into()))?;
    let n = first.rows();
    for (i, g) in gens.iter().enumerate() {
        if g.shape() != (n, n) {
            return Err(MtxError::InvalidGenerators(format!(
                "generator {} is {}x{}, expected {n}x{n}",
                i + 1,
                g.rows(),
                g.cols()
            )));
        }
        if g.field() != first.field() {
            return Err(MtxError::FieldMismatch {
                left: first.field().order(),
                right: g.field().order(),
            });
        }
    }
    Ok(n)
}

/// Closure of the span of `start` under `gens`.
fn closure<I>(field: &Arc<Field>, n: usize, start: I, gens: &[Matrix]) -> EchelonBasis
where
    I: IntoIterator<Item = Vec<u8>>,
{
    let mut basis = EchelonBasis::new(field.clone(), n);
    let mut pending: Vec<Vec<u8>> = Vec::new();
    for v in start {
        if basis.insert(v.clone()) {
            pending.push(v);
        }
    }
    let mut i = 0;
    while i < pending.len() && !basis.is_full() {
        for g in gens {
            let w = vec_mul(field, &pending[i], g);
            if basis.insert(w.clone()) {
                pending.push(w);
            }
        }
        i += 1;
    }
    basis
}

/// Spin up `seeds` (rows) under `gens` in the given mode.
///
/// # Errors
///
/// Returns an error if the generators are malformed or the seeds have the
/// wrong length.
pub fn spin_up(seeds: &Matrix, gens: &[Matrix], mode: SpinMode) -> Result<EchelonBasis> {
    let n = check_generators(gens)?;
    if seeds.cols() != n {
        return Err(MtxError::DimensionMismatch {
            op: "spin_up",
            left: seeds.shape(),
            right: (n, n),
        });
    }
    let field = gens[0].field().clone();
    let nonzero = || seeds.row_iter().filter(|r| r.iter().any(|&x| x != 0));
    let result = match mode {
        SpinMode::First => closure(&field, n, nonzero().take(1).map(<[u8]>::to_vec), gens),
        SpinMode::Combine => closure(&field, n, nonzero().map(<[u8]>::to_vec), gens),
        SpinMode::Each => {
            let mut last = EchelonBasis::new(field.clone(), n);
            for seed in nonzero() {
                last = closure(&field, n, [seed.to_vec()], gens);
                if !last.is_full() {
                    break;
                }
            }
            last
        }
        SpinMode::Make => {
            let span = EchelonBasis::from_matrix(seeds);
            let mut last = EchelonBasis::new(field.clone(), n);
            for point in ProjectivePoints::new(&span) {
                last = closure(&field, n, [point], gens);
                if !last.is_full() {
                    break;
                }
            }
            last
        }
    };
    trace!(?mode, seeds = seeds.rows(), dim = result.dim(), "spin-up");
    Ok(result)
}

/// Normalised representatives of the one-dimensional subspaces of a span:
/// combinations of the basis rows whose first nonzero coefficient is 1.
struct ProjectivePoints<'a> {
    span: &'a EchelonBasis,
    coeffs: Vec<u8>,
    done: bool,
}

impl<'a> ProjectivePoints<'a> {
    fn new(span: &'a EchelonBasis) -> Self {
        let k = span.dim();
        let mut coeffs = vec![0u8; k];
        if let Some(last) = coeffs.last_mut() {
            *last = 1;
        }
        Self {
            span,
            coeffs,
            done: k == 0,
        }
    }

    /// Advance the coefficient vector as a base-q counter, skipping vectors
    /// whose first nonzero entry is not 1.
    fn advance(&mut self) {
        let q = self.span.field().order();
        loop {
            let mut i = self.coeffs.len();
            loop {
                if i == 0 {
                    self.done = true;
                    return;
                }
                i -= 1;
                if u32::from(self.coeffs[i]) + 1 < q {
                    self.coeffs[i] += 1;
                    break;
                }
                self.coeffs[i] = 0;
            }
            if self.coeffs.iter().find(|&&c| c != 0) == Some(&1) {
                return;
            }
        }
    }
}

impl Iterator for ProjectivePoints<'_> {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        if self.done {
            return None;
        }
        let f = &**self.span.field();
        let mut v = vec![0u8; self.span.cols()];
        for (&c, row) in self.coeffs.iter().zip(self.span.rows()) {
            crate::matrix::axpy(f, &mut v, c, row);
        }
        self.advance();
        Some(v)
    }
}

/// A basis obtained by canonical spin-up of one seed.
#[derive(Clone, Debug)]
pub struct StandardBasis {
    /// Basis rows; row 0 is the seed.
    pub basis: Matrix,
    /// For each row after the first: (earlier row, generator index).
    pub script: Vec<(usize, usize)>,
}

impl StandardBasis {
    /// Number of basis vectors.
    pub fn dim(&self) -> usize {
        self.basis.rows()
    }
}

/// Canonical spin-up of `seed` under `gens`.
///
/// # Errors
///
/// Returns an error if the generators are malformed or `seed` has the wrong
/// length or is zero.
pub fn standard_basis(seed: &[u8], gens: &[Matrix]) -> Result<StandardBasis> {
    let n = check_generators(gens)?;
    if seed.len() != n {
        return Err(MtxError::DimensionMismatch {
            op: "standard_basis",
            left: (1, seed.len()),
            right: (n, n),
        });
    }
    let field = gens[0].field().clone();
    let mut echelon = EchelonBasis::new(field.clone(), n);
    if !echelon.insert(seed.to_vec()) {
        return Err(MtxError::InvalidGenerators("zero seed vector".into()));
    }
    let mut basis = Matrix::row_vector(field.clone(), seed);
    let mut script = Vec::new();
    let mut i = 0;
    while i < basis.rows() && !echelon.is_full() {
        for (k, g) in gens.iter().enumerate() {
            let w = vec_mul(&field, basis.row(i), g);
            if echelon.insert(w.clone()) {
                basis.push_row(&w);
                script.push((i, k));
            }
        }
        i += 1;
    }
    Ok(StandardBasis { basis, script })
}

/// Replay a standard-basis script from another seed.
///
/// # Errors
///
/// Returns an error if the generators are malformed.
pub fn apply_script(seed: &[u8], gens: &[Matrix], script: &[(usize, usize)]) -> Result<Matrix> {
    check_generators(gens)?;
    let field = gens[0].field().clone();
    let mut basis = Matrix::row_vector(field.clone(), seed);
    for &(row, k) in script {
        let w = vec_mul(&field, basis.row(row), &gens[k]);
        basis.push_row(&w);
    }
    Ok(basis)
}

/// Generators in a new basis: `B·g·B⁻¹` for each `g`.
///
/// # Errors
///
/// Returns an error if `basis` is singular or shapes do not fit.
pub fn conjugate(gens: &[Matrix], basis: &Matrix) -> Result<Vec<Matrix>> {
    let inv = basis.inverse()?;
    gens.iter().map(|g| basis.mul(g)?.mul(&inv)).collect()
}
