//! Lazy characteristic polynomial by cyclic decomposition.
//!
//! The space is covered by a chain of cyclic pieces: the first is spun from
//! the first unit vector under `A`; each following piece is spun from the
//! next unit vector not yet covered, working modulo everything covered so
//! far. The polynomial of each piece is the minimal polynomial of its seed
//! relative to the covered subspace, and the product of all pieces is the
//! characteristic polynomial.
//!
//! The first piece is a genuine cyclic subspace, so for every irreducible
//! `p` dividing its polynomial `m`, the vector `v0·(m/p)(A)` is a nonzero
//! element of the kernel of `p(A)`. Callers that only need that kernel
//! vector never pay for the remaining pieces.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use mtx::{CharPolyFactorizer, Field, Matrix};
//!
//! let f = Arc::new(Field::new(2).unwrap());
//! let a = Matrix::identity(f, 3);
//! let mut cp = CharPolyFactorizer::new(&a).unwrap();
//! assert_eq!(cp.first().unwrap().to_string(), "x+1");
//! assert_eq!(cp.remaining().unwrap().to_string(), "x^2+1");
//! ```

use crate::echelon::EchelonBasis;
use crate::error::{MtxError, Result};
use crate::matrix::{vec_mul, Matrix};
use crate::poly::Poly;

/// Stateful stream of cyclic-piece polynomials of one square matrix.
#[derive(Clone, Debug)]
pub struct CharPolyFactorizer {
    matrix: Matrix,
    covered: EchelonBasis,
    next_unit: usize,
    first: Option<(Vec<u8>, Poly)>,
}

impl CharPolyFactorizer {
    /// Start a stream for `matrix`.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix is not square.
    pub fn new(matrix: &Matrix) -> Result<Self> {
        if !matrix.is_square() {
            return Err(MtxError::DimensionMismatch {
                op: "charpoly",
                left: matrix.shape(),
                right: matrix.shape(),
            });
        }
        Ok(Self {
            covered: EchelonBasis::new(matrix.field().clone(), matrix.cols()),
            matrix: matrix.clone(),
            next_unit: 0,
            first: None,
        })
    }

    /// The matrix being factored.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Polynomial of the first cyclic piece. Computed once.
    ///
    /// # Errors
    ///
    /// Propagates polynomial arithmetic errors.
    pub fn first(&mut self) -> Result<Poly> {
        if let Some((_, p)) = &self.first {
            return Ok(p.clone());
        }
        let piece = match self.next_seed() {
            Some(seed) => {
                let p = self.spin_piece(&seed)?;
                self.first = Some((seed, p.clone()));
                p
            }
            None => Poly::one(self.matrix.field().clone()),
        };
        Ok(piece)
    }

    /// Polynomial of the next cyclic piece, `None` once the whole space is
    /// covered. Starts with the first piece if it was not requested yet.
    ///
    /// # Errors
    ///
    /// Propagates polynomial arithmetic errors.
    pub fn next_piece(&mut self) -> Result<Option<Poly>> {
        if self.first.is_none() {
            if self.covered.is_full() {
                return Ok(None);
            }
            return self.first().map(Some);
        }
        match self.next_seed() {
            Some(seed) => self.spin_piece(&seed).map(Some),
            None => Ok(None),
        }
    }

    /// Product of all pieces after the first.
    ///
    /// # Errors
    ///
    /// Propagates polynomial arithmetic errors.
    pub fn remaining(&mut self) -> Result<Poly> {
        self.first()?;
        let mut acc = Poly::one(self.matrix.field().clone());
        while let Some(p) = self.next_piece()? {
            acc = acc.mul(&p)?;
        }
        Ok(acc)
    }

    /// Seed vector of the first cyclic piece, once computed.
    pub fn first_seed(&self) -> Option<&[u8]> {
        self.first.as_ref().map(|(s, _)| s.as_slice())
    }

    /// A nonzero vector in the kernel of `p(A)` inside the first cyclic
    /// piece, or `None` if `p` does not divide the first polynomial.
    ///
    /// # Errors
    ///
    /// Propagates polynomial arithmetic errors.
    pub fn kernel_seed(&mut self, p: &Poly) -> Result<Option<Vec<u8>>> {
        let m = self.first()?;
        let Some((seed, _)) = &self.first else {
            return Ok(None);
        };
        let (h, r) = m.divrem(p)?;
        if !r.is_zero() {
            return Ok(None);
        }
        let field = self.matrix.field();
        let mut acc = vec![0u8; seed.len()];
        let mut power = seed.clone();
        for (i, &c) in h.coeffs().iter().enumerate() {
            if i > 0 {
                power = vec_mul(field, &power, &self.matrix);
            }
            crate::matrix::axpy(field, &mut acc, c, &power);
        }
        Ok(acc.iter().any(|&x| x != 0).then_some(acc))
    }

    fn next_seed(&mut self) -> Option<Vec<u8>> {
        let n = self.matrix.cols();
        while self.next_unit < n {
            let mut e = vec![0u8; n];
            e[self.next_unit] = 1;
            self.next_unit += 1;
            if !self.covered.contains(&e) {
                return Some(e);
            }
        }
        None
    }

    /// Spin `seed` modulo the covered space, add the piece to it and return
    /// the relative minimal polynomial.
    fn spin_piece(&mut self, seed: &[u8]) -> Result<Poly> {
        let field = self.matrix.field().clone();
        let f = &*field;
        // Triangular basis of the piece: (vector, pivot, tag) with
        // vector ≡ seed·tag(A) modulo the covered space.
        let mut local: Vec<(Vec<u8>, usize, Poly)> = Vec::new();
        let mut cur = seed.to_vec();
        let mut tag = Poly::one(field.clone());
        loop {
            self.covered.reduce(&mut cur);
            for (w, pivot, wtag) in &local {
                let c = cur[*pivot];
                if c != 0 {
                    let neg = f.neg(c);
                    crate::matrix::axpy(f, &mut cur, neg, w);
                    tag = tag.add(&wtag.scale(neg));
                }
            }
            let Some(pivot) = cur.iter().position(|&x| x != 0) else {
                break;
            };
            let s = f.inv(cur[pivot])?;
            for x in cur.iter_mut() {
                *x = f.mul(*x, s);
            }
            let tag_n = tag.scale(s);
            let next = vec_mul(f, &cur, &self.matrix);
            let next_tag = tag_n.mul(&Poly::x(field.clone()))?;
            local.push((cur, pivot, tag_n));
            cur = next;
            tag = next_tag;
        }
        for (w, _, _) in local {
            self.covered.insert(w);
        }
        tag.monic()
    }
}

/// Full characteristic polynomial.
///
/// # Errors
///
/// Returns an error if the matrix is not square.
pub fn char_poly(matrix: &Matrix) -> Result<Poly> {
    let mut cp = CharPolyFactorizer::new(matrix)?;
    let first = cp.first()?;
    first.mul(&cp.remaining()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use std::sync::Arc;

    fn gf(q: u32) -> Arc<Field> {
        Arc::new(Field::new(q).unwrap())
    }

    #[test]
    fn companion_matrix_is_one_piece() {
        let f = gf(2);
        // Companion of x^3 + x + 1 acting on rows: e0 -> e1 -> e2 -> e0 + e1.
        let a = Matrix::from_rows(
            f.clone(),
            &[vec![0, 1, 0], vec![0, 0, 1], vec![1, 1, 0]],
        )
        .unwrap();
        let mut cp = CharPolyFactorizer::new(&a).unwrap();
        assert_eq!(cp.first().unwrap(), Poly::new(f.clone(), vec![1, 1, 0, 1]));
        assert_eq!(cp.next_piece().unwrap(), None);
        assert!(cp.remaining().unwrap().is_one());
    }

    #[test]
    fn char_poly_agrees_with_cayley_hamilton() {
        let f = gf(5);
        let a = Matrix::from_rows(
            f.clone(),
            &[vec![2, 0, 1], vec![0, 2, 0], vec![3, 1, 4]],
        )
        .unwrap();
        let c = char_poly(&a).unwrap();
        assert_eq!(c.deg(), 3);
        assert!(c.eval_matrix(&a).unwrap().is_zero());
    }

    #[test]
    fn kernel_seed_is_annihilated() {
        let f = gf(3);
        let a = Matrix::from_rows(
            f.clone(),
            &[vec![1, 1, 0], vec![0, 2, 0], vec![0, 0, 1]],
        )
        .unwrap();
        let mut cp = CharPolyFactorizer::new(&a).unwrap();
        let m = cp.first().unwrap();
        let fs = crate::factor::factor(&m).unwrap();
        for (p, _) in fs.factors() {
            let v = cp.kernel_seed(p).unwrap().unwrap();
            let pa = p.eval_matrix(&a).unwrap();
            assert!(vec_mul(&f, &v, &pa).iter().all(|&x| x == 0));
        }
    }

    #[test]
    fn kernel_seed_absent_for_foreign_factor() {
        let f = gf(2);
        let a = Matrix::identity(f.clone(), 2);
        let mut cp = CharPolyFactorizer::new(&a).unwrap();
        let x = Poly::x(f);
        assert_eq!(cp.kernel_seed(&x).unwrap(), None);
    }
}
