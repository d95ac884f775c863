//! Incremental reduced row echelon bases.
//!
//! An [`EchelonBasis`] holds a subspace of GF(q)^n as rows in reduced row
//! echelon form, sorted by pivot column. Every row has a 1 at its pivot and
//! zeros at all other pivots, so:
//!
//! - reducing a vector is a single pass over the rows,
//! - the coordinates of a vector inside the span are its entries at the
//!   pivot columns,
//! - the unit vectors at the non-pivot columns are a basis of a complement,
//!   and the quotient coordinates of a vector are its reduced entries at the
//!   non-pivot columns.

use std::sync::Arc;

use crate::field::Field;
use crate::matrix::Matrix;

/// A subspace in reduced row echelon form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EchelonBasis {
    field: Arc<Field>,
    cols: usize,
    rows: Vec<Vec<u8>>,
    pivots: Vec<usize>,
}

impl EchelonBasis {
    /// The zero subspace of GF(q)^cols.
    pub fn new(field: Arc<Field>, cols: usize) -> Self {
        Self {
            field,
            cols,
            rows: Vec::new(),
            pivots: Vec::new(),
        }
    }

    /// Span of the rows of `m`.
    pub fn from_matrix(m: &Matrix) -> Self {
        let mut basis = Self::new(m.field().clone(), m.cols());
        for r in 0..m.rows() {
            basis.insert(m.row(r).to_vec());
        }
        basis
    }

    /// Dimension of the subspace.
    #[inline]
    pub fn dim(&self) -> usize {
        self.rows.len()
    }

    /// Dimension of the ambient space.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// True if the subspace is the whole ambient space.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.rows.len() == self.cols
    }

    /// The field.
    pub fn field(&self) -> &Arc<Field> {
        &self.field
    }

    /// Pivot column of each row, ascending.
    pub fn pivots(&self) -> &[usize] {
        &self.pivots
    }

    /// Basis rows, sorted by pivot.
    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    /// Columns that carry no pivot, ascending.
    pub fn non_pivots(&self) -> Vec<usize> {
        let mut is_pivot = vec![false; self.cols];
        for &p in &self.pivots {
            is_pivot[p] = true;
        }
        (0..self.cols).filter(|&c| !is_pivot[c]).collect()
    }

    /// Reduce `v` modulo the subspace, in place.
    pub fn reduce(&self, v: &mut [u8]) {
        let f = &*self.field;
        for (row, &p) in self.rows.iter().zip(&self.pivots) {
            let c = v[p];
            if c != 0 {
                let neg = f.neg(c);
                for (x, &y) in v.iter_mut().zip(row) {
                    if y != 0 {
                        *x = f.add(*x, f.mul(neg, y));
                    }
                }
            }
        }
    }

    /// Test membership.
    pub fn contains(&self, v: &[u8]) -> bool {
        let mut w = v.to_vec();
        self.reduce(&mut w);
        w.iter().all(|&x| x == 0)
    }

    /// Add `v` to the subspace. Returns `false` if it was already contained.
    pub fn insert(&mut self, mut v: Vec<u8>) -> bool {
        self.reduce(&mut v);
        let Some(pivot) = v.iter().position(|&x| x != 0) else {
            return false;
        };
        let f = &*self.field;
        // Normalise: pivot entry becomes 1. Nonzero, so the inverse exists.
        let scale = match f.inv(v[pivot]) {
            Ok(s) => s,
            Err(_) => return false,
        };
        for x in v.iter_mut() {
            *x = f.mul(*x, scale);
        }
        for row in &mut self.rows {
            let c = row[pivot];
            if c != 0 {
                let neg = f.neg(c);
                for (x, &y) in row.iter_mut().zip(&v) {
                    if y != 0 {
                        *x = f.add(*x, f.mul(neg, y));
                    }
                }
            }
        }
        let at = self.pivots.partition_point(|&p| p < pivot);
        self.pivots.insert(at, pivot);
        self.rows.insert(at, v);
        true
    }

    /// Coordinates of `v` with respect to the basis rows.
    ///
    /// Only meaningful when `v` lies in the subspace.
    pub fn coordinates(&self, v: &[u8]) -> Vec<u8> {
        self.pivots.iter().map(|&p| v[p]).collect()
    }

    /// Coordinates of the image of `v` in the quotient by this subspace,
    /// with respect to the unit vectors at the non-pivot columns.
    pub fn quotient_coordinates(&self, v: &[u8]) -> Vec<u8> {
        let mut w = v.to_vec();
        self.reduce(&mut w);
        self.non_pivots().into_iter().map(|c| w[c]).collect()
    }

    /// The basis as a matrix, one row per basis vector.
    pub fn to_matrix(&self) -> Matrix {
        let mut m = Matrix::zero(self.field.clone(), 0, self.cols);
        for row in &self.rows {
            m.push_row(row);
        }
        m
    }

    /// Consume into the basis matrix.
    pub fn into_matrix(self) -> Matrix {
        self.to_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gf(q: u32) -> Arc<Field> {
        Arc::new(Field::new(q).unwrap())
    }

    #[test]
    fn insert_keeps_reduced_form() {
        let f = gf(3);
        let mut b = EchelonBasis::new(f, 3);
        assert!(b.insert(vec![0, 2, 1]));
        assert!(b.insert(vec![1, 1, 0]));
        assert!(!b.insert(vec![1, 2, 2]));
        assert_eq!(b.pivots(), &[0, 1]);
        // Row 0 has a zero under the pivot of row 1 and vice versa.
        assert_eq!(b.rows()[0][1], 0);
        assert_eq!(b.rows()[1][0], 0);
        assert_eq!(b.rows()[1][1], 1);
    }

    #[test]
    fn coordinates_recover_combination() {
        let f = gf(5);
        let mut b = EchelonBasis::new(f.clone(), 4);
        b.insert(vec![1, 0, 2, 3]);
        b.insert(vec![0, 1, 4, 1]);
        // 2·row0 + 3·row1
        let v: Vec<u8> = (0..4)
            .map(|i| f.add(f.mul(2, b.rows()[0][i]), f.mul(3, b.rows()[1][i])))
            .collect();
        assert!(b.contains(&v));
        assert_eq!(b.coordinates(&v), vec![2, 3]);
    }

    #[test]
    fn quotient_coordinates_drop_subspace_part() {
        let f = gf(2);
        let mut b = EchelonBasis::new(f, 3);
        b.insert(vec![1, 1, 0]);
        assert_eq!(b.non_pivots(), vec![1, 2]);
        assert_eq!(b.quotient_coordinates(&[1, 1, 0]), vec![0, 0]);
        assert_eq!(b.quotient_coordinates(&[1, 0, 1]), vec![1, 1]);
    }
}
