//! Dense matrices over GF(q).
//!
//! Row-major storage, one `u8` per entry. Vectors are rows and matrices act
//! from the right: a generator `g` maps `v` to `v·g`, and a subspace `S` is
//! invariant when `S·g ⊆ S`. The null space of `M` is therefore the *left*
//! null space `{x : x·M = 0}`.

use core::fmt;
use std::sync::Arc;

use crate::echelon::EchelonBasis;
use crate::error::{MtxError, Result};
use crate::field::Field;

/// A matrix over a shared field.
#[derive(Clone, PartialEq, Eq)]
pub struct Matrix {
    field: Arc<Field>,
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl Matrix {
    /// The `rows × cols` zero matrix.
    pub fn zero(field: Arc<Field>, rows: usize, cols: usize) -> Self {
        Self {
            field,
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// The `n × n` identity.
    pub fn identity(field: Arc<Field>, n: usize) -> Self {
        let mut m = Self::zero(field, n, n);
        for i in 0..n {
            m.data[i * n + i] = 1;
        }
        m
    }

    /// Build from row-major data.
    ///
    /// # Errors
    ///
    /// Returns an error if the data length is wrong or an entry is not a
    /// field element.
    pub fn from_vec(field: Arc<Field>, rows: usize, cols: usize, data: Vec<u8>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(MtxError::DimensionMismatch {
                op: "from_vec",
                left: (rows, cols),
                right: (data.len(), 1),
            });
        }
        for &x in &data {
            field.check(u32::from(x))?;
        }
        Ok(Self {
            field,
            rows,
            cols,
            data,
        })
    }

    /// Build from rows of equal length.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows differ in length or hold invalid entries.
    pub fn from_rows(field: Arc<Field>, rows: &[Vec<u8>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for r in rows {
            if r.len() != cols {
                return Err(MtxError::DimensionMismatch {
                    op: "from_rows",
                    left: (rows.len(), cols),
                    right: (1, r.len()),
                });
            }
            data.extend_from_slice(r);
        }
        Self::from_vec(field, rows.len(), cols, data)
    }

    /// The field.
    #[inline]
    pub fn field(&self) -> &Arc<Field> {
        &self.field
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// True for square matrices.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// True if every entry is zero.
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&x| x == 0)
    }

    /// Entry at `(r, c)`.
    #[inline]
    pub fn get(&self, r: usize, c: usize) -> u8 {
        self.data[r * self.cols + c]
    }

    /// Set entry at `(r, c)`.
    #[inline]
    pub fn set(&mut self, r: usize, c: usize, value: u8) {
        self.data[r * self.cols + c] = value;
    }

    /// Row `r` as a slice.
    #[inline]
    pub fn row(&self, r: usize) -> &[u8] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// Row `r` as a mutable slice.
    #[inline]
    pub fn row_mut(&mut self, r: usize) -> &mut [u8] {
        let cols = self.cols;
        &mut self.data[r * cols..(r + 1) * cols]
    }

    /// Iterate over rows.
    pub fn row_iter(&self) -> impl Iterator<Item = &[u8]> {
        (0..self.rows).map(move |r| self.row(r))
    }

    /// Append a row. Its length must equal `cols`.
    pub fn push_row(&mut self, row: &[u8]) {
        debug_assert_eq!(row.len(), self.cols);
        self.data.extend_from_slice(row);
        self.rows += 1;
    }

    /// The single-row matrix holding `v`.
    pub fn row_vector(field: Arc<Field>, v: &[u8]) -> Self {
        Self {
            field,
            rows: 1,
            cols: v.len(),
            data: v.to_vec(),
        }
    }

    fn same_field(&self, other: &Self) -> Result<()> {
        if self.field == other.field {
            Ok(())
        } else {
            Err(MtxError::FieldMismatch {
                left: self.field.order(),
                right: other.field.order(),
            })
        }
    }

    /// Matrix product `self · other`.
    ///
    /// # Errors
    ///
    /// Returns an error on field or shape mismatch.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        self.same_field(other)?;
        if self.cols != other.rows {
            return Err(MtxError::DimensionMismatch {
                op: "mul",
                left: self.shape(),
                right: other.shape(),
            });
        }
        let mut out = Self::zero(self.field.clone(), self.rows, other.cols);
        for r in 0..self.rows {
            let v = vec_mul(&self.field, self.row(r), other);
            out.row_mut(r).copy_from_slice(&v);
        }
        Ok(out)
    }

    /// Sum `self + other`.
    ///
    /// # Errors
    ///
    /// Returns an error on field or shape mismatch.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.same_field(other)?;
        if self.shape() != other.shape() {
            return Err(MtxError::DimensionMismatch {
                op: "add",
                left: self.shape(),
                right: other.shape(),
            });
        }
        let f = &*self.field;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| f.add(a, b))
            .collect();
        Ok(Self {
            field: self.field.clone(),
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// Difference `self - other`.
    ///
    /// # Errors
    ///
    /// Returns an error on field or shape mismatch.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.add(&other.scale(self.field.neg(1)))
    }

    /// Scalar multiple `a · self`.
    pub fn scale(&self, a: u8) -> Self {
        let f = &*self.field;
        Self {
            field: self.field.clone(),
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| f.mul(a, x)).collect(),
        }
    }

    /// Add `a · I` to a square matrix, in place.
    pub fn add_scalar_diagonal(&mut self, a: u8) {
        let n = self.rows.min(self.cols);
        for i in 0..n {
            let x = self.get(i, i);
            self.set(i, i, self.field.add(x, a));
        }
    }

    /// Transpose.
    pub fn transpose(&self) -> Self {
        let mut out = Self::zero(self.field.clone(), self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.data[c * self.rows + r] = self.data[r * self.cols + c];
            }
        }
        out
    }

    /// Inverse of a square matrix by Gauss–Jordan elimination.
    ///
    /// # Errors
    ///
    /// Returns [`MtxError::NotInvertible`] if the matrix is singular, or a
    /// shape error if it is not square.
    pub fn inverse(&self) -> Result<Self> {
        if !self.is_square() {
            return Err(MtxError::DimensionMismatch {
                op: "inverse",
                left: self.shape(),
                right: self.shape(),
            });
        }
        let n = self.rows;
        let f = &*self.field;
        let mut a = self.clone();
        let mut inv = Self::identity(self.field.clone(), n);
        for col in 0..n {
            let pivot = (col..n)
                .find(|&r| a.get(r, col) != 0)
                .ok_or(MtxError::NotInvertible("singular matrix"))?;
            a.swap_rows(col, pivot);
            inv.swap_rows(col, pivot);
            let s = f.inv(a.get(col, col))?;
            a.scale_row(col, s);
            inv.scale_row(col, s);
            for r in 0..n {
                let c = a.get(r, col);
                if r != col && c != 0 {
                    let neg = f.neg(c);
                    a.add_row_multiple(r, col, neg);
                    inv.add_row_multiple(r, col, neg);
                }
            }
        }
        Ok(inv)
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a != b {
            for c in 0..self.cols {
                self.data.swap(a * self.cols + c, b * self.cols + c);
            }
        }
    }

    fn scale_row(&mut self, r: usize, s: u8) {
        let f = self.field.clone();
        for x in self.row_mut(r) {
            *x = f.mul(*x, s);
        }
    }

    /// `row[dst] += s · row[src]`.
    fn add_row_multiple(&mut self, dst: usize, src: usize, s: u8) {
        let f = self.field.clone();
        for c in 0..self.cols {
            let y = self.data[src * self.cols + c];
            if y != 0 {
                let i = dst * self.cols + c;
                self.data[i] = f.add(self.data[i], f.mul(s, y));
            }
        }
    }

    /// Rank.
    pub fn rank(&self) -> usize {
        EchelonBasis::from_matrix(self).dim()
    }

    /// Left null space `{x : x·self = 0}` in reduced echelon form.
    pub fn null_space(&self) -> EchelonBasis {
        let n = self.rows;
        let m = self.cols;
        let f = &*self.field;
        // Rows of [self | I]; eliminate on the first m columns.
        let mut aug: Vec<Vec<u8>> = (0..n)
            .map(|r| {
                let mut row = self.row(r).to_vec();
                row.resize(m + n, 0);
                row[m + r] = 1;
                row
            })
            .collect();
        let mut done = 0;
        for col in 0..m {
            let Some(p) = (done..n).find(|&r| aug[r][col] != 0) else {
                continue;
            };
            aug.swap(done, p);
            let s = match f.inv(aug[done][col]) {
                Ok(s) => s,
                Err(_) => continue,
            };
            for x in aug[done].iter_mut() {
                *x = f.mul(*x, s);
            }
            let pivot_row = aug[done].clone();
            for (r, row) in aug.iter_mut().enumerate() {
                let c = row[col];
                if r != done && c != 0 {
                    let neg = f.neg(c);
                    for (x, &y) in row.iter_mut().zip(&pivot_row) {
                        if y != 0 {
                            *x = f.add(*x, f.mul(neg, y));
                        }
                    }
                }
            }
            done += 1;
        }
        let mut basis = EchelonBasis::new(self.field.clone(), n);
        for row in &aug[done..] {
            basis.insert(row[m..].to_vec());
        }
        basis
    }

    /// Nullity, the dimension of the left null space.
    pub fn nullity(&self) -> usize {
        self.rows - self.rank()
    }
}

/// Row vector times matrix: `v · m`.
pub fn vec_mul(field: &Field, v: &[u8], m: &Matrix) -> Vec<u8> {
    let mut out = vec![0u8; m.cols];
    for (i, &a) in v.iter().enumerate() {
        if a != 0 {
            for (x, &y) in out.iter_mut().zip(m.row(i)) {
                if y != 0 {
                    *x = field.add(*x, field.mul(a, y));
                }
            }
        }
    }
    out
}

/// `y += a · x` for row vectors.
pub fn axpy(field: &Field, y: &mut [u8], a: u8, x: &[u8]) {
    if a == 0 {
        return;
    }
    for (u, &v) in y.iter_mut().zip(x) {
        if v != 0 {
            *u = field.add(*u, field.mul(a, v));
        }
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix<{:?}> {}x{}", self.field, self.rows, self.cols)?;
        for r in 0..self.rows {
            writeln!(f, "  {:?}", self.row(r))?;
        }
        Ok(())
    }
}
