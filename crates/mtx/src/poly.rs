//! Dense polynomials over GF(q).
//!
//! Coefficients are stored low→high with no trailing zeros; the zero
//! polynomial has no coefficients.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use mtx::{Field, Poly};
//!
//! let f = Arc::new(Field::new(2).unwrap());
//! let a = Poly::new(f.clone(), vec![1, 1]); // x + 1
//! let sq = a.mul(&a).unwrap();
//! assert_eq!(sq.to_string(), "x^2+1");
//! ```

use core::cmp::Ordering;
use core::fmt;
use std::sync::Arc;

use crate::error::{MtxError, Result};
use crate::field::Field;
use crate::matrix::Matrix;

/// A polynomial over a shared field.
#[derive(Clone, PartialEq, Eq)]
pub struct Poly {
    field: Arc<Field>,
    coeffs: Vec<u8>,
}

impl Poly {
    /// Build from coefficients, low→high.
    pub fn new(field: Arc<Field>, mut coeffs: Vec<u8>) -> Self {
        while coeffs.last() == Some(&0) {
            coeffs.pop();
        }
        Self { field, coeffs }
    }

    /// The zero polynomial.
    pub fn zero(field: Arc<Field>) -> Self {
        Self {
            field,
            coeffs: Vec::new(),
        }
    }

    /// The constant `c`.
    pub fn constant(field: Arc<Field>, c: u8) -> Self {
        Self::new(field, vec![c])
    }

    /// The constant 1.
    pub fn one(field: Arc<Field>) -> Self {
        Self::constant(field, 1)
    }

    /// The monomial `x`.
    pub fn x(field: Arc<Field>) -> Self {
        Self::new(field, vec![0, 1])
    }

    /// The field.
    pub fn field(&self) -> &Arc<Field> {
        &self.field
    }

    /// Coefficients, low→high.
    pub fn coeffs(&self) -> &[u8] {
        &self.coeffs
    }

    /// Degree, `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Degree, with the zero polynomial mapped to 0.
    pub fn deg(&self) -> usize {
        self.degree().unwrap_or(0)
    }

    /// True for the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// True for the constant 1.
    pub fn is_one(&self) -> bool {
        self.coeffs == [1]
    }

    /// Leading coefficient (0 for the zero polynomial).
    pub fn lead(&self) -> u8 {
        self.coeffs.last().copied().unwrap_or(0)
    }

    /// Sum.
    pub fn add(&self, other: &Self) -> Self {
        let f = &*self.field;
        let n = self.coeffs.len().max(other.coeffs.len());
        let c = (0..n)
            .map(|i| {
                let a = self.coeffs.get(i).copied().unwrap_or(0);
                let b = other.coeffs.get(i).copied().unwrap_or(0);
                f.add(a, b)
            })
            .collect();
        Self::new(self.field.clone(), c)
    }

    /// Difference.
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.scale(self.field.neg(1)))
    }

    /// Scalar multiple.
    pub fn scale(&self, a: u8) -> Self {
        let f = &*self.field;
        Self::new(
            self.field.clone(),
            self.coeffs.iter().map(|&c| f.mul(a, c)).collect(),
        )
    }

    /// Product.
    ///
    /// # Errors
    ///
    /// Returns an error if the operands live over different fields.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        self.same_field(other)?;
        if self.is_zero() || other.is_zero() {
            return Ok(Self::zero(self.field.clone()));
        }
        let f = &*self.field;
        let mut c = vec![0u8; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            if a == 0 {
                continue;
            }
            for (j, &b) in other.coeffs.iter().enumerate() {
                c[i + j] = f.add(c[i + j], f.mul(a, b));
            }
        }
        Ok(Self::new(self.field.clone(), c))
    }

    /// Division with remainder: `self = q·d + r`, `deg r < deg d`.
    ///
    /// # Errors
    ///
    /// Returns [`MtxError::ZeroPolynomial`] if `d` is zero.
    pub fn divrem(&self, d: &Self) -> Result<(Self, Self)> {
        self.same_field(d)?;
        let dd = d.degree().ok_or(MtxError::ZeroPolynomial("divrem"))?;
        let f = &*self.field;
        let inv_lead = f.inv(d.lead())?;
        let mut r = self.coeffs.clone();
        if r.len() <= dd {
            return Ok((Self::zero(self.field.clone()), self.clone()));
        }
        let mut q = vec![0u8; r.len() - dd];
        for k in (0..q.len()).rev() {
            let c = f.mul(r[k + dd], inv_lead);
            q[k] = c;
            if c != 0 {
                for (i, &b) in d.coeffs.iter().enumerate() {
                    r[k + i] = f.sub(r[k + i], f.mul(c, b));
                }
            }
        }
        r.truncate(dd);
        Ok((Self::new(self.field.clone(), q), Self::new(self.field.clone(), r)))
    }

    /// Remainder modulo `d`.
    ///
    /// # Errors
    ///
    /// Returns [`MtxError::ZeroPolynomial`] if `d` is zero.
    pub fn rem(&self, d: &Self) -> Result<Self> {
        Ok(self.divrem(d)?.1)
    }

    /// Exact quotient by a divisor; the remainder is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`MtxError::ZeroPolynomial`] if `d` is zero.
    pub fn div(&self, d: &Self) -> Result<Self> {
        Ok(self.divrem(d)?.0)
    }

    /// True if `d` divides `self`.
    ///
    /// # Errors
    ///
    /// Returns [`MtxError::ZeroPolynomial`] if `d` is zero.
    pub fn is_divisible_by(&self, d: &Self) -> Result<bool> {
        Ok(self.rem(d)?.is_zero())
    }

    /// Monic associate.
    ///
    /// # Errors
    ///
    /// Returns [`MtxError::ZeroPolynomial`] for the zero polynomial.
    pub fn monic(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(MtxError::ZeroPolynomial("monic"));
        }
        Ok(self.scale(self.field.inv(self.lead())?))
    }

    /// Monic greatest common divisor.
    ///
    /// # Errors
    ///
    /// Returns an error if both operands are zero.
    pub fn gcd(&self, other: &Self) -> Result<Self> {
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            let r = a.rem(&b)?;
            a = b;
            b = r;
        }
        a.monic()
    }

    /// Extended Euclid: `(g, s, t)` with `s·self + t·other = g` and `g` the
    /// monic gcd.
    ///
    /// # Errors
    ///
    /// Returns an error if both operands are zero.
    pub fn ext_gcd(&self, other: &Self) -> Result<(Self, Self, Self)> {
        let zero = Self::zero(self.field.clone());
        let one = Self::one(self.field.clone());
        let (mut r0, mut r1) = (self.clone(), other.clone());
        let (mut s0, mut s1) = (one.clone(), zero.clone());
        let (mut t0, mut t1) = (zero, one);
        while !r1.is_zero() {
            let (q, r) = r0.divrem(&r1)?;
            let s = s0.sub(&q.mul(&s1)?);
            let t = t0.sub(&q.mul(&t1)?);
            (r0, r1) = (r1, r);
            (s0, s1) = (s1, s);
            (t0, t1) = (t1, t);
        }
        if r0.is_zero() {
            return Err(MtxError::ZeroPolynomial("ext_gcd"));
        }
        let inv = self.field.inv(r0.lead())?;
        Ok((r0.scale(inv), s0.scale(inv), t0.scale(inv)))
    }

    /// `self^e`.
    ///
    /// # Errors
    ///
    /// Propagates field mismatches (never raised for a single operand).
    pub fn pow(&self, e: usize) -> Result<Self> {
        let mut acc = Self::one(self.field.clone());
        for _ in 0..e {
            acc = acc.mul(self)?;
        }
        Ok(acc)
    }

    /// Formal derivative.
    pub fn derivative(&self) -> Self {
        let f = &*self.field;
        let c = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &a)| f.mul(f.from_int(i as i64), a))
            .collect();
        Self::new(self.field.clone(), c)
    }

    /// `self^e mod m`.
    ///
    /// # Errors
    ///
    /// Returns [`MtxError::ZeroPolynomial`] if `m` is zero.
    pub fn pow_mod(&self, mut e: u64, m: &Self) -> Result<Self> {
        let mut base = self.rem(m)?;
        let mut acc = Self::one(self.field.clone()).rem(m)?;
        while e > 0 {
            if e & 1 == 1 {
                acc = acc.mul(&base)?.rem(m)?;
            }
            base = base.mul(&base)?.rem(m)?;
            e >>= 1;
        }
        Ok(acc)
    }

    /// p-th root of a polynomial in `x^p` (p = characteristic).
    ///
    /// Coefficients at positions not divisible by p are ignored; callers use
    /// this only when the derivative vanishes.
    pub fn pth_root(&self) -> Self {
        let f = &*self.field;
        let p = f.characteristic() as usize;
        // a^(1/p) = a^(q/p) in GF(q).
        let e = f.order() / f.characteristic();
        let root = |a: u8| {
            let mut r = 1u8;
            for _ in 0..e {
                r = f.mul(r, a);
            }
            if a == 0 {
                0
            } else {
                r
            }
        };
        let c = self.coeffs.iter().step_by(p).map(|&a| root(a)).collect();
        Self::new(self.field.clone(), c)
    }

    /// Evaluate at a field element.
    pub fn eval(&self, a: u8) -> u8 {
        let f = &*self.field;
        self.coeffs
            .iter()
            .rev()
            .fold(0, |acc, &c| f.add(f.mul(acc, a), c))
    }

    /// Insert a square matrix: `p(M)` by Horner's rule.
    ///
    /// # Errors
    ///
    /// Returns an error if `m` is not square or lives over another field.
    pub fn eval_matrix(&self, m: &Matrix) -> Result<Matrix> {
        if !m.is_square() {
            return Err(MtxError::DimensionMismatch {
                op: "eval_matrix",
                left: m.shape(),
                right: m.shape(),
            });
        }
        if **m.field() != *self.field {
            return Err(MtxError::FieldMismatch {
                left: self.field.order(),
                right: m.field().order(),
            });
        }
        let n = m.rows();
        let mut acc = Matrix::zero(self.field.clone(), n, n);
        for &c in self.coeffs.iter().rev() {
            acc = acc.mul(m)?;
            acc.add_scalar_diagonal(c);
        }
        Ok(acc)
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
}

impl PartialOrd for Poly {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// By degree, then by coefficients from the top down.
impl Ord for Poly {
    fn cmp(&self, other: &Self) -> Ordering {
        self.coeffs
            .len()
            .cmp(&other.coeffs.len())
            .then_with(|| self.coeffs.iter().rev().cmp(other.coeffs.iter().rev()))
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut first = true;
        for (i, &c) in self.coeffs.iter().enumerate().rev() {
            if c == 0 {
                continue;
            }
            if !first {
                write!(f, "+")?;
            }
            first = false;
            match (i, c) {
                (0, _) => write!(f, "{c}")?,
                (1, 1) => write!(f, "x")?,
                (1, _) => write!(f, "{c}x")?,
                (_, 1) => write!(f, "x^{i}")?,
                (_, _) => write!(f, "{c}x^{i}")?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} over {:?}", self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gf(q: u32) -> Arc<Field> {
        Arc::new(Field::new(q).unwrap())
    }

    #[test]
    fn divrem_reconstructs() {
        let f = gf(5);
        let a = Poly::new(f.clone(), vec![3, 0, 2, 4, 1]);
        let d = Poly::new(f.clone(), vec![1, 2]);
        let (q, r) = a.divrem(&d).unwrap();
        assert!(r.degree().map_or(true, |x| x < 1));
        assert_eq!(q.mul(&d).unwrap().add(&r), a);
    }

    #[test]
    fn gcd_is_monic() {
        let f = gf(7);
        let a = Poly::new(f.clone(), vec![6, 1]); // x - 1
        let b = Poly::new(f.clone(), vec![5, 1]); // x - 2
        let ab = a.mul(&b).unwrap().scale(3);
        let g = ab.gcd(&a.scale(4)).unwrap();
        assert_eq!(g, a);
    }

    #[test]
    fn ext_gcd_bezout() {
        let f = gf(5);
        let a = Poly::new(f.clone(), vec![1, 0, 1]).pow(2).unwrap(); // (x^2+1)^2
        let b = Poly::new(f.clone(), vec![1, 1]); // x + 1
        let (g, s, t) = a.ext_gcd(&b).unwrap();
        assert!(g.is_one());
        let lhs = s.mul(&a).unwrap().add(&t.mul(&b).unwrap());
        assert_eq!(lhs, g);
    }

    #[test]
    fn derivative_in_characteristic_two() {
        let f = gf(2);
        // (x^3 + x^2 + 1)' = x^2
        let a = Poly::new(f.clone(), vec![1, 0, 1, 1]);
        assert_eq!(a.derivative(), Poly::new(f, vec![0, 0, 1]));
    }

    #[test]
    fn pth_root_inverts_frobenius() {
        let f = gf(4);
        let a = Poly::new(f.clone(), vec![2, 3, 1]);
        let mut sq = a.mul(&a).unwrap();
        assert!(sq.derivative().is_zero());
        sq = sq.pth_root();
        assert_eq!(sq, a);
    }

    #[test]
    fn pow_mod_matches_repeated_product() {
        let f = gf(3);
        let m = Poly::new(f.clone(), vec![1, 0, 1]); // x^2 + 1
        let x = Poly::x(f.clone());
        let mut acc = Poly::one(f.clone());
        for _ in 0..7 {
            acc = acc.mul(&x).unwrap().rem(&m).unwrap();
        }
        assert_eq!(x.pow_mod(7, &m).unwrap(), acc);
    }

    #[test]
    fn eval_matrix_cayley_hamilton() {
        let f = gf(5);
        let m = Matrix::from_rows(f.clone(), &[vec![1, 2], vec![3, 4]]).unwrap();
        // charpoly x^2 - 5x - 2 = x^2 + 3 mod 5
        let c = Poly::new(f.clone(), vec![3, 0, 1]);
        assert!(c.eval_matrix(&m).unwrap().is_zero());
    }

    #[test]
    fn display_format() {
        let f = gf(3);
        assert_eq!(Poly::new(f.clone(), vec![2, 1, 0, 1]).to_string(), "x^3+x+2");
        assert_eq!(Poly::new(f.clone(), vec![0, 2]).to_string(), "2x");
        assert_eq!(Poly::zero(f).to_string(), "0");
    }

    #[test]
    fn ordering_by_degree_first() {
        let f = gf(2);
        let a = Poly::new(f.clone(), vec![1, 1]);
        let b = Poly::new(f.clone(), vec![0, 0, 1]);
        let c = Poly::new(f, vec![0, 1]);
        assert!(a < b);
        assert!(c < a);
    }
}
