//! Factorisation of polynomials over GF(q) into monic irreducibles.
//!
//! Square-free decomposition first, then Berlekamp's algorithm on each
//! square-free part. Berlekamp splits by `gcd(h, g - s)` for every element
//! `s` of the field and every basis vector `g` of the Berlekamp subalgebra,
//! so the result is deterministic.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use mtx::{factor, Field, Poly};
//!
//! let f = Arc::new(Field::new(2).unwrap());
//! // x^3 + 1 = (x + 1)(x^2 + x + 1)
//! let p = Poly::new(f.clone(), vec![1, 0, 0, 1]);
//! let fs = factor(&p).unwrap();
//! assert_eq!(fs.len(), 2);
//! assert_eq!(fs.factors()[0].0.to_string(), "x+1");
//! assert_eq!(fs.factors()[1].0.to_string(), "x^2+x+1");
//! ```

use std::sync::Arc;

use crate::echelon::EchelonBasis;
use crate::error::{MtxError, Result};
use crate::field::Field;
use crate::poly::Poly;

/// Monic irreducible factors with multiplicities, sorted ascending.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FactorSet {
    factors: Vec<(Poly, usize)>,
}

impl FactorSet {
    /// The empty factorisation (of a nonzero constant).
    pub fn new() -> Self {
        Self::default()
    }

    /// `(factor, multiplicity)` pairs, ascending by degree then coefficients.
    pub fn factors(&self) -> &[(Poly, usize)] {
        &self.factors
    }

    /// Number of distinct factors.
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// True if there are no factors.
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Multiplicity of `p` (0 if absent).
    pub fn multiplicity(&self, p: &Poly) -> usize {
        self.factors
            .iter()
            .find(|(f, _)| f == p)
            .map_or(0, |&(_, m)| m)
    }

    /// Total degree, Σ multiplicity · degree.
    pub fn degree(&self) -> usize {
        self.factors.iter().map(|(f, m)| f.deg() * m).sum()
    }

    /// Add `mult` copies of `p`.
    pub fn add(&mut self, p: Poly, mult: usize) {
        if let Some(entry) = self.factors.iter_mut().find(|(f, _)| *f == p) {
            entry.1 += mult;
        } else {
            let at = self.factors.partition_point(|(f, _)| *f < p);
            self.factors.insert(at, (p, mult));
        }
    }

    /// Merge another factorisation into this one.
    pub fn merge(&mut self, other: &FactorSet) {
        for (p, m) in &other.factors {
            self.add(p.clone(), *m);
        }
    }
}

/// Factor `f` into monic irreducibles. The leading coefficient is dropped.
///
/// # Errors
///
/// Returns [`MtxError::ZeroPolynomial`] for the zero polynomial.
pub fn factor(f: &Poly) -> Result<FactorSet> {
    let f = f.monic()?;
    let mut out = FactorSet::new();
    for (part, mult) in square_free(&f)? {
        for irr in berlekamp(&part)? {
            out.add(irr, mult);
        }
    }
    Ok(out)
}

/// True if `f` is irreducible (nonconstant, no proper factor).
///
/// # Errors
///
/// Returns [`MtxError::ZeroPolynomial`] for the zero polynomial.
pub fn is_irreducible(f: &Poly) -> Result<bool> {
    if f.deg() == 0 {
        return Ok(false);
    }
    let fs = factor(f)?;
    Ok(fs.len() == 1 && fs.factors()[0].1 == 1)
}

/// Square-free decomposition of a monic polynomial: `f = Π a_i^i`.
fn square_free(f: &Poly) -> Result<Vec<(Poly, usize)>> {
    let mut out = Vec::new();
    if f.deg() == 0 {
        return Ok(out);
    }
    let p = f.field().characteristic() as usize;
    let mut c = f.gcd(&f.derivative())?;
    let mut w = f.div(&c)?;
    let mut i = 1;
    while !w.is_one() {
        let y = w.gcd(&c)?;
        let fac = w.div(&y)?;
        if !fac.is_one() {
            out.push((fac, i));
        }
        w = y;
        c = c.div(&w)?;
        i += 1;
    }
    if !c.is_one() {
        let root = c.pth_root().monic()?;
        for (g, m) in square_free(&root)? {
            out.push((g, m * p));
        }
    }
    Ok(out)
}

/// Irreducible factors of a monic square-free polynomial.
fn berlekamp(f: &Poly) -> Result<Vec<Poly>> {
    let n = f.deg();
    if n <= 1 {
        return Ok(vec![f.clone()]);
    }
    let field: Arc<Field> = f.field().clone();
    let q = u64::from(field.order());

    // Row i of Q is x^(i·q) mod f; the Berlekamp subalgebra is the left
    // null space of Q - I.
    let xq = Poly::x(field.clone()).pow_mod(q, f)?;
    let mut q_minus_i = crate::matrix::Matrix::zero(field.clone(), n, n);
    let mut power = Poly::one(field.clone());
    for i in 0..n {
        for (j, &c) in power.coeffs().iter().enumerate() {
            q_minus_i.set(i, j, c);
        }
        let d = q_minus_i.get(i, i);
        q_minus_i.set(i, i, field.sub(d, 1));
        power = power.mul(&xq)?.rem(f)?;
    }
    let kernel: EchelonBasis = q_minus_i.null_space();
    let k = kernel.dim();
    if k == 1 {
        return Ok(vec![f.clone()]);
    }

    let mut factors = vec![f.clone()];
    for v in kernel.rows() {
        let g = Poly::new(field.clone(), v.clone());
        if g.deg() == 0 {
            continue;
        }
        let mut next = Vec::with_capacity(factors.len() + 1);
        for h in factors {
            let mut h = h;
            if h.deg() > 1 {
                for s in field.elements() {
                    if next.len() + 1 >= k {
                        break;
                    }
                    let shifted = g.sub(&Poly::constant(field.clone(), s));
                    let d = h.gcd(&shifted)?;
                    if !d.is_one() && d.deg() < h.deg() {
                        h = h.div(&d)?;
                        next.push(d);
                    }
                }
            }
            next.push(h);
        }
        factors = next;
        if factors.len() >= k {
            break;
        }
    }
    if factors.len() != k {
        return Err(MtxError::ZeroPolynomial("berlekamp split incomplete"));
    }
    factors.sort();
    Ok(factors)
}
