//! Finite field arithmetic GF(q), q = p^k ≤ 256.
//!
//! Elements are `u8` values in `0..q`. The base-p digits of a value are the
//! coefficients of a polynomial in the field generator `x`:
//!
//! ```text
//! GF(9), p = 3:  5 = 1·3 + 2  →  x + 2
//!                7 = 2·3 + 1  →  2x + 1
//! ```
//!
//! Products are reduced modulo the first monic irreducible polynomial of
//! degree k over GF(p), in lexicographic order of its lower coefficients.
//! For prime fields (k = 1) the encoding is the residue itself.
//!
//! All four operations are table lookups; a field is built once and shared
//! through an `Arc` by every matrix over it.
//!
//! # Example
//!
//! ```
//! use mtx::Field;
//!
//! let f = Field::new(4).unwrap();
//! // x · x = x + 1 in GF(4) = GF(2)[x]/(x² + x + 1)
//! assert_eq!(f.mul(2, 2), 3);
//! assert_eq!(f.add(3, 3), 0);
//! assert_eq!(f.mul(3, f.inv(3).unwrap()), 1);
//! ```

use core::fmt;

use crate::error::{MtxError, Result};

/// Largest supported field order.
pub const MAX_Q: u32 = 256;

/// A finite field GF(q) with lookup tables for all operations.
#[derive(Clone)]
pub struct Field {
    q: u32,
    p: u32,
    degree: u32,
    /// Defining polynomial over GF(p), coefficients low→high, monic.
    modulus: Vec<u32>,
    add: Vec<u8>,
    mul: Vec<u8>,
    neg: Vec<u8>,
    inv: Vec<u8>,
}

impl Field {
    /// Build GF(q).
    ///
    /// # Errors
    ///
    /// Returns [`MtxError::UnsupportedField`] if `q` is not a prime power
    /// or exceeds [`MAX_Q`].
    pub fn new(q: u32) -> Result<Self> {
        let (p, degree) = prime_power(q).ok_or(MtxError::UnsupportedField(q))?;
        let modulus = if degree == 1 {
            vec![0, 1]
        } else {
            first_irreducible(p, degree)
        };

        let n = q as usize;
        let digits: Vec<Vec<u32>> = (0..q).map(|v| to_digits(v, p, degree)).collect();

        let mut add = vec![0u8; n * n];
        let mut mul = vec![0u8; n * n];
        for a in 0..n {
            for b in a..n {
                let s: Vec<u32> = digits[a]
                    .iter()
                    .zip(&digits[b])
                    .map(|(x, y)| (x + y) % p)
                    .collect();
                let s = from_digits(&s, p) as u8;
                add[a * n + b] = s;
                add[b * n + a] = s;

                let m = if degree == 1 {
                    ((a as u32 * b as u32) % p) as u8
                } else {
                    from_digits(&mul_mod(&digits[a], &digits[b], &modulus, p), p) as u8
                };
                mul[a * n + b] = m;
                mul[b * n + a] = m;
            }
        }

        let mut neg = vec![0u8; n];
        let mut inv = vec![0u8; n];
        for a in 0..n {
            for b in 0..n {
                if add[a * n + b] == 0 {
                    neg[a] = b as u8;
                }
                if mul[a * n + b] == 1 {
                    inv[a] = b as u8;
                }
            }
        }

        Ok(Self {
            q,
            p,
            degree,
            modulus,
            add,
            mul,
            neg,
            inv,
        })
    }

    /// Field order q.
    #[inline]
    pub fn order(&self) -> u32 {
        self.q
    }

    /// Characteristic p.
    #[inline]
    pub fn characteristic(&self) -> u32 {
        self.p
    }

    /// Degree k of GF(q) over its prime field.
    #[inline]
    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// Defining polynomial over the prime field, coefficients low→high.
    pub fn modulus(&self) -> &[u32] {
        &self.modulus
    }

    /// Sum `a + b`.
    #[inline]
    pub fn add(&self, a: u8, b: u8) -> u8 {
        self.add[a as usize * self.q as usize + b as usize]
    }

    /// Difference `a - b`.
    #[inline]
    pub fn sub(&self, a: u8, b: u8) -> u8 {
        self.add(a, self.neg(b))
    }

    /// Additive inverse.
    #[inline]
    pub fn neg(&self, a: u8) -> u8 {
        self.neg[a as usize]
    }

    /// Product `a · b`.
    #[inline]
    pub fn mul(&self, a: u8, b: u8) -> u8 {
        self.mul[a as usize * self.q as usize + b as usize]
    }

    /// Multiplicative inverse.
    ///
    /// # Errors
    ///
    /// Returns [`MtxError::NotInvertible`] for zero.
    #[inline]
    pub fn inv(&self, a: u8) -> Result<u8> {
        if a == 0 {
            return Err(MtxError::NotInvertible("field element 0"));
        }
        Ok(self.inv[a as usize])
    }

    /// Quotient `a / b`.
    ///
    /// # Errors
    ///
    /// Returns [`MtxError::NotInvertible`] if `b` is zero.
    #[inline]
    pub fn div(&self, a: u8, b: u8) -> Result<u8> {
        Ok(self.mul(a, self.inv(b)?))
    }

    /// Image of the integer `n` under ℤ → GF(q).
    #[inline]
    pub fn from_int(&self, n: i64) -> u8 {
        n.rem_euclid(self.p as i64) as u8
    }

    /// Check that `value` is a valid element.
    ///
    /// # Errors
    ///
    /// Returns [`MtxError::ElementOutOfRange`] otherwise.
    pub fn check(&self, value: u32) -> Result<u8> {
        if value < self.q {
            Ok(value as u8)
        } else {
            Err(MtxError::ElementOutOfRange { value, q: self.q })
        }
    }

    /// All field elements in encoding order.
    pub fn elements(&self) -> impl Iterator<Item = u8> {
        (0..self.q).map(|v| v as u8)
    }

    /// Nonzero field elements in encoding order.
    pub fn units(&self) -> impl Iterator<Item = u8> {
        (1..self.q).map(|v| v as u8)
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.q == other.q
    }
}

impl Eq for Field {}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GF({})", self.q)
    }
}

/// Split `q` as `p^k`, or `None` if it is not a prime power ≤ [`MAX_Q`].
fn prime_power(q: u32) -> Option<(u32, u32)> {
    if !(2..=MAX_Q).contains(&q) {
        return None;
    }
    let p = (2..=q).find(|d| q % d == 0)?;
    let mut rest = q;
    let mut k = 0;
    while rest % p == 0 {
        rest /= p;
        k += 1;
    }
    (rest == 1).then_some((p, k))
}

fn to_digits(mut v: u32, p: u32, len: u32) -> Vec<u32> {
    let mut d = Vec::with_capacity(len as usize);
    for _ in 0..len {
        d.push(v % p);
        v /= p;
    }
    d
}

fn from_digits(d: &[u32], p: u32) -> u32 {
    d.iter().rev().fold(0, |acc, &c| acc * p + c)
}

/// Remainder of `a` modulo the monic `m` over GF(p), in place.
fn reduce(a: &mut Vec<u32>, m: &[u32], p: u32) {
    let dm = m.len() - 1;
    while a.len() > dm {
        let Some(lead) = a.pop() else { break };
        if lead == 0 {
            continue;
        }
        let off = a.len() - dm;
        for (i, &c) in m[..dm].iter().enumerate() {
            a[off + i] = (a[off + i] + p - (lead * c) % p) % p;
        }
    }
}

fn mul_mod(a: &[u32], b: &[u32], m: &[u32], p: u32) -> Vec<u32> {
    let mut r = vec![0u32; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            r[i + j] = (r[i + j] + x * y) % p;
        }
    }
    reduce(&mut r, m, p);
    r.resize(m.len() - 1, 0);
    r
}

/// First monic irreducible of degree `k` over GF(p) by trial division.
fn first_irreducible(p: u32, k: u32) -> Vec<u32> {
    let count = p.pow(k);
    for low in 0..count {
        let mut f = to_digits(low, p, k);
        f.push(1);
        if f[0] == 0 {
            continue;
        }
        let has_factor = (1..=k / 2).any(|d| {
            (0..p.pow(d)).any(|lowg| {
                let mut g = to_digits(lowg, p, d);
                g.push(1);
                let mut r = f.clone();
                reduce(&mut r, &g, p);
                r.iter().all(|&c| c == 0)
            })
        });
        if !has_factor {
            return f;
        }
    }
    // Irreducibles exist in every degree; the loop always returns.
    vec![0, 1]
}
