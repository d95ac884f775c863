//! Canonical enumeration of algebra elements ("words").
//!
//! Monomials are the non-empty products of generators, listed in shortlex
//! order of their index sequences: for generators `a, b` the list starts
//! `a, b, aa, ab, ba, bb, aaa, …`. Word `n ≥ 1` is the sum of the monomials
//! whose positions are the set bits of `n`, so word 1 is `a`, word 2 is `b`,
//! word 3 is `b+a` (names list the later monomial first), word 5 is `aa+a`.
//!
//! Monomials are built from their prefix and cached, so each one costs a
//! single matrix product.

use crate::error::{MtxError, Result};
use crate::matrix::Matrix;
use crate::spinup::check_generators;

/// Number of words whose nullities make up a fingerprint.
pub const MAXFP: usize = 6;

/// Word generator bound to one generator list.
#[derive(Clone, Debug)]
pub struct WordGenerator {
    gens: Vec<Matrix>,
    monomials: Vec<Matrix>,
}

impl WordGenerator {
    /// Bind a generator list.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or not a set of equal square
    /// matrices over one field.
    pub fn new(gens: Vec<Matrix>) -> Result<Self> {
        check_generators(&gens)?;
        Ok(Self {
            gens,
            monomials: Vec::new(),
        })
    }

    /// The generators.
    pub fn gens(&self) -> &[Matrix] {
        &self.gens
    }

    /// Consume the generator and return the generators.
    pub fn into_gens(self) -> Vec<Matrix> {
        self.gens
    }

    /// Degree of the representation.
    pub fn dim(&self) -> usize {
        self.gens[0].rows()
    }

    /// The matrix of word `n`.
    ///
    /// # Errors
    ///
    /// Returns an error for `n == 0`.
    pub fn make_word(&mut self, n: u64) -> Result<Matrix> {
        if n == 0 {
            return Err(MtxError::InvalidGenerators("word number 0".into()));
        }
        let top = 64 - n.leading_zeros() as usize;
        self.fill_monomials(top)?;
        let g = &self.gens[0];
        let mut acc = Matrix::zero(g.field().clone(), g.rows(), g.cols());
        for bit in 0..top {
            if (n >> bit) & 1 == 1 {
                acc = acc.add(&self.monomials[bit])?;
            }
        }
        Ok(acc)
    }

    /// Printable name of word `n`, monomials in descending position.
    pub fn symbolic_name(&self, n: u64) -> String {
        let k = self.gens.len();
        let mut parts = Vec::new();
        for bit in (0..64).rev() {
            if (n >> bit) & 1 == 1 {
                let name: String = monomial_sequence(bit, k)
                    .into_iter()
                    .map(generator_letter)
                    .collect();
                parts.push(name);
            }
        }
        if parts.is_empty() {
            "0".to_string()
        } else {
            parts.join("+")
        }
    }

    fn fill_monomials(&mut self, upto: usize) -> Result<()> {
        let k = self.gens.len();
        while self.monomials.len() < upto {
            let i = self.monomials.len();
            let m = if i < k {
                self.gens[i].clone()
            } else {
                // Monomial i is (monomial of its prefix) · (last generator).
                let (prefix, last) = split_last(i, k);
                self.monomials[prefix].mul(&self.gens[last])?
            };
            self.monomials.push(m);
        }
        Ok(())
    }
}

/// Letter naming generator `i`: `a`, `b`, …, `z`, then `g27`, ….
fn generator_letter(i: usize) -> String {
    if i < 26 {
        char::from(b'a' + i as u8).to_string()
    } else {
        format!("g{}", i + 1)
    }
}

/// Length of the monomial at `position`, with the offset and size of the
/// block of monomials of that length.
fn locate(position: usize, k: usize) -> (usize, usize, usize) {
    let mut offset = 0usize;
    let mut count = k;
    let mut len = 1;
    while position >= offset + count {
        offset += count;
        count = count.saturating_mul(k);
        len += 1;
    }
    (len, offset, count)
}

/// Position of the prefix and index of the last generator of monomial
/// `position` (which must have length at least 2).
fn split_last(position: usize, k: usize) -> (usize, usize) {
    let (_, offset, count) = locate(position, k);
    let rank = position - offset;
    let prefix_offset = offset - count / k;
    (prefix_offset + rank / k, rank % k)
}

/// Generator index sequence of monomial `position`.
fn monomial_sequence(position: usize, k: usize) -> Vec<usize> {
    let (len, offset, _) = locate(position, k);
    let mut rank = position - offset;
    let mut seq = vec![0; len];
    for slot in seq.iter_mut().rev() {
        *slot = rank % k;
        rank /= k;
    }
    seq
}

/// Nullities of words `1..=MAXFP`, an isomorphism invariant.
///
/// # Errors
///
/// Propagates matrix errors.
pub fn fingerprint(words: &mut WordGenerator) -> Result<[usize; MAXFP]> {
    let mut fp = [0; MAXFP];
    for (i, slot) in fp.iter_mut().enumerate() {
        *slot = words.make_word(i as u64 + 1)?.nullity();
    }
    Ok(fp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use std::sync::Arc;

    fn two_gens() -> WordGenerator {
        let f = Arc::new(Field::new(3).unwrap());
        let a = Matrix::from_rows(f.clone(), &[vec![0, 1], vec![1, 0]]).unwrap();
        let b = Matrix::from_rows(f, &[vec![1, 1], vec![0, 1]]).unwrap();
        WordGenerator::new(vec![a, b]).unwrap()
    }

    #[test]
    fn monomials_in_shortlex_order() {
        let names: Vec<String> = (0..8)
            .map(|p| {
                monomial_sequence(p, 2)
                    .into_iter()
                    .map(generator_letter)
                    .collect()
            })
            .collect();
        assert_eq!(names, ["a", "b", "aa", "ab", "ba", "bb", "aaa", "aab"]);
        assert_eq!(split_last(5, 2), (1, 1));
        assert_eq!(split_last(7, 2), (2, 1));
    }

    #[test]
    fn single_generator_powers() {
        assert_eq!(monomial_sequence(3, 1), vec![0, 0, 0, 0]);
        assert_eq!(split_last(3, 1), (2, 0));
    }

    #[test]
    fn symbolic_names() {
        let w = two_gens();
        assert_eq!(w.symbolic_name(1), "a");
        assert_eq!(w.symbolic_name(3), "b+a");
        assert_eq!(w.symbolic_name(9), "ab+a");
    }

    #[test]
    fn words_are_sums_of_monomials() {
        let mut w = two_gens();
        let a = w.gens()[0].clone();
        let b = w.gens()[1].clone();
        assert_eq!(w.make_word(3).unwrap(), a.add(&b).unwrap());
        let ab = a.mul(&b).unwrap();
        assert_eq!(w.make_word(9).unwrap(), ab.add(&a).unwrap());
        assert!(w.make_word(0).is_err());
    }

    #[test]
    fn fingerprint_is_basis_independent() {
        let mut w = two_gens();
        let fp = fingerprint(&mut w).unwrap();
        let f = w.gens()[0].field().clone();
        let t = Matrix::from_rows(f, &[vec![1, 2], vec![0, 1]]).unwrap();
        let conj = crate::spinup::conjugate(w.gens(), &t).unwrap();
        let mut w2 = WordGenerator::new(conj).unwrap();
        assert_eq!(fingerprint(&mut w2).unwrap(), fp);
    }
}
