//! Per-word state of one trial: the word's matrix and its lazily computed
//! characteristic polynomial.

use mtx::{factor, CharPolyFactorizer, FactorSet, Matrix, Poly};

use crate::error::Result;

/// A word under trial at one node. Dropped when the next word is tried.
#[derive(Debug)]
pub(crate) struct WordTrial {
    pub number: u64,
    pub matrix: Matrix,
    cp: CharPolyFactorizer,
    first_poly: Poly,
    first: FactorSet,
    rest: Option<(Poly, FactorSet)>,
    dual: Option<CharPolyFactorizer>,
}

impl WordTrial {
    /// Start a trial; computes and factors the first cyclic piece only.
    pub fn new(number: u64, matrix: Matrix) -> Result<Self> {
        let mut cp = CharPolyFactorizer::new(&matrix)?;
        let first_poly = cp.first()?;
        let first = factor(&first_poly)?;
        Ok(Self {
            number,
            matrix,
            cp,
            first_poly,
            first,
            rest: None,
            dual: None,
        })
    }

    /// Factors of the first cyclic piece.
    pub fn first_factors(&self) -> &FactorSet {
        &self.first
    }

    /// Polynomial of the first cyclic piece.
    pub fn first_poly(&self) -> &Poly {
        &self.first_poly
    }

    /// A nonzero vector killed by `p(word)`, from the first cyclic piece.
    pub fn kernel_seed(&mut self, p: &Poly) -> Result<Option<Vec<u8>>> {
        Ok(self.cp.kernel_seed(p)?)
    }

    /// Same for the transposed word.
    pub fn dual_kernel_seed(&mut self, p: &Poly) -> Result<Option<Vec<u8>>> {
        if self.dual.is_none() {
            self.dual = Some(CharPolyFactorizer::new(&self.matrix.transpose())?);
        }
        match self.dual.as_mut() {
            Some(cp) => Ok(cp.kernel_seed(p)?),
            None => Ok(None),
        }
    }

    fn rest(&mut self) -> Result<&(Poly, FactorSet)> {
        let rest = match self.rest.take() {
            Some(rest) => rest,
            None => {
                let poly = self.cp.remaining()?;
                let fs = factor(&poly)?;
                (poly, fs)
            }
        };
        Ok(self.rest.insert(rest))
    }

    /// Multiplicity of `p` in the full characteristic polynomial.
    pub fn total_multiplicity(&mut self, p: &Poly) -> Result<usize> {
        let in_first = self.first.multiplicity(p);
        Ok(in_first + self.rest()?.1.multiplicity(p))
    }

    /// The full characteristic polynomial and its factorisation.
    pub fn char_poly(&mut self) -> Result<(Poly, FactorSet)> {
        let first_poly = self.first_poly.clone();
        let mut all = self.first.clone();
        let (rest_poly, rest) = self.rest()?;
        all.merge(rest);
        Ok((first_poly.mul(rest_poly)?, all))
    }
}
