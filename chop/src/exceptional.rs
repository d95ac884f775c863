//! The exceptional case.
//!
//! A module can fail Norton's test for every word while still being
//! reducible, typically when each candidate factor has a kernel larger
//! than the nullity bound. Here the word `W` is cut down to a generalised
//! eigenspace through the idempotent `e = (t·r)(W)`, where `c = pᵐ·r` is
//! its characteristic polynomial and `s·pᵐ + t·r = 1`. Random vectors are
//! then pushed through the commutator of `W·e` with `e·B·e` for a random
//! word `B`; the image lies in a proper submodule often enough to split
//! the cases the plain test cannot.

use mtx::{spin_up, vec_mul, Matrix, SpinMode};
use rand::Rng;
use tracing::debug;

use crate::engine::{is_proper, ChopEngine, SplitFound, SplitKind, Verdict};
use crate::error::Result;
use crate::node::Piece;
use crate::persist::ConstituentSink;
use crate::trial::WordTrial;

/// Random words are drawn from `1..=EXCEPTIONAL_WORDS`.
const EXCEPTIONAL_WORDS: u64 = 255;

impl<S: ConstituentSink> ChopEngine<S> {
    /// One attempt per non-linear factor of the word's characteristic
    /// polynomial.
    pub(crate) fn try_exceptional(
        &mut self,
        piece: &mut Piece,
        trial: &mut WordTrial,
    ) -> Result<Verdict> {
        let (c, factors) = trial.char_poly()?;
        let field = trial.matrix.field().clone();
        let n = piece.dim();
        for (p, m) in factors.factors() {
            if p.deg() < 2 || p.deg() > self.ctx.options.max_degree {
                continue;
            }
            let pm = p.pow(*m)?;
            let r = c.div(&pm)?;
            let (g, _, t) = pm.ext_gcd(&r)?;
            if !g.is_one() {
                continue;
            }
            let idem = t.mul(&r)?.rem(&c)?.eval_matrix(&trial.matrix)?;
            let other = self.ctx.rng.gen_range(1..=EXCEPTIONAL_WORDS);
            let b = piece.words.make_word(other)?;
            let x = idem.mul(&b)?.mul(&idem)?;
            let tw = trial.matrix.mul(&idem)?;
            let comm = tw.mul(&x)?.sub(&x.mul(&tw)?)?;

            let q = field.order();
            let u: Vec<u8> = (0..n).map(|_| self.ctx.rng.gen_range(0..q) as u8).collect();
            let v = vec_mul(&field, &u, &comm);
            if v.iter().all(|&a| a == 0) {
                continue;
            }
            let s = spin_up(&Matrix::row_vector(field.clone(), &v), piece.gens(), SpinMode::First)?;
            debug!(word = trial.number, other, poly = %p, spin = s.dim(), "exceptional attempt");
            if is_proper(&s) {
                return Ok(Verdict::Split(SplitFound {
                    subspace: s,
                    dual: false,
                    candidate: None,
                    kind: SplitKind::Exceptional,
                }));
            }
        }
        Ok(Verdict::Undecided)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::context::ChopContext;
    use crate::options::ChopOptions;
    use crate::persist::MemorySink;
    use mtx::Field;
    use std::sync::Arc;

    /// Two copies of the GF(2)-module generated by the companion of
    /// x^3+x+1 and E11, as block-diagonal generators.
    pub(crate) fn doubled_irreducible() -> Vec<Matrix> {
        let f = Arc::new(Field::new(2).unwrap());
        let mut a = Matrix::zero(f.clone(), 6, 6);
        let mut b = Matrix::zero(f, 6, 6);
        for o in [0, 3] {
            a.set(o, o + 1, 1);
            a.set(o + 1, o + 2, 1);
            a.set(o + 2, o, 1);
            a.set(o + 2, o + 1, 1);
            b.set(o, o, 1);
        }
        vec![a, b]
    }

    #[test]
    fn commutator_splits_homogeneous_sum() {
        let gens = doubled_irreducible();
        let mut splits = 0;
        for seed in 0..50 {
            let options = ChopOptions {
                seed,
                ..ChopOptions::default()
            };
            let mut engine = ChopEngine::new(ChopContext::new(options, MemorySink::new()));
            let mut piece = Piece::new(gens.clone()).unwrap();
            let word = piece.words.make_word(1).unwrap();
            let mut trial = WordTrial::new(1, word).unwrap();
            match engine.try_exceptional(&mut piece, &mut trial).unwrap() {
                Verdict::Split(found) => {
                    assert_eq!(found.kind, SplitKind::Exceptional);
                    assert!(!found.dual);
                    assert!(found.candidate.is_none());
                    assert_eq!(found.subspace.dim(), 3);
                    splits += 1;
                }
                Verdict::Undecided => {}
                Verdict::Irreducible => panic!("exceptional case reported irreducible"),
            }
        }
        assert!(splits > 0);
    }
}
