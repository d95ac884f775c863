//! Norton's irreducibility test for one factor of a word's characteristic
//! polynomial.
//!
//! With `N = null(p(W))` and `N' = null(p(W)ᵀ)`, the module is irreducible
//! iff every nonzero vector of `N` spins up to the whole space and some
//! nonzero vector of `N'` spins up to the whole dual space. Any proper
//! spin met on the way is a split.

use mtx::{spin_up, Matrix, Poly, SpinMode};
use tracing::trace;

use crate::engine::{is_proper, ChopEngine, SplitFound, SplitKind, Verdict};
use crate::error::Result;
use crate::node::{NodeId, Piece};
use crate::persist::ConstituentSink;
use crate::trial::WordTrial;

impl<S: ConstituentSink> ChopEngine<S> {
    /// Run the test for the irreducible factor `p` of the word in `trial`.
    pub(crate) fn try_poly(
        &mut self,
        id: NodeId,
        piece: &mut Piece,
        trial: &mut WordTrial,
        p: &Poly,
    ) -> Result<Verdict> {
        let field = trial.matrix.field().clone();
        let Some(v) = trial.kernel_seed(p)? else {
            return Ok(Verdict::Undecided);
        };
        let seed = Matrix::row_vector(field.clone(), &v);
        let s = spin_up(&seed, piece.gens(), SpinMode::First)?;
        trace!(node = id, word = trial.number, poly = %p, spin = s.dim(), "kernel vector");
        if is_proper(&s) {
            return Ok(Verdict::Split(SplitFound {
                subspace: s,
                dual: false,
                candidate: Some(seed),
                kind: SplitKind::Normal,
            }));
        }

        // If the kernel is a single copy of F[x]/(p) the vector above
        // stands for all of it.
        let mult = trial.total_multiplicity(p)?;
        let mut kernel_ok = mult == 1;
        let mut evaluated = None;
        if !kernel_ok && mult * p.deg() <= self.ctx.options.max_nullity {
            let pw = p.eval_matrix(&trial.matrix)?;
            let kernel = pw.null_space();
            self.observe_nullity(id, kernel.dim());
            if kernel.dim() == p.deg() {
                kernel_ok = true;
            } else {
                let seeds = kernel.to_matrix();
                let s = spin_up(&seeds, piece.gens(), SpinMode::Make)?;
                trace!(node = id, nullity = seeds.rows(), spin = s.dim(), "whole kernel");
                if is_proper(&s) {
                    return Ok(Verdict::Split(SplitFound {
                        subspace: s,
                        dual: false,
                        candidate: Some(seeds),
                        kind: SplitKind::Normal,
                    }));
                }
                kernel_ok = true;
            }
            evaluated = Some(pw);
        }

        let w = match trial.dual_kernel_seed(p)? {
            Some(w) => Some(w),
            None => {
                let pw = match evaluated {
                    Some(pw) => pw,
                    None => p.eval_matrix(&trial.matrix)?,
                };
                pw.transpose().null_space().rows().first().cloned()
            }
        };
        let Some(w) = w else {
            return Ok(Verdict::Undecided);
        };
        let s = spin_up(&Matrix::row_vector(field, &w), piece.transposed(), SpinMode::First)?;
        trace!(node = id, word = trial.number, spin = s.dim(), "dual kernel vector");
        if is_proper(&s) {
            return Ok(Verdict::Split(SplitFound {
                subspace: s,
                dual: true,
                candidate: None,
                kind: SplitKind::Dual,
            }));
        }

        if kernel_ok {
            Ok(Verdict::Irreducible)
        } else {
            Ok(Verdict::Undecided)
        }
    }

    /// Fold a nullity seen at node `id` into its running gcd.
    pub(crate) fn observe_nullity(&mut self, id: NodeId, nullity: usize) {
        if let Some(node) = self.tree.get_mut(id) {
            node.nullity_gcd = gcd(node.nullity_gcd, nullity);
        }
    }
}

pub(crate) fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::gcd;

    #[test]
    fn gcd_small() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(5, 0), 5);
        assert_eq!(gcd(0, 3), 3);
        assert_eq!(gcd(7, 3), 1);
    }
}
