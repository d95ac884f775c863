//! Registering irreducible leaves.
//!
//! A leaf is first compared against the table (fingerprint, then the
//! isomorphism test). Only a genuinely new constituent needs an
//! identifying word: a word `W` and an irreducible `p` whose kernel
//! `null(p(W))` has the dimension of the splitting field. The kernel then
//! carries a canonical seed vector, and the standard basis spun from it
//! gives the canonical generators stored in the table.

use mtx::{canonical_form, check_splitting_degree, fingerprint, Poly, MAXFP};
use tracing::{debug, info};

use crate::engine::ChopEngine;
use crate::error::{ChopError, Result};
use crate::node::{NodeId, Piece};
use crate::persist::ConstituentSink;
use crate::poly_split::gcd;
use crate::table::NewConstituent;
use crate::trial::WordTrial;

/// An identifying word with its polynomial and the splitting degree.
#[derive(Debug)]
struct IdWord {
    word: u64,
    poly: Poly,
    splitting_degree: usize,
}

impl<S: ConstituentSink> ChopEngine<S> {
    /// Attach the irreducible leaf `id` to the table.
    pub(crate) fn register(&mut self, id: NodeId, mut piece: Piece) -> Result<()> {
        self.ctx.stats.irreducibles += 1;
        let fp = fingerprint(&mut piece.words)?;

        if let Some(cid) = self.ctx.table.find_isomorphic(piece.gens(), &fp)? {
            let multiplicity = self
                .ctx
                .table
                .increment(cid)
                .ok_or_else(|| ChopError::Inconsistent(format!("no constituent {cid}")))?;
            if let Some(node) = self.tree.get_mut(id) {
                node.constituent = Some(cid);
            }
            let name = self.ctx.table.get(cid).map(|c| c.name()).unwrap_or_default();
            info!(node = id, constituent = %name, multiplicity, "known constituent");
            return Ok(());
        }

        let id_word = match self.known_id_word(&mut piece, &fp)? {
            Some(found) => found,
            None => self.find_id_word(id, &mut piece)?,
        };
        let Some((canonical, _)) = canonical_form(piece.gens(), id_word.word, &id_word.poly)? else {
            return Err(ChopError::Inconsistent(format!(
                "identifying word {} does not spin node {id}",
                id_word.word
            )));
        };
        let cid = self.ctx.table.insert(NewConstituent {
            splitting_degree: id_word.splitting_degree,
            fingerprint: fp,
            id_word: id_word.word,
            id_word_name: piece.words.symbolic_name(id_word.word),
            id_poly: id_word.poly,
            canonical,
        });
        if let Some(node) = self.tree.get_mut(id) {
            node.constituent = Some(cid);
        }
        let Some(constituent) = self.ctx.table.get(cid) else {
            return Err(ChopError::Inconsistent(format!("no constituent {cid}")));
        };
        let name = constituent.name();
        info!(
            node = id,
            constituent = %name,
            splitting_degree = constituent.splitting_degree,
            id_word = %constituent.id_word_name,
            id_poly = %constituent.id_poly,
            "new constituent"
        );
        self.ctx.sink.write_constituent(&name, &constituent.canonical)?;
        let report = self.report();
        self.ctx.sink.write_table(&report)?;
        Ok(())
    }

    /// Reuse an identifying word from an earlier run if one matches the
    /// dimension and fingerprint and still passes the splitting check.
    fn known_id_word(&self, piece: &mut Piece, fp: &[usize; MAXFP]) -> Result<Option<IdWord>> {
        let n = piece.dim();
        let field = piece.gens()[0].field().clone();
        for known in &self.ctx.known {
            if known.dim != n || known.fingerprint != *fp {
                continue;
            }
            if known.id_poly.iter().any(|&c| u32::from(c) >= field.order()) {
                continue;
            }
            let poly = Poly::new(field.clone(), known.id_poly.clone());
            if poly.deg() == 0 {
                continue;
            }
            let word = piece.words.make_word(known.id_word)?;
            let kernel = poly.eval_matrix(&word)?.null_space();
            if kernel.dim() == known.splitting_degree
                && check_splitting_degree(piece.gens(), &kernel)?
            {
                debug!(id_word = known.id_word, "reusing identifying word");
                return Ok(Some(IdWord {
                    word: known.id_word,
                    poly,
                    splitting_degree: kernel.dim(),
                }));
            }
        }
        Ok(None)
    }

    /// Search words 1, 2, … for an identifying word. The nullity of
    /// every candidate is a multiple of the splitting degree, so their
    /// running gcd bounds the degrees worth trying.
    fn find_id_word(&mut self, id: NodeId, piece: &mut Piece) -> Result<IdWord> {
        let limit = self.ctx.options.id_word_limit;
        let mut bound = self.tree.get(id).map_or(piece.dim(), |n| n.nullity_gcd);
        let mut tries = 0u64;
        let mut word = 0u64;
        while tries < limit {
            word += 1;
            if self.tree.is_bad(id, word) {
                continue;
            }
            tries += 1;
            let mut trial = WordTrial::new(word, piece.words.make_word(word)?)?;
            let (_, factors) = trial.char_poly()?;
            for (p, _) in factors.factors() {
                if p.deg() > bound {
                    break;
                }
                let kernel = p.eval_matrix(&trial.matrix)?.null_space();
                let k = kernel.dim();
                bound = gcd(bound, k);
                if k == bound && check_splitting_degree(piece.gens(), &kernel)? {
                    debug!(node = id, word, poly = %p, nullity = k, tries, "identifying word");
                    self.observe_nullity(id, k);
                    return Ok(IdWord {
                        word,
                        poly: p.clone(),
                        splitting_degree: k,
                    });
                }
            }
        }
        Err(ChopError::IdWordNotFound {
            node: id,
            dim: piece.dim(),
            tries,
        })
    }
}
