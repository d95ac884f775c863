//! The chop loop.
//!
//! Nodes are processed from a worklist. A node is either registered as
//! irreducible or split; after a split the quotient is pushed before the
//! submodule, so submodules are finished first and the leaves come out in
//! composition-series order.
//!
//! Per node, in order:
//!
//! 1. dimension 1 is irreducible,
//! 2. vectors inherited from the parent are spun up together,
//! 3. every good word of the run is tried,
//! 4. words 1, 2, 3, … are tried up to the word limit, with the
//!    exceptional case enabled once enough of them failed.
//!
//! Every failed word is marked bad for the node and never tried again
//! there or in its descendants.

use mtx::{quotient_projection, spin_up, split, EchelonBasis, Matrix, SpinMode};
use tracing::{debug, info};

use crate::context::ChopContext;
use crate::error::{ChopError, Result};
use crate::node::{NodeId, NodeTree, Piece};
use crate::persist::{ConstituentSink, MemorySink};
use crate::report::{ChopReport, SeriesEntry};
use crate::trial::WordTrial;

/// How a split was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SplitKind {
    SavedVector,
    Normal,
    Dual,
    Exceptional,
}

/// A proper invariant subspace and where it lives.
#[derive(Debug)]
pub(crate) struct SplitFound {
    /// In the node's basis, or in the dual basis when `dual` is set.
    pub subspace: EchelonBasis,
    pub dual: bool,
    /// Vectors handed on to the quotient after a non-dual split.
    pub candidate: Option<Matrix>,
    pub kind: SplitKind,
}

/// Outcome of one attempt at a node.
#[derive(Debug)]
pub(crate) enum Verdict {
    Split(SplitFound),
    Irreducible,
    Undecided,
}

/// True for a nonzero subspace that is not the whole space.
pub(crate) fn is_proper(s: &EchelonBasis) -> bool {
    s.dim() > 0 && !s.is_full()
}

/// Runs one chop.
#[derive(Debug)]
pub struct ChopEngine<S: ConstituentSink = MemorySink> {
    pub(crate) ctx: ChopContext<S>,
    pub(crate) tree: NodeTree,
    field: u32,
    dim: usize,
    generators: usize,
}

impl<S: ConstituentSink> ChopEngine<S> {
    /// Engine over a fresh context.
    pub fn new(ctx: ChopContext<S>) -> Self {
        Self {
            ctx,
            tree: NodeTree::new(),
            field: 0,
            dim: 0,
            generators: 0,
        }
    }

    /// The run-wide state.
    pub fn context(&self) -> &ChopContext<S> {
        &self.ctx
    }

    /// Consume the engine and return its context.
    pub fn into_context(self) -> ChopContext<S> {
        self.ctx
    }

    /// The node tree.
    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    /// Chop the module generated by `gens` down to irreducibles.
    ///
    /// # Errors
    ///
    /// Returns [`ChopError::Exhausted`] or [`ChopError::IdWordNotFound`]
    /// when a search bound is hit, and propagates matrix and persistence
    /// errors.
    pub fn run(&mut self, gens: Vec<Matrix>) -> Result<ChopReport> {
        if !self.tree.is_empty() {
            return Err(ChopError::Inconsistent("engine already ran".into()));
        }
        let piece = Piece::new(gens)?;
        let n = piece.dim();
        if n == 0 {
            return Err(ChopError::Inconsistent("zero-dimensional module".into()));
        }
        let field = piece.gens()[0].field().clone();
        self.field = field.order();
        self.dim = n;
        self.generators = piece.gens().len();
        info!(dim = n, field = self.field, generators = self.generators, "chop started");

        // The first unit vector is the root's inherited candidate.
        let mut e1 = vec![0u8; n];
        e1[0] = 1;
        let root = self
            .tree
            .push(piece, 0, None, Some(Matrix::row_vector(field, &e1)));
        self.ctx.stats.nodes += 1;

        let mut pending = vec![root];
        while let Some(id) = pending.pop() {
            if let Some((sub, quot)) = self.chop_node(id)? {
                pending.push(quot);
                pending.push(sub);
            }
        }

        let report = self.report();
        self.ctx.sink.write_table(&report)?;
        info!(
            constituents = report.constituents.len(),
            factors = report.series.len(),
            words = report.stats.words_tried,
            "chop finished"
        );
        Ok(report)
    }

    /// Snapshot of the constituent table, the registered leaves and the
    /// counters.
    pub fn report(&self) -> ChopReport {
        let series = self
            .tree
            .leaves()
            .into_iter()
            .filter_map(|id| {
                let node = self.tree.get(id)?;
                let c = self.ctx.table.get(node.constituent?)?;
                Some(SeriesEntry {
                    constituent: c.name(),
                    dim: node.dim,
                    base_dim: node.base_dim,
                })
            })
            .collect();
        ChopReport {
            field: self.field,
            dim: self.dim,
            generators: self.generators,
            constituents: self.ctx.table.records(),
            series,
            stats: self.ctx.stats.clone(),
        }
    }

    /// Decide one node. Returns the children if it was split.
    fn chop_node(&mut self, id: NodeId) -> Result<Option<(NodeId, NodeId)>> {
        let node = self
            .tree
            .get_mut(id)
            .ok_or_else(|| ChopError::Inconsistent(format!("no node {id}")))?;
        let dim = node.dim;
        let saved = node.saved.take();
        let mut piece = node
            .piece
            .take()
            .ok_or_else(|| ChopError::Inconsistent(format!("node {id} has no generators")))?;
        debug!(node = id, dim, "chop node");

        if dim == 1 {
            self.register(id, piece)?;
            return Ok(None);
        }

        if let Some(saved) = saved {
            let s = spin_up(&saved, piece.gens(), SpinMode::Combine)?;
            if is_proper(&s) {
                let found = SplitFound {
                    subspace: s,
                    dual: false,
                    candidate: Some(saved),
                    kind: SplitKind::SavedVector,
                };
                return self.split_node(id, piece, found).map(Some);
            }
        }

        let good: Vec<u64> = self.ctx.good_words.iter().map(|w| w as u64).collect();
        let limit = self.ctx.options.word_limit;
        let exceptional_after = self.ctx.options.exceptional_after;
        let mut failed = 0u64;
        let mut last_word = 0u64;
        for word in good.into_iter().chain(1..=limit) {
            if self.tree.is_bad(id, word) {
                continue;
            }
            last_word = word;
            let exceptional = failed >= exceptional_after;
            match self.chop_with_word(id, &mut piece, word, exceptional)? {
                Verdict::Split(found) => {
                    self.ctx.good_words.insert(word as usize);
                    return self.split_node(id, piece, found).map(Some);
                }
                Verdict::Irreducible => {
                    self.ctx.good_words.insert(word as usize);
                    self.register(id, piece)?;
                    return Ok(None);
                }
                Verdict::Undecided => {
                    self.tree.mark_bad(id, word);
                    failed += 1;
                }
            }
        }
        Err(ChopError::Exhausted {
            node: id,
            dim,
            tries: failed,
            last_word,
        })
    }

    /// Try one word at a node.
    fn chop_with_word(
        &mut self,
        id: NodeId,
        piece: &mut Piece,
        word: u64,
        exceptional: bool,
    ) -> Result<Verdict> {
        self.ctx.stats.words_tried += 1;
        let matrix = piece.words.make_word(word)?;
        let mut trial = WordTrial::new(word, matrix)?;
        let n = piece.dim();
        debug!(
            node = id,
            word,
            name = %piece.words.symbolic_name(word),
            first = %trial.first_poly(),
            "word trial"
        );

        let first = trial.first_factors().clone();
        if let [(p, 1)] = first.factors() {
            if p.deg() == n {
                self.ctx.stats.charpoly_irreducible += 1;
                debug!(node = id, word, "irreducible characteristic polynomial");
                return Ok(Verdict::Irreducible);
            }
        }

        for (p, _) in first.factors() {
            if p.deg() > self.ctx.options.max_degree {
                continue;
            }
            match self.try_poly(id, piece, &mut trial, p)? {
                Verdict::Undecided => {}
                decided => return Ok(decided),
            }
        }

        if exceptional {
            return self.try_exceptional(piece, &mut trial);
        }
        Ok(Verdict::Undecided)
    }

    /// Replace a node by its submodule and quotient.
    fn split_node(
        &mut self,
        id: NodeId,
        piece: Piece,
        found: SplitFound,
    ) -> Result<(NodeId, NodeId)> {
        let (gens, transposed) = piece.into_parts();
        let (sub_gens, quot_gens, quot_saved) = if found.dual {
            // The dual subspace is the annihilator of a submodule: its
            // quotient gives the submodule and itself the quotient.
            let tgens = transposed.unwrap_or_else(|| gens.iter().map(Matrix::transpose).collect());
            let parts = split(&found.subspace, &tgens)?;
            (transpose_all(&parts.quot), transpose_all(&parts.sub), None)
        } else {
            let parts = split(&found.subspace, &gens)?;
            let saved = found
                .candidate
                .map(|c| quotient_projection(&found.subspace, &c))
                .filter(|m| m.rows() > 0);
            (parts.sub, parts.quot, saved)
        };

        let stats = &mut self.ctx.stats;
        match found.kind {
            SplitKind::SavedVector => stats.saved_vector_splits += 1,
            SplitKind::Normal => stats.normal_splits += 1,
            SplitKind::Dual => stats.dual_splits += 1,
            SplitKind::Exceptional => stats.exceptional_splits += 1,
        }
        stats.nodes += 2;

        let base_dim = self
            .tree
            .get(id)
            .map(|n| n.base_dim)
            .ok_or_else(|| ChopError::Inconsistent(format!("no node {id}")))?;
        let sub_piece = Piece::new(sub_gens)?;
        let quot_piece = Piece::new(quot_gens)?;
        let (sub_dim, quot_dim) = (sub_piece.dim(), quot_piece.dim());
        let sub = self.tree.push(sub_piece, base_dim, Some(id), None);
        let quot = self
            .tree
            .push(quot_piece, base_dim + sub_dim, Some(id), quot_saved);
        if let Some(node) = self.tree.get_mut(id) {
            node.children = Some((sub, quot));
        }
        info!(node = id, sub = sub_dim, quot = quot_dim, kind = ?found.kind, "split");
        Ok((sub, quot))
    }
}

fn transpose_all(gens: &[Matrix]) -> Vec<Matrix> {
    gens.iter().map(Matrix::transpose).collect()
}
