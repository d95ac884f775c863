//! The node tree.
//!
//! Nodes live in an arena and refer to each other by index. A node's
//! generators travel in a separate [`Piece`] that is taken out while the
//! node is worked on and consumed when the node is split or registered,
//! so a split node can never be asked for its generators again.

use mtx::{BitSet, Matrix, WordGenerator};

use crate::error::Result;

/// Index of a node in its tree.
pub type NodeId = usize;

/// Working payload of an undecided node.
#[derive(Debug, Clone)]
pub struct Piece {
    pub(crate) words: WordGenerator,
    transposed: Option<Vec<Matrix>>,
}

impl Piece {
    /// Wrap a generator list.
    ///
    /// # Errors
    ///
    /// Returns an error if the generators are malformed.
    pub fn new(gens: Vec<Matrix>) -> Result<Self> {
        Ok(Self {
            words: WordGenerator::new(gens)?,
            transposed: None,
        })
    }

    /// The generators.
    pub fn gens(&self) -> &[Matrix] {
        self.words.gens()
    }

    /// Dimension.
    pub fn dim(&self) -> usize {
        self.words.dim()
    }

    /// Transposed generators, computed on first use.
    pub fn transposed(&mut self) -> &[Matrix] {
        let gens = self.words.gens();
        self.transposed
            .get_or_insert_with(|| gens.iter().map(Matrix::transpose).collect())
    }

    /// Consume into the generators and the transposed generators, if they
    /// were computed.
    pub fn into_parts(self) -> (Vec<Matrix>, Option<Vec<Matrix>>) {
        (self.words.into_gens(), self.transposed)
    }
}

/// One vector-space piece of the module.
#[derive(Debug)]
pub struct Node {
    /// Creation order, for diagnostics.
    pub id: NodeId,
    /// Dimension.
    pub dim: usize,
    /// Offset inside the original module.
    pub base_dim: usize,
    /// Parent node, `None` for the root.
    pub parent: Option<NodeId>,
    /// `(sub, quot)` once split.
    pub children: Option<(NodeId, NodeId)>,
    /// Discovery id of the constituent, once registered.
    pub constituent: Option<usize>,
    pub(crate) bad_words: BitSet,
    pub(crate) nullity_gcd: usize,
    pub(crate) saved: Option<Matrix>,
    pub(crate) piece: Option<Piece>,
}

impl Node {
    /// True if the node was neither split nor registered yet.
    pub fn is_pending(&self) -> bool {
        self.children.is_none() && self.constituent.is_none()
    }
}

/// Arena of nodes; node 0 is the root.
#[derive(Debug, Default)]
pub struct NodeTree {
    nodes: Vec<Node>,
}

impl NodeTree {
    /// Empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node holding `piece`.
    pub fn push(
        &mut self,
        piece: Piece,
        base_dim: usize,
        parent: Option<NodeId>,
        saved: Option<Matrix>,
    ) -> NodeId {
        let id = self.nodes.len();
        let dim = piece.dim();
        self.nodes.push(Node {
            id,
            dim,
            base_dim,
            parent,
            children: None,
            constituent: None,
            bad_words: BitSet::new(),
            nullity_gcd: dim,
            saved,
            piece: Some(piece),
        });
        id
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node by id.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// True if `word` failed at `id` or at any of its ancestors.
    pub fn is_bad(&self, id: NodeId, word: u64) -> bool {
        let bit = word as usize;
        let mut cur = Some(id);
        while let Some(i) = cur {
            let Some(node) = self.nodes.get(i) else {
                return false;
            };
            if node.bad_words.contains(bit) {
                return true;
            }
            cur = node.parent;
        }
        false
    }

    /// Record that `word` failed at `id`.
    pub fn mark_bad(&mut self, id: NodeId, word: u64) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.bad_words.insert(word as usize);
        }
    }

    /// Leaves in composition-series order: the submodule side of every
    /// split before its quotient.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = if self.nodes.is_empty() { vec![] } else { vec![0] };
        while let Some(id) = stack.pop() {
            match self.nodes[id].children {
                Some((sub, quot)) => {
                    stack.push(quot);
                    stack.push(sub);
                }
                None => out.push(id),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtx::Field;
    use std::sync::Arc;

    fn piece(dim: usize) -> Piece {
        let f = Arc::new(Field::new(2).unwrap());
        Piece::new(vec![Matrix::identity(f, dim)]).unwrap()
    }

    #[test]
    fn bad_words_are_inherited() {
        let mut t = NodeTree::new();
        let root = t.push(piece(3), 0, None, None);
        let child = t.push(piece(1), 0, Some(root), None);
        t.mark_bad(root, 5);
        t.mark_bad(child, 7);
        assert!(t.is_bad(child, 5));
        assert!(t.is_bad(child, 7));
        assert!(!t.is_bad(root, 7));
        assert!(!t.is_bad(child, 6));
    }

    #[test]
    fn leaves_sub_before_quot() {
        let mut t = NodeTree::new();
        let root = t.push(piece(3), 0, None, None);
        let sub = t.push(piece(2), 0, Some(root), None);
        let quot = t.push(piece(1), 2, Some(root), None);
        t.get_mut(root).unwrap().children = Some((sub, quot));
        let a = t.push(piece(1), 0, Some(sub), None);
        let b = t.push(piece(1), 1, Some(sub), None);
        t.get_mut(sub).unwrap().children = Some((a, b));
        assert_eq!(t.leaves(), vec![a, b, quot]);
    }

    #[test]
    fn transposed_is_cached() {
        let f = Arc::new(Field::new(3).unwrap());
        let g = Matrix::from_rows(f, &[vec![1, 2], vec![0, 1]]).unwrap();
        let mut p = Piece::new(vec![g.clone()]).unwrap();
        assert_eq!(p.transposed()[0], g.transpose());
        let (gens, transposed) = p.into_parts();
        assert_eq!(gens, vec![g]);
        assert!(transposed.is_some());
    }
}
