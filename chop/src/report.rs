//! Statistics and the read-only view of a finished (or running) chop.

use serde::{Deserialize, Serialize};

/// Counters for reporting; they never steer the search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Splits found by spinning vectors inherited from the parent.
    pub saved_vector_splits: u64,
    /// Irreducibility proven by an irreducible characteristic polynomial.
    pub charpoly_irreducible: u64,
    /// Splits found from a kernel of `p(word)`.
    pub normal_splits: u64,
    /// Splits found in the dual module.
    pub dual_splits: u64,
    /// Splits found by the exceptional-case method.
    pub exceptional_splits: u64,
    /// Leaves proven irreducible.
    pub irreducibles: u64,
    /// Word trials across all nodes.
    pub words_tried: u64,
    /// Nodes created.
    pub nodes: u64,
}

impl Statistics {
    /// Total number of splits.
    pub fn splits(&self) -> u64 {
        self.saved_vector_splits + self.normal_splits + self.dual_splits + self.exceptional_splits
    }
}

/// One distinct irreducible constituent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstituentRecord {
    /// `<dim><letter>`, e.g. `4b`.
    pub name: String,
    /// Dimension.
    pub dim: usize,
    /// Isomorphism-class number among constituents of this dimension.
    pub class: usize,
    /// Number of composition factors isomorphic to this one.
    pub multiplicity: usize,
    /// Degree of the splitting field over GF(q).
    pub splitting_degree: usize,
    /// Nullities of words 1 to 6.
    pub fingerprint: Vec<usize>,
    /// Identifying word number.
    pub id_word: u64,
    /// Identifying word as a sum of generator products.
    pub id_word_name: String,
    /// Identifying polynomial, coefficients low to high.
    pub id_poly: Vec<u8>,
    /// Identifying polynomial, printed.
    pub id_poly_text: String,
}

/// A composition factor in series order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesEntry {
    /// Name of the constituent this factor is isomorphic to.
    pub constituent: String,
    /// Dimension.
    pub dim: usize,
    /// Offset inside the original module.
    pub base_dim: usize,
}

/// Everything a chop run produces except the constituent matrices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChopReport {
    /// Field order.
    pub field: u32,
    /// Dimension of the module.
    pub dim: usize,
    /// Number of generators.
    pub generators: usize,
    /// Distinct constituents sorted by dimension, then discovery.
    pub constituents: Vec<ConstituentRecord>,
    /// Composition factors, submodule side first.
    pub series: Vec<SeriesEntry>,
    /// Counters.
    pub stats: Statistics,
}

impl ChopReport {
    /// Constituent by name.
    pub fn constituent(&self, name: &str) -> Option<&ConstituentRecord> {
        self.constituents.iter().find(|c| c.name == name)
    }

    /// Sum of `multiplicity · dim` over all constituents.
    pub fn total_dim(&self) -> usize {
        self.constituents.iter().map(|c| c.multiplicity * c.dim).sum()
    }

    /// The report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a report written by [`ChopReport::to_json`].
    ///
    /// # Errors
    ///
    /// Returns an error on malformed JSON.
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}
