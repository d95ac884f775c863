//! The table of distinct irreducible constituents.

use mtx::{is_isomorphic, Matrix, Poly, MAXFP};

use crate::error::Result;
use crate::report::ConstituentRecord;

/// A distinct irreducible, with its generators in canonical basis.
#[derive(Debug, Clone)]
pub struct Constituent {
    /// Discovery order across the whole run; stable under insertion.
    pub id: usize,
    /// Dimension.
    pub dim: usize,
    /// Isomorphism-class number among constituents of equal dimension.
    pub class: usize,
    /// Number of isomorphic leaves found so far.
    pub multiplicity: usize,
    /// Degree of the splitting field.
    pub splitting_degree: usize,
    /// Word nullities used to prune isomorphism tests.
    pub fingerprint: [usize; MAXFP],
    /// Identifying word number.
    pub id_word: u64,
    /// Identifying word, printed.
    pub id_word_name: String,
    /// Identifying polynomial.
    pub id_poly: Poly,
    /// Generators in the standard basis of the identifying word.
    pub canonical: Vec<Matrix>,
}

impl Constituent {
    /// `<dim><letter>`.
    pub fn name(&self) -> String {
        format!("{}{}", self.dim, class_letters(self.class))
    }

    /// Serializable summary.
    pub fn record(&self) -> ConstituentRecord {
        ConstituentRecord {
            name: self.name(),
            dim: self.dim,
            class: self.class,
            multiplicity: self.multiplicity,
            splitting_degree: self.splitting_degree,
            fingerprint: self.fingerprint.to_vec(),
            id_word: self.id_word,
            id_word_name: self.id_word_name.clone(),
            id_poly: self.id_poly.coeffs().to_vec(),
            id_poly_text: self.id_poly.to_string(),
        }
    }
}

/// `a`, `b`, …, `z`, `aa`, `ab`, …
pub fn class_letters(class: usize) -> String {
    let mut n = class + 1;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    out.iter().rev().map(|&b| char::from(b)).collect()
}

/// Fields of a constituent being registered, before it gets an id and class.
#[derive(Debug, Clone)]
pub struct NewConstituent {
    /// Degree of the splitting field.
    pub splitting_degree: usize,
    /// Fingerprint.
    pub fingerprint: [usize; MAXFP],
    /// Identifying word number.
    pub id_word: u64,
    /// Identifying word, printed.
    pub id_word_name: String,
    /// Identifying polynomial.
    pub id_poly: Poly,
    /// Generators in canonical basis.
    pub canonical: Vec<Matrix>,
}

/// Distinct constituents, sorted by dimension and then by discovery.
#[derive(Debug, Clone, Default)]
pub struct ConstituentTable {
    entries: Vec<Constituent>,
    next_id: usize,
}

impl ConstituentTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in table order.
    pub fn entries(&self) -> &[Constituent] {
        &self.entries
    }

    /// Number of distinct constituents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was registered yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry by discovery id.
    pub fn get(&self, id: usize) -> Option<&Constituent> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// The entry isomorphic to `gens`, if any. Only entries of equal
    /// dimension and fingerprint are tested.
    ///
    /// # Errors
    ///
    /// Propagates matrix errors from the isomorphism test.
    pub fn find_isomorphic(
        &self,
        gens: &[Matrix],
        fingerprint: &[usize; MAXFP],
    ) -> Result<Option<usize>> {
        let dim = gens.first().map_or(0, Matrix::rows);
        for e in &self.entries {
            if e.dim != dim || e.fingerprint != *fingerprint {
                continue;
            }
            if is_isomorphic(&e.canonical, e.id_word, &e.id_poly, gens)?.is_some() {
                return Ok(Some(e.id));
            }
        }
        Ok(None)
    }

    /// Count one more leaf isomorphic to constituent `id`.
    pub fn increment(&mut self, id: usize) -> Option<usize> {
        let e = self.entries.iter_mut().find(|e| e.id == id)?;
        e.multiplicity += 1;
        Some(e.multiplicity)
    }

    /// Insert a new constituent with multiplicity 1 after every entry of
    /// the same or smaller dimension. Returns its id.
    pub fn insert(&mut self, new: NewConstituent) -> usize {
        let dim = new.canonical.first().map_or(0, Matrix::rows);
        let class = self.entries.iter().filter(|e| e.dim == dim).count();
        let id = self.next_id;
        self.next_id += 1;
        let at = self.entries.partition_point(|e| e.dim <= dim);
        self.entries.insert(
            at,
            Constituent {
                id,
                dim,
                class,
                multiplicity: 1,
                splitting_degree: new.splitting_degree,
                fingerprint: new.fingerprint,
                id_word: new.id_word,
                id_word_name: new.id_word_name,
                id_poly: new.id_poly,
                canonical: new.canonical,
            },
        );
        id
    }

    /// Serializable summaries in table order.
    pub fn records(&self) -> Vec<ConstituentRecord> {
        self.entries.iter().map(Constituent::record).collect()
    }
}
