//! Run-wide state shared by every node of one chop.

use mtx::{BitSet, MAXFP};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::options::ChopOptions;
use crate::persist::{ConstituentSink, MemorySink};
use crate::report::{ChopReport, Statistics};
use crate::table::ConstituentTable;

/// An identifying word known from an earlier run. Reused for a new
/// constituent of the same dimension and fingerprint once the splitting
/// check confirms it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownIdWord {
    /// Dimension of the constituent.
    pub dim: usize,
    /// Its fingerprint.
    pub fingerprint: [usize; MAXFP],
    /// Word number.
    pub id_word: u64,
    /// Polynomial coefficients, low to high.
    pub id_poly: Vec<u8>,
    /// Splitting degree, the expected kernel dimension.
    pub splitting_degree: usize,
}

impl KnownIdWord {
    /// Identifying words recorded in a report.
    pub fn from_report(report: &ChopReport) -> Vec<Self> {
        report
            .constituents
            .iter()
            .filter_map(|c| {
                let fingerprint: [usize; MAXFP] = c.fingerprint.as_slice().try_into().ok()?;
                Some(Self {
                    dim: c.dim,
                    fingerprint,
                    id_word: c.id_word,
                    id_poly: c.id_poly.clone(),
                    splitting_degree: c.splitting_degree,
                })
            })
            .collect()
    }
}

/// Options, the good-word set, the constituent table, counters, the
/// random source and the persistence sink of one run.
#[derive(Debug)]
pub struct ChopContext<S: ConstituentSink = MemorySink> {
    pub(crate) options: ChopOptions,
    pub(crate) good_words: BitSet,
    pub(crate) table: ConstituentTable,
    pub(crate) stats: Statistics,
    pub(crate) rng: StdRng,
    pub(crate) sink: S,
    pub(crate) known: Vec<KnownIdWord>,
}

impl<S: ConstituentSink> ChopContext<S> {
    /// Fresh context; the random source is seeded from `options.seed`.
    pub fn new(options: ChopOptions, sink: S) -> Self {
        let rng = StdRng::seed_from_u64(options.seed);
        Self {
            options,
            good_words: BitSet::new(),
            table: ConstituentTable::new(),
            stats: Statistics::default(),
            rng,
            sink,
            known: Vec::new(),
        }
    }

    /// Add identifying words from an earlier run.
    pub fn with_known_id_words(mut self, known: Vec<KnownIdWord>) -> Self {
        self.known.extend(known);
        self
    }

    /// Search parameters.
    pub fn options(&self) -> &ChopOptions {
        &self.options
    }

    /// Words that split a node or proved one irreducible.
    pub fn good_words(&self) -> &BitSet {
        &self.good_words
    }

    /// Distinct constituents found so far.
    pub fn table(&self) -> &ConstituentTable {
        &self.table
    }

    /// Counters.
    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// The persistence sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the context and return the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
