//! Growable bit set over word numbers.
//!
//! Bits are packed into `u64` words; the set grows on insert. Used for the
//! per-node bad-word sets and the run-wide good-word set.
//!
//! # Examples
//!
//! ```
//! use mtx::BitSet;
//!
//! let mut set = BitSet::new();
//! set.insert(3);
//! set.insert(200);
//! assert!(set.contains(200));
//! assert!(!set.contains(4));
//! assert_eq!(set.iter().collect::<Vec<_>>(), vec![3, 200]);
//! ```

/// A growable set of non-negative integers.
#[derive(Clone, Default, PartialEq, Eq, Hash, Debug)]
pub struct BitSet(Vec<u64>);

impl BitSet {
    /// Empty set.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a value. Returns `true` if it was not present.
    pub fn insert(&mut self, value: usize) -> bool {
        let word = value >> 6;
        let bit = 1u64 << (value & 63);
        if word >= self.0.len() {
            self.0.resize(word + 1, 0);
        }
        let fresh = self.0[word] & bit == 0;
        self.0[word] |= bit;
        fresh
    }

    /// Test membership.
    #[inline]
    pub fn contains(&self, value: usize) -> bool {
        self.0
            .get(value >> 6)
            .is_some_and(|w| (w >> (value & 63)) & 1 == 1)
    }

    /// Population count.
    pub fn len(&self) -> usize {
        self.0.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().enumerate().flat_map(|(i, &w)| {
            let mut rest = w;
            core::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some(i * 64 + bit)
            })
        })
    }
}

impl FromIterator<usize> for BitSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = Self::new();
        for v in iter {
            set.insert(v);
        }
        set
    }
}
