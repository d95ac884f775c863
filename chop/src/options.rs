//! Search parameters.

use serde::{Deserialize, Serialize};

/// Limits and knobs of the word search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChopOptions {
    /// Factors of higher degree are not tried.
    pub max_degree: usize,
    /// The whole kernel of `p(word)` is searched only when
    /// `multiplicity · deg p` stays within this limit.
    pub max_nullity: usize,
    /// Word trials per node before giving up.
    pub word_limit: u64,
    /// Words examined per identifying-word search before giving up.
    pub id_word_limit: u64,
    /// Failed words at a node before the exceptional case is tried. Failed
    /// good-word trials count toward it.
    pub exceptional_after: u64,
    /// Seed of the random choices made in the exceptional case.
    pub seed: u64,
}

impl Default for ChopOptions {
    fn default() -> Self {
        Self {
            max_degree: 5,
            max_nullity: 3,
            word_limit: 10_000_000,
            id_word_limit: 10_000,
            exceptional_after: 10,
            seed: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let o: ChopOptions = serde_json::from_str(r#"{"max_degree": 2}"#).unwrap();
        assert_eq!(o.max_degree, 2);
        assert_eq!(o.max_nullity, 3);
        assert_eq!(o.word_limit, 10_000_000);
    }
}
