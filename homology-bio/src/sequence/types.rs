use homology_core::{HomologyError, HomologyResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mapping from sequence identifier to amino-acid sequence.
///
/// Identifiers are unique and become FASTA header tokens, so they may not be
/// empty or contain whitespace. Empty sequences are never stored. Iteration
/// follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceSet {
    sequences: IndexMap<String, String>,
}

impl SequenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sequence, returning the previous sequence stored under `id`
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        sequence: impl Into<String>,
    ) -> HomologyResult<Option<String>> {
        let id = id.into();
        let sequence = sequence.into();

        if id.is_empty() || id.chars().any(char::is_whitespace) {
            return Err(HomologyError::InvalidInput(format!(
                "sequence identifier must be non-empty without whitespace: {:?}",
                id
            )));
        }
        if sequence.is_empty() {
            return Err(HomologyError::InvalidInput(format!("empty sequence for '{}'", id)));
        }

        Ok(self.sequences.insert(id, sequence))
    }

    /// Builder-style insert for literals in tests and fixtures
    pub fn with(mut self, id: &str, sequence: &str) -> HomologyResult<Self> {
        self.insert(id, sequence)?;
        Ok(self)
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.sequences.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sequences.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Total residue count across all sequences
    pub fn total_residues(&self) -> usize {
        self.sequences.values().map(String::len).sum()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sequences.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sequences.iter().map(|(id, seq)| (id.as_str(), seq.as_str()))
    }
}

impl<'a> IntoIterator for &'a SequenceSet {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.sequences.iter()
    }
}

impl TryFrom<Vec<(String, String)>> for SequenceSet {
    type Error = HomologyError;

    fn try_from(pairs: Vec<(String, String)>) -> HomologyResult<Self> {
        let mut set = SequenceSet::new();
        for (id, seq) in pairs {
            set.insert(id, seq)?;
        }
        Ok(set)
    }
}

impl fmt::Display for SequenceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sequences ({} residues)",
            self.len(),
            self.total_residues()
        )
    }
}
