//! Genome features and the proteome derived from them

use super::types::SequenceSet;
use homology_core::HomologyResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A gene feature as delivered by a genome source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomeFeature {
    pub id: String,
    /// Protein translation; absent for non-coding features
    pub protein_translation: Option<String>,
    pub function: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl GenomeFeature {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            protein_translation: None,
            function: None,
            aliases: Vec::new(),
        }
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.protein_translation = Some(translation.into());
        self
    }

    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn is_coding(&self) -> bool {
        self.protein_translation
            .as_deref()
            .is_some_and(|t| !t.is_empty())
    }
}

impl SequenceSet {
    /// Proteome of a genome: one entry per feature with a protein translation
    pub fn from_features<'a, I>(features: I) -> HomologyResult<SequenceSet>
    where
        I: IntoIterator<Item = &'a GenomeFeature>,
    {
        let mut proteome = SequenceSet::new();
        let mut skipped = 0usize;

        for feature in features {
            match feature.protein_translation.as_deref() {
                Some(translation) if !translation.is_empty() => {
                    proteome.insert(feature.id.as_str(), translation)?;
                }
                _ => skipped += 1,
            }
        }

        debug!(
            proteins = proteome.len(),
            skipped, "Derived proteome from genome features"
        );
        Ok(proteome)
    }
}
