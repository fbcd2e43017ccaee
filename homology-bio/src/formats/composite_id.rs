//! Composite reference identifiers (`featureId|orthologGroupId|taxonomyId`)
//!
//! The format is a contract with the reference-sequence source, so parsing
//! validates instead of assuming.

use homology_core::{HomologyError, HomologyResult};
use std::fmt;
use std::str::FromStr;

const SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeId {
    pub feature_id: String,
    pub ortholog_group_id: String,
    pub taxonomy_id: String,
}

impl CompositeId {
    pub fn new(feature_id: &str, ortholog_group_id: &str, taxonomy_id: &str) -> HomologyResult<Self> {
        for (name, part) in [
            ("feature id", feature_id),
            ("ortholog group id", ortholog_group_id),
            ("taxonomy id", taxonomy_id),
        ] {
            if part.is_empty() || part.contains(SEPARATOR) || part.chars().any(char::is_whitespace) {
                return Err(HomologyError::InvalidInput(format!(
                    "{} '{}' cannot be encoded in a composite identifier",
                    name, part
                )));
            }
        }

        Ok(Self {
            feature_id: feature_id.to_string(),
            ortholog_group_id: ortholog_group_id.to_string(),
            taxonomy_id: taxonomy_id.to_string(),
        })
    }

    pub fn encode(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            self.feature_id,
            self.ortholog_group_id,
            self.taxonomy_id,
            sep = SEPARATOR
        )
    }

    /// Parse a panel identifier.
    ///
    /// Fewer than three fields or an empty taxonomy field is
    /// `MalformedIdentifier`. Fields past the third are ignored.
    pub fn parse(id: &str) -> HomologyResult<Self> {
        let fields: Vec<&str> = id.split(SEPARATOR).collect();
        if fields.len() < 3 {
            return Err(HomologyError::MalformedIdentifier(format!(
                "expected featureId|orthologGroupId|taxonomyId, got '{}'",
                id
            )));
        }

        let taxonomy_id = fields[2].trim();
        if taxonomy_id.is_empty() {
            return Err(HomologyError::MalformedIdentifier(format!(
                "empty taxonomy field in '{}'",
                id
            )));
        }

        Ok(Self {
            feature_id: fields[0].trim().to_string(),
            ortholog_group_id: fields[1].trim().to_string(),
            taxonomy_id: taxonomy_id.to_string(),
        })
    }
}

impl FromStr for CompositeId {
    type Err = HomologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompositeId::parse(s)
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

/// Reference genome (taxonomy) identifier embedded in a panel target id
pub fn extract_reference_genome_id(target_id: &str) -> HomologyResult<String> {
    CompositeId::parse(target_id).map(|id| id.taxonomy_id)
}
