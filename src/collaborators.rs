//! Interfaces to the systems around the pipeline
//!
//! Genome retrieval, reference lookup and result persistence live outside
//! this crate. They are reached only through these traits; failures they
//! report surface as `HomologyError::Collaborator`.

use homology_bio::{GenomeFeature, PanelSequence, SequenceSet};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

use crate::reduce::OrthologPair;

/// Supplies the gene features of a query genome
#[cfg_attr(test, mockall::automock)]
pub trait ProteomeSource: Send + Sync {
    fn genome_features(&self, genome_ref: &str) -> anyhow::Result<Vec<GenomeFeature>>;
}

/// Supplies reference sequences: panel members per ortholog group, and the
/// full proteome of a reference genome keyed by plain feature id
#[cfg_attr(test, mockall::automock)]
pub trait ReferenceSource: Send + Sync {
    fn ortholog_group_members(&self, group_id: &str) -> anyhow::Result<Vec<PanelSequence>>;

    fn reference_proteome(&self, genome_id: &str) -> anyhow::Result<SequenceSet>;
}

/// Persists ortholog pairs and reports what changed
#[cfg_attr(test, mockall::automock)]
pub trait ResultSink: Send + Sync {
    fn store(
        &self,
        genome_ref: &str,
        reference_genome_id: &str,
        pairs: &[OrthologPair],
    ) -> anyhow::Result<UpdateStats>;
}

/// Counters reported by a result sink
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStats {
    pub nodes_created: u64,
    pub relationships_created: u64,
    pub properties_set: u64,
    pub nodes_updated: u64,
}

impl UpdateStats {
    pub fn merge(&mut self, other: &UpdateStats) {
        self.nodes_created += other.nodes_created;
        self.relationships_created += other.relationships_created;
        self.properties_set += other.properties_set;
        self.nodes_updated += other.nodes_updated;
    }

    pub fn is_empty(&self) -> bool {
        *self == UpdateStats::default()
    }
}

impl AddAssign for UpdateStats {
    fn add_assign(&mut self, other: UpdateStats) {
        self.merge(&other);
    }
}

/// Globally unique id of a feature within a stored genome
pub fn feature_guid(genome_ref: &str, feature_id: &str) -> String {
    format!("ws:{}:feature/{}", genome_ref, feature_id)
}

/// Query feature guid to reference feature id, in pair order
pub fn ortholog_guid_map(genome_ref: &str, pairs: &[OrthologPair]) -> IndexMap<String, String> {
    pairs
        .iter()
        .map(|pair| (feature_guid(genome_ref, &pair.query_id), pair.reference_id.clone()))
        .collect()
}
