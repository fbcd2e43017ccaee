//! Stage one: pick the reference genome closest to a query proteome

use homology_bio::{extract_reference_genome_id, SequenceSet};
use homology_core::{HomologyError, HomologyResult};
use homology_tools::{Aligner, HitRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::reduce::BestHitReducer;

/// Reference genome chosen for a query, with the panel hit that chose it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSelection {
    pub genome_id: String,
    pub best_hit: HitRecord,
}

/// Aligns the query proteome against the reference panel and takes the
/// taxonomy id embedded in the single best hit's target.
pub struct ClosestReferenceSelector {
    aligner: Arc<dyn Aligner>,
    max_evalue: String,
}

impl ClosestReferenceSelector {
    pub fn new(aligner: Arc<dyn Aligner>, max_evalue: impl Into<String>) -> Self {
        Self {
            aligner,
            max_evalue: max_evalue.into(),
        }
    }

    /// Fails with `NoHitFound` when nothing in the panel passes the e-value
    /// cutoff, or `MalformedIdentifier` when the best target is not a
    /// composite panel id.
    pub fn select(&self, query: &SequenceSet, panel: &SequenceSet) -> HomologyResult<ReferenceSelection> {
        let mut reducer = BestHitReducer::new();
        let stats = self
            .aligner
            .align(query, panel, &self.max_evalue, &mut reducer)?;
        debug!(hits = stats.hits, panel = panel.len(), "Panel alignment finished");

        let best_hit = reducer.into_best_hit().ok_or(HomologyError::NoHitFound)?;
        let genome_id = extract_reference_genome_id(&best_hit.target_id)?;

        info!(
            reference = %genome_id,
            target = %best_hit.target_id,
            bit_score = best_hit.bit_score,
            identity = best_hit.percent_identity,
            "Selected closest reference genome"
        );
        Ok(ReferenceSelection {
            genome_id,
            best_hit,
        })
    }
}
