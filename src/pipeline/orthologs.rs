//! Stage two: reciprocal best hits against the full reference proteome

use homology_bio::SequenceSet;
use homology_core::HomologyResult;
use homology_tools::Aligner;
use std::sync::Arc;
use tracing::info;

use crate::reduce::{BbhReducer, OrthologPair};

pub struct OrthologPipeline {
    aligner: Arc<dyn Aligner>,
    max_evalue: String,
}

impl OrthologPipeline {
    pub fn new(aligner: Arc<dyn Aligner>, max_evalue: impl Into<String>) -> Self {
        Self {
            aligner,
            max_evalue: max_evalue.into(),
        }
    }

    /// Ortholog pairs in order of each query's first hit. An empty result is
    /// not an error.
    pub fn compute_orthologs(
        &self,
        query: &SequenceSet,
        reference: &SequenceSet,
    ) -> HomologyResult<Vec<OrthologPair>> {
        let mut reducer = BbhReducer::new();
        let stats = self
            .aligner
            .align(query, reference, &self.max_evalue, &mut reducer)?;

        let pairs = reducer.extract_pairs();
        info!(
            hits = stats.hits,
            queries_with_hits = reducer.query_count(),
            orthologs = pairs.len(),
            "Computed bidirectional best hits"
        );
        Ok(pairs)
    }
}
