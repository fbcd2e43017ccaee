//! One full homology run per query genome
//!
//! load proteome -> build panel -> select reference -> fetch reference
//! proteome -> compute orthologs -> store

use chrono::{DateTime, Utc};
use homology_bio::{build_reference_panel, SequenceSet};
use homology_core::{CancellationToken, Config, HomologyError, HomologyResult};
use homology_tools::Aligner;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, warn};

use super::{ClosestReferenceSelector, OrthologPipeline};
use crate::collaborators::{ProteomeSource, ReferenceSource, ResultSink, UpdateStats};
use crate::reduce::OrthologPair;

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub genome_ref: String,
    pub reference_genome_id: String,
    pub best_hit_target: String,
    pub best_hit_identity: f64,
    pub best_hit_bit_score: f64,
    pub feature_count: usize,
    pub ortholog_count: usize,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub update_stats: UpdateStats,
    #[serde(skip)]
    pub orthologs: Vec<OrthologPair>,
}

impl RunReport {
    pub fn to_json(&self) -> HomologyResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(RunReport),
    /// Nothing in the reference panel passed the e-value cutoff; no
    /// ortholog stage was run
    NoReference {
        genome_ref: String,
        feature_count: usize,
    },
}

impl RunOutcome {
    pub fn report(&self) -> Option<&RunReport> {
        match self {
            RunOutcome::Completed(report) => Some(report),
            RunOutcome::NoReference { .. } => None,
        }
    }
}

pub struct HomologyRunner {
    config: Config,
    aligner: Arc<dyn Aligner>,
    proteomes: Arc<dyn ProteomeSource>,
    references: Arc<dyn ReferenceSource>,
    sink: Arc<dyn ResultSink>,
    cancel: CancellationToken,
}

impl HomologyRunner {
    pub fn new(
        config: Config,
        aligner: Arc<dyn Aligner>,
        proteomes: Arc<dyn ProteomeSource>,
        references: Arc<dyn ReferenceSource>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            config,
            aligner,
            proteomes,
            references,
            sink,
            cancel: CancellationToken::new(),
        }
    }

    /// Checked between stages. Share the same token with the aligner so a
    /// running alignment is killed as well.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Panel sequences of every configured ortholog group, with composite ids
    pub fn reference_panel(&self) -> HomologyResult<SequenceSet> {
        let mut groups = Vec::with_capacity(self.config.panel.ortholog_group_ids.len());
        for group_id in &self.config.panel.ortholog_group_ids {
            let members = self.references.ortholog_group_members(group_id)?;
            groups.push((group_id.clone(), members));
        }
        build_reference_panel(groups)
    }

    pub fn run(&self, genome_ref: &str) -> HomologyResult<RunOutcome> {
        let span = info_span!("homology_run", genome_ref = %genome_ref);
        let _enter = span.enter();

        let started_at = Utc::now();
        let started = Instant::now();
        let max_evalue = self.config.aligner.max_evalue.as_str();

        self.cancel.check()?;
        let features = self.proteomes.genome_features(genome_ref)?;
        let query = SequenceSet::from_features(&features)?;
        info!(
            features = features.len(),
            proteins = query.len(),
            "Loaded query proteome"
        );

        let panel = self.reference_panel()?;
        self.cancel.check()?;

        let selector = ClosestReferenceSelector::new(Arc::clone(&self.aligner), max_evalue);
        let selection = match selector.select(&query, &panel) {
            Ok(selection) => selection,
            Err(HomologyError::NoHitFound) => {
                warn!(panel = panel.len(), "No panel hit passed the e-value cutoff");
                return Ok(RunOutcome::NoReference {
                    genome_ref: genome_ref.to_string(),
                    feature_count: features.len(),
                });
            }
            Err(e) => return Err(e),
        };

        self.cancel.check()?;
        let reference = self.references.reference_proteome(&selection.genome_id)?;
        self.cancel.check()?;

        let pipeline = OrthologPipeline::new(Arc::clone(&self.aligner), max_evalue);
        let orthologs = pipeline.compute_orthologs(&query, &reference)?;

        self.cancel.check()?;
        let update_stats = self
            .sink
            .store(genome_ref, &selection.genome_id, &orthologs)?;

        let report = RunReport {
            genome_ref: genome_ref.to_string(),
            reference_genome_id: selection.genome_id,
            best_hit_target: selection.best_hit.target_id,
            best_hit_identity: selection.best_hit.percent_identity,
            best_hit_bit_score: selection.best_hit.bit_score,
            feature_count: features.len(),
            ortholog_count: orthologs.len(),
            started_at,
            elapsed_ms: started.elapsed().as_millis() as u64,
            update_stats,
            orthologs,
        };

        info!(
            elapsed_ms = report.elapsed_ms,
            reference = %report.reference_genome_id,
            identity = report.best_hit_identity,
            features = report.feature_count,
            orthologs = report.ortholog_count,
            relationships_created = report.update_stats.relationships_created,
            "Homology run complete"
        );
        Ok(RunOutcome::Completed(report))
    }

    /// Run independent genomes in parallel. Results keep input order.
    pub fn run_many(&self, genome_refs: &[String]) -> Vec<(String, HomologyResult<RunOutcome>)> {
        genome_refs
            .par_iter()
            .map(|genome_ref| {
                let result = self.run(genome_ref);
                if let Err(e) = &result {
                    warn!(genome_ref = %genome_ref, error = %e, kind = e.kind(), "Homology run failed");
                }
                (genome_ref.clone(), result)
            })
            .collect()
    }

    /// Sum of the sink counters over every completed run
    pub fn total_updates(results: &[(String, HomologyResult<RunOutcome>)]) -> UpdateStats {
        let mut total = UpdateStats::default();
        for (_, result) in results {
            if let Ok(RunOutcome::Completed(report)) = result {
                total.merge(&report.update_stats);
            }
        }
        total
    }
}
