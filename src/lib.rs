//! Closest-reference selection and reciprocal best-hit orthologs
//!
//! A query proteome is first aligned against a small reference panel to pick
//! the closest reference genome, then against that genome's full proteome to
//! find bidirectional best hits.

pub mod collaborators;
pub mod export;
pub mod pipeline;
pub mod reduce;

pub use collaborators::{feature_guid, ortholog_guid_map, ProteomeSource, ReferenceSource, ResultSink, UpdateStats};
pub use export::{write_orthologs_tsv, TsvResultSink};
pub use pipeline::{ClosestReferenceSelector, HomologyRunner, OrthologPipeline, ReferenceSelection, RunOutcome, RunReport};
pub use reduce::{BbhReducer, BestHitReducer, OrthologPair};

pub use homology_core::{Config, HomologyError, HomologyResult};
