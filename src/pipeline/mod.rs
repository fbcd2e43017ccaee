//! The two alignment stages and the run orchestration around them

pub mod closest_reference;
pub mod orthologs;
pub mod runner;

pub use closest_reference::{ClosestReferenceSelector, ReferenceSelection};
pub use orthologs::OrthologPipeline;
pub use runner::{HomologyRunner, RunOutcome, RunReport};
