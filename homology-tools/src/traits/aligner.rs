/// Traits for alignment tools and hit consumers
use crate::hit::HitRecord;
use homology_bio::SequenceSet;
use homology_core::HomologyResult;
use std::time::Duration;

/// Consumer of a hit stream.
///
/// Hits arrive in aligner output order, one call per record.
pub trait HitSink {
    fn accept(&mut self, hit: HitRecord);
}

impl<F: FnMut(HitRecord)> HitSink for F {
    fn accept(&mut self, hit: HitRecord) {
        self(hit)
    }
}

/// Summary of one aligner invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignmentStats {
    pub hits: usize,
    pub elapsed: Duration,
}

/// Trait for alignment tools
pub trait Aligner: Send + Sync {
    /// Align `query` against a database built from `target`, delivering every
    /// hit with e-value at most `max_evalue` to `sink` as it is produced.
    ///
    /// Either every output line parses and reaches the sink, or the call fails.
    fn align(
        &self,
        query: &SequenceSet,
        target: &SequenceSet,
        max_evalue: &str,
        sink: &mut dyn HitSink,
    ) -> HomologyResult<AlignmentStats>;

    /// Get tool version
    fn version(&self) -> HomologyResult<String>;

    /// Check if tool is available
    fn is_available(&self) -> bool;

    /// Name used in logs
    fn name(&self) -> &str {
        "aligner"
    }
}
