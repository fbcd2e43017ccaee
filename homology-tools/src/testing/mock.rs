//! Mock aligner backed by a fixed hit table

use crate::hit::HitRecord;
use crate::traits::{Aligner, AlignmentStats, HitSink};
use homology_bio::SequenceSet;
use homology_core::{HomologyError, HomologyResult};
use parking_lot::Mutex;

/// One recorded `align` invocation
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub query_ids: Vec<String>,
    pub target_ids: Vec<String>,
    pub max_evalue: String,
}

/// Aligner that replays a canned hit table instead of running a tool.
///
/// Only hits whose query is in the query set and whose target is in the
/// target set are delivered, in table order, and hits above the e-value
/// cutoff are dropped, so one table can serve several pipeline stages.
#[derive(Debug, Default)]
pub struct MockAligner {
    hits: Vec<HitRecord>,
    failure: Option<String>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockAligner {
    pub fn new(hits: Vec<HitRecord>) -> Self {
        Self {
            hits,
            failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with an `AlignerFailure` carrying `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Aligner for MockAligner {
    fn align(
        &self,
        query: &SequenceSet,
        target: &SequenceSet,
        max_evalue: &str,
        sink: &mut dyn HitSink,
    ) -> HomologyResult<AlignmentStats> {
        self.calls.lock().push(MockCall {
            query_ids: query.ids().map(str::to_string).collect(),
            target_ids: target.ids().map(str::to_string).collect(),
            max_evalue: max_evalue.to_string(),
        });

        if let Some(message) = &self.failure {
            return Err(HomologyError::aligner("mock", message.clone()));
        }

        let cutoff: f64 = max_evalue
            .trim()
            .parse()
            .map_err(|_| HomologyError::InvalidInput(format!("Invalid e-value: {}", max_evalue)))?;

        let mut delivered = 0;
        for hit in &self.hits {
            if !query.contains(&hit.query_id) || !target.contains(&hit.target_id) {
                continue;
            }
            if hit.e_value.parse::<f64>().map_or(false, |e| e > cutoff) {
                continue;
            }
            sink.accept(hit.clone());
            delivered += 1;
        }

        Ok(AlignmentStats {
            hits: delivered,
            ..AlignmentStats::default()
        })
    }

    fn version(&self) -> HomologyResult<String> {
        Ok("MockAligner 1.0.0".to_string())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Hit fixture with the given bit score and otherwise plausible columns
pub fn hit(query_id: &str, target_id: &str, bit_score: f64) -> HitRecord {
    HitRecord {
        query_id: query_id.to_string(),
        target_id: target_id.to_string(),
        percent_identity: 90.0,
        alignment_length: 100,
        mismatches: 10,
        gap_opens: 0,
        query_start: 1,
        query_end: 100,
        target_start: 1,
        target_end: 100,
        e_value: "1e-30".to_string(),
        bit_score,
    }
}
