//! Best single hit across a whole hit stream

use homology_core::{HomologyError, HomologyResult};
use homology_tools::{HitRecord, HitSink};

/// Keeps the highest-scoring hit seen.
///
/// A later hit replaces the current one only if its bit score is strictly
/// greater, so the first of several equal-scoring hits is kept.
#[derive(Debug, Default)]
pub struct BestHitReducer {
    best: Option<HitRecord>,
    seen: usize,
}

impl BestHitReducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once at least one hit has been accepted
    pub fn found(&self) -> bool {
        self.best.is_some()
    }

    pub fn best_hit(&self) -> Option<&HitRecord> {
        self.best.as_ref()
    }

    pub fn best_target_id(&self) -> HomologyResult<&str> {
        self.best
            .as_ref()
            .map(|hit| hit.target_id.as_str())
            .ok_or_else(|| HomologyError::NotFound("no hit was accepted".to_string()))
    }

    /// Number of hits consumed
    pub fn hits_seen(&self) -> usize {
        self.seen
    }

    pub fn into_best_hit(self) -> Option<HitRecord> {
        self.best
    }
}

impl HitSink for BestHitReducer {
    fn accept(&mut self, hit: HitRecord) {
        self.seen += 1;
        let replace = match &self.best {
            None => true,
            Some(current) => hit.bit_score > current.bit_score,
        };
        if replace {
            self.best = Some(hit);
        }
    }
}
