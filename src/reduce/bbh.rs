//! Bidirectional best hits between a query and a reference set
//!
//! Two maps are maintained while the stream is consumed: each query's best
//! hit and each target's best-scoring query. A pair is an ortholog pair when
//! both maps agree.

use homology_tools::{HitRecord, HitSink};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A mutually-best query/reference pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrthologPair {
    pub query_id: String,
    pub reference_id: String,
    pub hit: HitRecord,
}

#[derive(Debug, Default)]
pub struct BbhReducer {
    query_to_best: IndexMap<String, HitRecord>,
    target_to_best_query: IndexMap<String, (String, f64)>,
}

impl BbhReducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct queries with at least one hit
    pub fn query_count(&self) -> usize {
        self.query_to_best.len()
    }

    pub fn target_count(&self) -> usize {
        self.target_to_best_query.len()
    }

    pub fn best_hit_for_query(&self, query_id: &str) -> Option<&HitRecord> {
        self.query_to_best.get(query_id)
    }

    pub fn best_query_for_target(&self, target_id: &str) -> Option<&str> {
        self.target_to_best_query
            .get(target_id)
            .map(|(query_id, _)| query_id.as_str())
    }

    /// Mutually-best pairs, in order of each query's first appearance in the stream
    pub fn extract_pairs(&self) -> Vec<OrthologPair> {
        self.query_to_best
            .iter()
            .filter(|(query_id, hit)| {
                self.best_query_for_target(&hit.target_id) == Some(query_id.as_str())
            })
            .map(|(query_id, hit)| OrthologPair {
                query_id: query_id.clone(),
                reference_id: hit.target_id.clone(),
                hit: hit.clone(),
            })
            .collect()
    }
}

impl HitSink for BbhReducer {
    fn accept(&mut self, hit: HitRecord) {
        let bit_score = hit.bit_score;

        match self.target_to_best_query.get_mut(&hit.target_id) {
            Some(best) if bit_score > best.1 => *best = (hit.query_id.clone(), bit_score),
            Some(_) => {}
            None => {
                self.target_to_best_query
                    .insert(hit.target_id.clone(), (hit.query_id.clone(), bit_score));
            }
        }

        match self.query_to_best.get_mut(&hit.query_id) {
            Some(best) if bit_score > best.bit_score => *best = hit,
            Some(_) => {}
            None => {
                self.query_to_best.insert(hit.query_id.clone(), hit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homology_tools::testing::hit;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn reduce(hits: &[HitRecord]) -> BbhReducer {
        let mut reducer = BbhReducer::new();
        for h in hits {
            reducer.accept(h.clone());
        }
        reducer
    }

    fn pair_ids(pairs: &[OrthologPair]) -> Vec<(&str, &str)> {
        pairs
            .iter()
            .map(|p| (p.query_id.as_str(), p.reference_id.as_str()))
            .collect()
    }

    #[test]
    fn test_empty_stream_has_no_pairs() {
        let reducer = BbhReducer::new();
        assert!(reducer.extract_pairs().is_empty());
        assert_eq!(reducer.query_count(), 0);
        assert_eq!(reducer.target_count(), 0);
    }

    #[test]
    fn test_mutuality_required() {
        let reducer = reduce(&[hit("q1", "t1", 50.0), hit("q2", "t1", 80.0)]);

        assert_eq!(reducer.best_query_for_target("t1"), Some("q2"));
        assert_eq!(reducer.best_hit_for_query("q1").unwrap().target_id, "t1");
        assert_eq!(pair_ids(&reducer.extract_pairs()), vec![("q2", "t1")]);
    }

    #[test]
    fn test_maps_update_independently() {
        // q1's best target is t2, but t2 prefers q2; t1 still prefers q1
        let reducer = reduce(&[
            hit("q1", "t1", 40.0),
            hit("q1", "t2", 70.0),
            hit("q2", "t2", 90.0),
            hit("q2", "t3", 10.0),
        ]);

        assert_eq!(reducer.query_count(), 2);
        assert_eq!(reducer.target_count(), 3);
        assert_eq!(reducer.best_query_for_target("t1"), Some("q1"));
        assert_eq!(reducer.best_hit_for_query("q1").unwrap().target_id, "t2");
        assert_eq!(pair_ids(&reducer.extract_pairs()), vec![("q2", "t2")]);
    }

    #[test]
    fn test_ties_keep_first_seen_on_both_sides() {
        let reducer = reduce(&[
            hit("A", "X", 10.0),
            hit("A", "Y", 10.0),
            hit("B", "X", 10.0),
        ]);

        assert_eq!(reducer.best_hit_for_query("A").unwrap().target_id, "X");
        assert_eq!(reducer.best_query_for_target("X"), Some("A"));
        assert_eq!(pair_ids(&reducer.extract_pairs()), vec![("A", "X")]);
    }

    #[test]
    fn test_output_follows_first_appearance_of_query() {
        let reducer = reduce(&[
            hit("q3", "t3", 30.0),
            hit("q1", "t1", 10.0),
            hit("q2", "t2", 20.0),
            hit("q3", "t3", 35.0),
        ]);
        assert_eq!(
            pair_ids(&reducer.extract_pairs()),
            vec![("q3", "t3"), ("q1", "t1"), ("q2", "t2")]
        );
        assert_eq!(reducer.extract_pairs()[0].hit.bit_score, 35.0);
    }

    fn arb_hits() -> impl Strategy<Value = Vec<HitRecord>> {
        prop::collection::vec((0usize..5, 0usize..5, 0u32..10), 0..50).prop_map(|rows| {
            rows.into_iter()
                .map(|(q, t, score)| hit(&format!("q{}", q), &format!("t{}", t), score as f64))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_extraction_is_deterministic(hits in arb_hits()) {
            prop_assert_eq!(reduce(&hits).extract_pairs(), reduce(&hits).extract_pairs());
        }

        #[test]
        fn prop_pairs_are_mutually_maximal(hits in arb_hits()) {
            for pair in reduce(&hits).extract_pairs() {
                let from_query = hits
                    .iter()
                    .filter(|h| h.query_id == pair.query_id)
                    .map(|h| h.bit_score)
                    .fold(f64::NEG_INFINITY, f64::max);
                let from_target = hits
                    .iter()
                    .filter(|h| h.target_id == pair.reference_id)
                    .map(|h| h.bit_score)
                    .fold(f64::NEG_INFINITY, f64::max);
                prop_assert_eq!(pair.hit.bit_score, from_query);
                prop_assert_eq!(pair.hit.bit_score, from_target);
            }
        }

        #[test]
        fn prop_each_id_appears_at_most_once(hits in arb_hits()) {
            let pairs = reduce(&hits).extract_pairs();
            let mut targets: Vec<&str> = pairs.iter().map(|p| p.reference_id.as_str()).collect();
            targets.sort_unstable();
            targets.dedup();
            prop_assert_eq!(targets.len(), pairs.len());
        }
    }
}
