//! Reference panel assembly
//!
//! The panel is a small set of marker sequences drawn from a handful of
//! ortholog groups. Each panel identifier records where the sequence came
//! from as `featureId|orthologGroupId|taxonomyId`, so a hit against it names
//! the reference genome directly.

use super::types::SequenceSet;
use crate::formats::composite_id::CompositeId;
use homology_core::HomologyResult;
use serde::{Deserialize, Serialize};

/// One member sequence of an ortholog group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSequence {
    pub feature_id: String,
    pub taxonomy_id: String,
    pub protein_sequence: String,
}

impl PanelSequence {
    pub fn new(
        feature_id: impl Into<String>,
        taxonomy_id: impl Into<String>,
        protein_sequence: impl Into<String>,
    ) -> Self {
        Self {
            feature_id: feature_id.into(),
            taxonomy_id: taxonomy_id.into(),
            protein_sequence: protein_sequence.into(),
        }
    }
}

/// Build the panel `SequenceSet` from ortholog groups and their members
pub fn build_reference_panel<I>(groups: I) -> HomologyResult<SequenceSet>
where
    I: IntoIterator<Item = (String, Vec<PanelSequence>)>,
{
    let mut panel = SequenceSet::new();
    for (group_id, members) in groups {
        for member in members {
            let id = CompositeId::new(&member.feature_id, &group_id, &member.taxonomy_id)?;
            panel.insert(id.encode(), member.protein_sequence)?;
        }
    }
    Ok(panel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use homology_core::HomologyError;

    #[test]
    fn test_build_reference_panel() {
        let panel = build_reference_panel(vec![
            (
                "KBHgp746131".to_string(),
                vec![
                    PanelSequence::new("F1", "TAXA", "MKVLAA"),
                    PanelSequence::new("F2", "TAXB", "MKVLSA"),
                ],
            ),
            (
                "KBHgp779288".to_string(),
                vec![PanelSequence::new("F3", "TAXA", "MSTNPK")],
            ),
        ])
        .unwrap();

        let ids: Vec<&str> = panel.ids().collect();
        assert_eq!(
            ids,
            vec![
                "F1|KBHgp746131|TAXA",
                "F2|KBHgp746131|TAXB",
                "F3|KBHgp779288|TAXA"
            ]
        );
        assert_eq!(panel.get("F3|KBHgp779288|TAXA"), Some("MSTNPK"));
    }

    #[test]
    fn test_panel_rejects_pipe_in_component() {
        let err = build_reference_panel(vec![(
            "G1".to_string(),
            vec![PanelSequence::new("F|1", "TAXA", "MKV")],
        )])
        .unwrap_err();
        assert!(matches!(err, HomologyError::InvalidInput(_)));
    }
}
