//! Test fixtures
//!
//! A tiny query proteome and a two-genome reference panel whose hits make
//! the closest-reference choice unambiguous.

use homology_bio::{GenomeFeature, PanelSequence};

/// Query genome features; `g3` is non-coding and never reaches the aligner
pub fn sample_proteome() -> Vec<GenomeFeature> {
    vec![
        GenomeFeature::new("q1")
            .with_translation("MKTAYIAKQRQISFVKSHFSRQ")
            .with_function("DNA gyrase subunit B"),
        GenomeFeature::new("q2")
            .with_translation("MSEEKLQRIAELLKEAGVDVSS")
            .with_function("RNA polymerase sigma factor"),
        GenomeFeature::new("g3").with_function("tRNA-Ala"),
    ]
}

/// Panel members keyed by ortholog group, spanning taxa `TAXA` and `TAXB`
pub fn panel_groups() -> Vec<(String, Vec<PanelSequence>)> {
    vec![
        (
            "O1".to_string(),
            vec![PanelSequence::new("F1", "TAXA", "MKTAYIAKQRQISFVKSHFSRQ")],
        ),
        (
            "O2".to_string(),
            vec![PanelSequence::new("F2", "TAXB", "MSEEKLQRIAELLKEAGVDVAS")],
        ),
    ]
}

/// One line of 12-column tabular aligner output
pub fn tabular_hit(query_id: &str, target_id: &str, bit_score: f64) -> String {
    format!(
        "{}\t{}\t90.00\t100\t10\t0\t1\t100\t1\t100\t1e-30\t{}",
        query_id, target_id, bit_score
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_shapes() {
        let proteome = sample_proteome();
        assert_eq!(proteome.iter().filter(|f| f.is_coding()).count(), 2);
        assert_eq!(panel_groups().len(), 2);
        assert_eq!(tabular_hit("q1", "r1", 120.0).split('\t').count(), 12);
    }
}
