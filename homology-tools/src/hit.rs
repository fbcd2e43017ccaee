//! One row of tabular aligner output

use homology_core::{HomologyError, HomologyResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output columns requested from the aligner, in order
pub const HIT_COLUMNS: [&str; 12] = [
    "qseqid", "sseqid", "pident", "length", "mismatch", "gapopen", "qstart", "qend", "sstart",
    "send", "evalue", "bitscore",
];

/// A parsed alignment hit.
///
/// `bit_score` is the only ranking key. The e-value is kept as the tool
/// printed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRecord {
    pub query_id: String,
    pub target_id: String,
    pub percent_identity: f64,
    pub alignment_length: usize,
    pub mismatches: usize,
    pub gap_opens: usize,
    pub query_start: usize,
    pub query_end: usize,
    pub target_start: usize,
    pub target_end: usize,
    pub e_value: String,
    pub bit_score: f64,
}

impl HitRecord {
    /// Parse one tab-separated line with exactly `HIT_COLUMNS.len()` fields
    pub fn parse_line(line: &str, line_number: usize) -> HomologyResult<HitRecord> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != HIT_COLUMNS.len() {
            return Err(HomologyError::parse(
                line_number,
                format!(
                    "expected {} tab-separated fields, found {}",
                    HIT_COLUMNS.len(),
                    fields.len()
                ),
            ));
        }

        let text = |i: usize| -> HomologyResult<String> {
            let value = fields[i].trim();
            if value.is_empty() {
                return Err(HomologyError::parse(
                    line_number,
                    format!("empty {} field", HIT_COLUMNS[i]),
                ));
            }
            Ok(value.to_string())
        };
        let count = |i: usize| -> HomologyResult<usize> {
            fields[i].trim().parse::<usize>().map_err(|_| {
                HomologyError::parse(
                    line_number,
                    format!("non-numeric {} field '{}'", HIT_COLUMNS[i], fields[i]),
                )
            })
        };
        let real = |i: usize| -> HomologyResult<f64> {
            match fields[i].trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(v),
                _ => Err(HomologyError::parse(
                    line_number,
                    format!("non-numeric {} field '{}'", HIT_COLUMNS[i], fields[i]),
                )),
            }
        };

        // The e-value stays textual but must still be a number.
        let e_value = text(10)?;
        if e_value.parse::<f64>().is_err() {
            return Err(HomologyError::parse(
                line_number,
                format!("non-numeric evalue field '{}'", e_value),
            ));
        }

        Ok(HitRecord {
            query_id: text(0)?,
            target_id: text(1)?,
            percent_identity: real(2)?,
            alignment_length: count(3)?,
            mismatches: count(4)?,
            gap_opens: count(5)?,
            query_start: count(6)?,
            query_end: count(7)?,
            target_start: count(8)?,
            target_end: count(9)?,
            e_value,
            bit_score: real(11)?,
        })
    }

    /// Render the hit as an aligner would print it
    pub fn to_tabular_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.query_id,
            self.target_id,
            self.percent_identity,
            self.alignment_length,
            self.mismatches,
            self.gap_opens,
            self.query_start,
            self.query_end,
            self.target_start,
            self.target_end,
            self.e_value,
            self.bit_score
        )
    }
}

impl fmt::Display for HitRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} (bits={}, ident={}%, evalue={})",
            self.query_id, self.target_id, self.bit_score, self.percent_identity, self.e_value
        )
    }
}
