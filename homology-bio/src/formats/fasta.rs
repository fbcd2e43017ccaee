use crate::sequence::SequenceSet;
use homology_core::{HomologyError, HomologyResult};
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::space1,
    combinator::{opt, rest},
    sequence::preceded,
    IResult,
};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::warn;

/// Residues per sequence line when writing
pub const LINE_WIDTH: usize = 80;

/// Parse a FASTA header line into identifier and optional description
fn parse_header(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    let (input, _) = tag(">")(input)?;
    let (input, id) = take_till(|c: char| c.is_whitespace())(input)?;
    let (input, description) = opt(preceded(space1, rest))(input)?;
    let description = description.map(str::trim).filter(|d| !d.is_empty());
    Ok((input, (id, description)))
}

/// Write a sequence set as FASTA, wrapping sequences at `LINE_WIDTH`
pub fn write_fasta<W: Write>(writer: &mut W, sequences: &SequenceSet) -> HomologyResult<()> {
    for (id, sequence) in sequences.iter() {
        writer.write_all(b">")?;
        writer.write_all(id.as_bytes())?;
        writer.write_all(b"\n")?;
        for line in sequence.as_bytes().chunks(LINE_WIDTH) {
            writer.write_all(line)?;
            writer.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// Write a sequence set to a FASTA file
pub fn write_fasta_file<P: AsRef<Path>>(path: P, sequences: &SequenceSet) -> HomologyResult<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_fasta(&mut writer, sequences)?;
    writer.flush()?;
    Ok(())
}

/// Read FASTA records into a sequence set.
///
/// The identifier is the first whitespace-delimited header token. Residue
/// lines are concatenated and upper-cased. Records without residues are
/// skipped with a warning.
pub fn parse_fasta<R: BufRead>(reader: R) -> HomologyResult<SequenceSet> {
    let mut sequences = SequenceSet::new();
    let mut current: Option<(String, String)> = None;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        let line_number = index + 1;

        if line.starts_with('>') {
            if let Some((id, seq)) = current.take() {
                push_record(&mut sequences, id, seq)?;
            }
            let (_, (id, _description)) = parse_header(line)
                .map_err(|e| HomologyError::parse(line_number, format!("invalid FASTA header: {}", e)))?;
            if id.is_empty() {
                return Err(HomologyError::parse(line_number, "FASTA header without identifier"));
            }
            current = Some((id.to_string(), String::new()));
        } else if line.trim().is_empty() {
            continue;
        } else {
            match current.as_mut() {
                Some((_, seq)) => seq.extend(
                    line.chars()
                        .filter(|c| !c.is_whitespace())
                        .map(|c| c.to_ascii_uppercase()),
                ),
                None => {
                    return Err(HomologyError::parse(
                        line_number,
                        "sequence data before the first FASTA header",
                    ))
                }
            }
        }
    }

    if let Some((id, seq)) = current.take() {
        push_record(&mut sequences, id, seq)?;
    }

    Ok(sequences)
}

fn push_record(sequences: &mut SequenceSet, id: String, seq: String) -> HomologyResult<()> {
    if seq.is_empty() {
        warn!(id = %id, "Skipping FASTA record without residues");
        return Ok(());
    }
    if sequences.insert(id.clone(), seq)?.is_some() {
        warn!(id = %id, "Duplicate FASTA identifier, keeping the later record");
    }
    Ok(())
}

/// Read a FASTA file into a sequence set
pub fn read_fasta_file<P: AsRef<Path>>(path: P) -> HomologyResult<SequenceSet> {
    let file = File::open(path.as_ref())?;
    parse_fasta(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_header() {
        let (remaining, (id, desc)) = parse_header(">gene1 DNA polymerase III").unwrap();
        assert_eq!(id, "gene1");
        assert_eq!(desc, Some("DNA polymerase III"));
        assert_eq!(remaining, "");

        let (_, (id, desc)) = parse_header(">F1|O1|TAXA").unwrap();
        assert_eq!(id, "F1|O1|TAXA");
        assert_eq!(desc, None);
    }

    #[test]
    fn test_write_wraps_long_sequences() {
        let long = "M".repeat(LINE_WIDTH + 5);
        let set = SequenceSet::new()
            .with("q1", &long)
            .unwrap()
            .with("q2", "MLA")
            .unwrap();

        let mut buffer = Vec::new();
        write_fasta(&mut buffer, &set).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let expected = format!(">q1\n{}\n{}\n>q2\nMLA\n", "M".repeat(LINE_WIDTH), "M".repeat(5));
        assert_eq!(text, expected);
    }

    #[test]
    fn test_parse_multiple_records() {
        let input = ">q1 first protein\nMKTAY\niakqr\n\n>q2\r\nMLA\r\n";
        let set = parse_fasta(input.as_bytes()).unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get("q1"), Some("MKTAYIAKQR"));
        assert_eq!(set.get("q2"), Some("MLA"));
    }

    #[test]
    fn test_parse_skips_empty_records() {
        let set = parse_fasta(">empty\n>q1\nMKT\n".as_bytes()).unwrap();
        assert_eq!(set.len(), 1);
        assert!(!set.contains("empty"));
    }

    #[test]
    fn test_parse_rejects_leading_sequence() {
        let err = parse_fasta("MKT\n>q1\nMKT\n".as_bytes()).unwrap_err();
        match err {
            HomologyError::Parse { line, .. } => assert_eq!(line, 1),
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_missing_identifier() {
        let err = parse_fasta(">q1\nMKT\n> desc only\nMLA\n".as_bytes()).unwrap_err();
        assert!(matches!(err, HomologyError::Parse { line: 3, .. }));
    }
}
