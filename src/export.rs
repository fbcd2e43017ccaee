//! Tab-separated ortholog output

use homology_core::HomologyResult;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::collaborators::{ResultSink, UpdateStats};
use crate::reduce::OrthologPair;

/// Write one line per pair: query, reference, identity, query start, query
/// end, bit score
pub fn write_orthologs_tsv<W: Write>(writer: &mut W, pairs: &[OrthologPair]) -> HomologyResult<()> {
    for pair in pairs {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}",
            pair.query_id,
            pair.reference_id,
            pair.hit.percent_identity,
            pair.hit.query_start,
            pair.hit.query_end,
            pair.hit.bit_score
        )?;
    }
    Ok(())
}

/// Result sink that writes `<genome_ref>.bbhs` files into a directory
pub struct TsvResultSink {
    output_dir: PathBuf,
}

impl TsvResultSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Output path for a genome; path separators in the reference become `_`
    pub fn path_for(&self, genome_ref: &str) -> PathBuf {
        let name: String = genome_ref
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.output_dir.join(format!("{}.bbhs", name))
    }

    fn write(&self, path: &Path, pairs: &[OrthologPair]) -> HomologyResult<()> {
        fs::create_dir_all(&self.output_dir)?;
        let mut writer = BufWriter::new(File::create(path)?);
        write_orthologs_tsv(&mut writer, pairs)?;
        writer.flush()?;
        Ok(())
    }
}

impl ResultSink for TsvResultSink {
    fn store(
        &self,
        genome_ref: &str,
        reference_genome_id: &str,
        pairs: &[OrthologPair],
    ) -> anyhow::Result<UpdateStats> {
        let path = self.path_for(genome_ref);
        self.write(&path, pairs)?;
        info!(
            path = %path.display(),
            reference = reference_genome_id,
            pairs = pairs.len(),
            "Wrote ortholog pairs"
        );

        Ok(UpdateStats {
            relationships_created: pairs.len() as u64,
            ..UpdateStats::default()
        })
    }
}
