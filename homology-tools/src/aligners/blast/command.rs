//! Command lines for the database-build and search steps of each tool

use crate::hit::HIT_COLUMNS;
use homology_core::{AlignerConfig, AlignerTool};
use std::path::Path;
use std::process::Command;

/// Command that builds a protein database at `db_prefix` from `fasta`
pub(crate) fn database_command(config: &AlignerConfig, fasta: &Path, db_prefix: &Path) -> Command {
    let mut cmd = Command::new(config.binary_path(config.tool.database_binary()));
    match config.tool {
        AlignerTool::Blast => {
            cmd.arg("-in")
                .arg(fasta)
                .arg("-dbtype")
                .arg("prot")
                .arg("-out")
                .arg(db_prefix);
        }
        AlignerTool::Diamond => {
            cmd.arg("makedb")
                .arg("--in")
                .arg(fasta)
                .arg("--db")
                .arg(db_prefix)
                .arg("--threads")
                .arg(config.threads.to_string())
                .arg("--quiet");
        }
    }
    cmd
}

/// Command that searches `query` against `db_prefix`, writing tabular hits to stdout
pub(crate) fn search_command(
    config: &AlignerConfig,
    query: &Path,
    db_prefix: &Path,
    max_evalue: &str,
) -> Command {
    let mut cmd = Command::new(config.binary_path(config.tool.search_binary()));
    match config.tool {
        AlignerTool::Blast => {
            cmd.arg("-query")
                .arg(query)
                .arg("-db")
                .arg(db_prefix)
                .arg("-outfmt")
                .arg(format!("6 {}", HIT_COLUMNS.join(" ")))
                .arg("-evalue")
                .arg(max_evalue)
                .arg("-num_threads")
                .arg(config.threads.to_string());
        }
        AlignerTool::Diamond => {
            cmd.arg("blastp")
                .arg("--query")
                .arg(query)
                .arg("--db")
                .arg(db_prefix)
                .arg("--outfmt")
                .arg("6")
                .args(HIT_COLUMNS)
                .arg("--evalue")
                .arg(max_evalue)
                .arg("--threads")
                .arg(config.threads.to_string())
                .arg("--quiet");
        }
    }
    cmd
}

/// Command that prints the tool version
pub(crate) fn version_command(config: &AlignerConfig) -> Command {
    let mut cmd = Command::new(config.binary_path(config.tool.search_binary()));
    match config.tool {
        AlignerTool::Blast => cmd.arg("-version"),
        AlignerTool::Diamond => cmd.arg("version"),
    };
    cmd
}
