//! Aligner type definitions

use serde::{Deserialize, Serialize};

/// External protein aligners the pipeline knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlignerTool {
    /// NCBI BLAST+ (`makeblastdb` + `blastp`)
    #[default]
    Blast,
    /// DIAMOND (`diamond makedb` + `diamond blastp`)
    Diamond,
}

impl AlignerTool {
    pub fn name(&self) -> &'static str {
        match self {
            AlignerTool::Blast => "blast",
            AlignerTool::Diamond => "diamond",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AlignerTool::Blast => "BLAST+",
            AlignerTool::Diamond => "DIAMOND",
        }
    }

    /// Binary that builds the searchable database from a FASTA file
    pub fn database_binary(&self) -> &'static str {
        match self {
            AlignerTool::Blast => "makeblastdb",
            AlignerTool::Diamond => "diamond",
        }
    }

    /// Binary that runs the protein search
    pub fn search_binary(&self) -> &'static str {
        match self {
            AlignerTool::Blast => "blastp",
            AlignerTool::Diamond => "diamond",
        }
    }
}

impl std::fmt::Display for AlignerTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for AlignerTool {
    type Err = crate::HomologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blast" | "blastp" | "blast+" => Ok(AlignerTool::Blast),
            "diamond" => Ok(AlignerTool::Diamond),
            _ => Err(crate::HomologyError::Configuration(format!("Unknown aligner: {}", s))),
        }
    }
}
