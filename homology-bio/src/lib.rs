//! Sequence data model for the homology pipeline

pub mod formats;
pub mod sequence;

// Re-export commonly used types
pub use formats::{extract_reference_genome_id, CompositeId};
pub use formats::{parse_fasta, read_fasta_file, write_fasta, write_fasta_file};
pub use sequence::{build_reference_panel, GenomeFeature, PanelSequence, SequenceSet};
