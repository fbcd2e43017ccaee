pub mod composite_id;
pub mod fasta;

pub use composite_id::{extract_reference_genome_id, CompositeId};
pub use fasta::{parse_fasta, read_fasta_file, write_fasta, write_fasta_file};
