//! Driving external protein aligners
//!
//! This crate runs BLAST+ or DIAMOND against a pair of sequence sets and
//! delivers the tabular hits to a caller-supplied sink as they are produced.

// Modules
pub mod aligners;
pub mod hit;
pub mod stream;
pub mod testing;
pub mod traits;
pub mod workspace;

// Re-exports for convenience
pub use aligners::BlastAligner;
pub use hit::{HitRecord, HIT_COLUMNS};
pub use stream::{drain_into, HitStream};
pub use testing::MockAligner;
pub use traits::{Aligner, AlignmentStats, HitSink};
pub use workspace::ScratchWorkspace;
