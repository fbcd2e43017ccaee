//! External aligner implementations

pub mod blast;

pub use blast::BlastAligner;
