//! Shared type definitions

pub mod aligner;

pub use aligner::AlignerTool;
