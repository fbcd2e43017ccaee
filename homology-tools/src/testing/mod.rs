//! In-process aligner doubles for pipeline tests

pub mod mock;

pub use mock::{hit, MockAligner, MockCall};
