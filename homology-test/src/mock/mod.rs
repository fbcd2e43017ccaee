//! Mock implementations of external tools

pub mod scripts;

pub use scripts::{install_blast_mock, install_failing_blast_mock, write_script};
