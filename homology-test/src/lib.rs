//! Test utilities for the homology workspace
//!
//! Provides isolated scratch environments, mock aligner executables and
//! small proteome fixtures shared by the crates' integration tests.

pub mod environment;
pub mod fixtures;
pub mod mock;

// Re-export commonly used items
pub use environment::TestEnvironment;
pub use fixtures::{panel_groups, sample_proteome, tabular_hit};
pub use mock::{install_blast_mock, install_failing_blast_mock, write_script};

// Re-export test dependencies for convenience
pub use anyhow::{Context, Result};
pub use tempfile;

/// Initialize test logging (call once per test module)
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Run a test with a clean environment
pub fn with_test_env<F, R>(f: F) -> Result<R>
where
    F: FnOnce(&TestEnvironment) -> Result<R>,
{
    let env = TestEnvironment::new()?;
    f(&env)
}
