//! Test environment management
//!
//! Provides isolated directories for scratch files, mock binaries and run
//! output, removed automatically when the environment is dropped.

use anyhow::{Context, Result};
use homology_core::{AlignerConfig, AlignerTool, Config, ScratchConfig};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test environment with automatic cleanup
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::with_prefix("homology-test")
            .context("Failed to create temporary directory")?;

        std::fs::create_dir_all(temp_dir.path().join("bin"))?;
        std::fs::create_dir_all(temp_dir.path().join("scratch"))?;
        std::fs::create_dir_all(temp_dir.path().join("output"))?;

        Ok(Self { temp_dir })
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Directory mock aligner binaries are installed into
    pub fn bin_dir(&self) -> PathBuf {
        self.root().join("bin")
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.root().join("scratch")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root().join("output")
    }

    /// Number of scratch workspaces currently left on disk
    pub fn scratch_entries(&self) -> usize {
        std::fs::read_dir(self.scratch_dir())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    /// Config pointing the aligner at this environment's binaries and scratch
    pub fn config(&self) -> Config {
        Config {
            aligner: AlignerConfig {
                tool: AlignerTool::Blast,
                bin_dir: Some(self.bin_dir()),
                threads: 1,
                ..AlignerConfig::default()
            },
            scratch: ScratchConfig {
                scratch_dir: self.scratch_dir(),
                preserve_on_failure: false,
            },
            ..Config::default()
        }
    }
}
