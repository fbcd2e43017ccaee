/// Per-invocation scratch directories for aligner input and database files
use homology_core::{HomologyResult, ScratchConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A uniquely named directory under the configured scratch root.
///
/// Every invocation gets its own directory, so concurrent runs never share
/// file paths. The directory is removed when the workspace is dropped, unless
/// the invocation failed and `preserve_on_failure` is set.
#[derive(Debug)]
pub struct ScratchWorkspace {
    /// Unique identifier for this workspace
    pub id: String,
    /// Root path of this workspace
    pub root: PathBuf,
    preserve_on_failure: bool,
    failed: bool,
    removed: bool,
}

impl ScratchWorkspace {
    /// Create a fresh workspace named after `purpose`
    pub fn create(config: &ScratchConfig, purpose: &str) -> HomologyResult<Self> {
        fs::create_dir_all(&config.scratch_dir)?;

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let id = format!("{}_{}_{}", purpose, timestamp, Uuid::new_v4().simple());

        let root = config.scratch_dir.join(&id);
        fs::create_dir(&root)?;

        // Owned from here on, so a failed layout step still removes `root`
        let workspace = Self {
            id,
            root,
            preserve_on_failure: config.preserve_on_failure,
            failed: false,
            removed: false,
        };
        workspace.create_layout()?;

        debug!(workspace = %workspace.root.display(), "Created scratch workspace");
        Ok(workspace)
    }

    fn create_layout(&self) -> HomologyResult<()> {
        fs::create_dir(self.root.join("db"))?;
        Ok(())
    }

    pub fn query_fasta(&self) -> PathBuf {
        self.root.join("query.faa")
    }

    pub fn target_fasta(&self) -> PathBuf {
        self.root.join("target.faa")
    }

    /// Path prefix handed to the aligner's database builder
    pub fn database_prefix(&self) -> PathBuf {
        self.root.join("db").join("target")
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Record that the invocation using this workspace failed
    pub fn mark_failed(&mut self) {
        self.failed = true;
    }

    /// Remove the workspace directory now
    pub fn cleanup(&mut self) -> HomologyResult<()> {
        if self.removed {
            return Ok(());
        }
        if self.root.exists() {
            fs::remove_dir_all(&self.root)?;
        }
        self.removed = true;
        Ok(())
    }
}

impl Drop for ScratchWorkspace {
    fn drop(&mut self) {
        if self.failed && self.preserve_on_failure {
            info!(workspace = %self.root.display(), "Preserving scratch workspace of failed run");
            return;
        }
        if let Err(e) = self.cleanup() {
            warn!(workspace = %self.root.display(), error = %e, "Failed to remove scratch workspace");
        }
    }
}
