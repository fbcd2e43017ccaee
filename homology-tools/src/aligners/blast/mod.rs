//! BLAST+/DIAMOND protein aligner
//!
//! Each call writes both sequence sets to a private scratch workspace, builds a
//! database from the target set, and runs the search with tabular output on
//! stdout. Hits are parsed and handed to the sink while the search runs.

mod command;
mod process;

use self::command::{database_command, search_command, version_command};
use self::process::SupervisedProcess;
use crate::stream::{drain_into, HitStream};
use crate::traits::{Aligner, AlignmentStats, HitSink};
use crate::workspace::ScratchWorkspace;
use homology_bio::{write_fasta_file, SequenceSet};
use homology_core::{
    AlignerConfig, CancellationToken, Config, HomologyError, HomologyResult, ScratchConfig,
};
use std::io::BufReader;
use std::process::Command;
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct BlastAligner {
    config: AlignerConfig,
    scratch: ScratchConfig,
    cancel: CancellationToken,
}

impl BlastAligner {
    pub fn new(config: AlignerConfig, scratch: ScratchConfig) -> Self {
        Self {
            config,
            scratch,
            cancel: CancellationToken::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.aligner.clone(), config.scratch.clone())
    }

    /// Share a cancellation token with the caller. Cancelling it kills any
    /// running aligner process and makes `align` return `Cancelled`.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    fn build_database(&self, workspace: &ScratchWorkspace) -> HomologyResult<()> {
        let cmd = database_command(
            &self.config,
            &workspace.target_fasta(),
            &workspace.database_prefix(),
        );
        let process = SupervisedProcess::spawn(
            cmd,
            self.config.tool.database_binary(),
            false,
            self.config.timeout(),
            self.cancel.clone(),
        )?;
        process.finish()?;
        debug!(database = %workspace.database_prefix().display(), "Built aligner database");
        Ok(())
    }

    fn search(
        &self,
        workspace: &ScratchWorkspace,
        max_evalue: &str,
        sink: &mut dyn HitSink,
    ) -> HomologyResult<usize> {
        let label = self.config.tool.search_binary();
        let cmd = search_command(
            &self.config,
            &workspace.query_fasta(),
            &workspace.database_prefix(),
            max_evalue,
        );
        let mut process = SupervisedProcess::spawn(
            cmd,
            label,
            true,
            self.config.timeout(),
            self.cancel.clone(),
        )?;
        let stdout = process
            .take_stdout()
            .ok_or_else(|| HomologyError::aligner(label, "search output was not captured"))?;

        match drain_into(HitStream::new(BufReader::new(stdout)), sink) {
            Ok(count) => {
                process.finish()?;
                Ok(count)
            }
            Err(e) => {
                // A killed process can leave a truncated final line
                if process.abort() {
                    Err(HomologyError::Cancelled)
                } else {
                    Err(e)
                }
            }
        }
    }

    fn run_in(
        &self,
        workspace: &ScratchWorkspace,
        query: &SequenceSet,
        target: &SequenceSet,
        max_evalue: &str,
        sink: &mut dyn HitSink,
    ) -> HomologyResult<usize> {
        write_fasta_file(workspace.query_fasta(), query)?;
        write_fasta_file(workspace.target_fasta(), target)?;

        self.build_database(workspace)?;
        self.cancel.check()?;
        self.search(workspace, max_evalue, sink)
    }
}

impl Aligner for BlastAligner {
    fn align(
        &self,
        query: &SequenceSet,
        target: &SequenceSet,
        max_evalue: &str,
        sink: &mut dyn HitSink,
    ) -> HomologyResult<AlignmentStats> {
        self.cancel.check()?;

        if query.is_empty() || target.is_empty() {
            debug!(
                queries = query.len(),
                targets = target.len(),
                "Empty input, skipping aligner"
            );
            return Ok(AlignmentStats::default());
        }

        let started = Instant::now();
        let mut workspace = ScratchWorkspace::create(&self.scratch, self.name())?;
        info!(
            tool = self.config.tool.display_name(),
            queries = query.len(),
            targets = target.len(),
            max_evalue,
            workspace = %workspace.id,
            "Running aligner"
        );

        let hits = match self.run_in(&workspace, query, target, max_evalue, sink) {
            Ok(hits) => hits,
            Err(e) => {
                workspace.mark_failed();
                warn!(tool = self.name(), error = %e, kind = e.kind(), "Aligner run failed");
                return Err(e);
            }
        };

        let stats = AlignmentStats {
            hits,
            elapsed: started.elapsed(),
        };
        info!(
            tool = self.config.tool.display_name(),
            hits = stats.hits,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "Aligner finished"
        );
        Ok(stats)
    }

    fn version(&self) -> HomologyResult<String> {
        let label = self.config.tool.search_binary();
        let output = version_command(&self.config)
            .output()
            .map_err(|e| HomologyError::aligner(label, format!("failed to query version: {}", e)))?;
        if !output.status.success() {
            return Err(HomologyError::aligner(
                label,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }

    fn is_available(&self) -> bool {
        if self.config.bin_dir.is_some() {
            let database = self.config.binary_path(self.config.tool.database_binary());
            let search = self.config.binary_path(self.config.tool.search_binary());
            return database.is_file() && search.is_file();
        }
        Command::new(self.config.tool.search_binary())
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn name(&self) -> &str {
        self.config.tool.name()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::hit::HitRecord;
    use homology_core::AlignerTool;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    const HIT_Q1_R1: &str = "q1\tr1\t95.0\t100\t5\t0\t1\t100\t1\t100\t1e-50\t120.0";
    const HIT_Q2_R2: &str = "q2\tr2\t80.0\t90\t18\t1\t1\t90\t3\t92\t2e-30\t95.5";

    fn write_script(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
    }

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new(search_body: &str) -> Self {
            let dir = TempDir::new().unwrap();
            fs::create_dir(dir.path().join("bin")).unwrap();
            write_script(&dir.path().join("bin"), "makeblastdb", "exit 0");
            write_script(&dir.path().join("bin"), "blastp", search_body);
            Self { dir }
        }

        fn bin(&self) -> PathBuf {
            self.dir.path().join("bin")
        }

        fn scratch(&self) -> PathBuf {
            self.dir.path().join("scratch")
        }

        fn aligner(&self) -> BlastAligner {
            let config = AlignerConfig {
                tool: AlignerTool::Blast,
                bin_dir: Some(self.bin()),
                threads: 1,
                ..AlignerConfig::default()
            };
            let scratch = ScratchConfig {
                scratch_dir: self.scratch(),
                preserve_on_failure: false,
            };
            BlastAligner::new(config, scratch)
        }

        fn scratch_entries(&self) -> usize {
            fs::read_dir(self.scratch()).map(|d| d.count()).unwrap_or(0)
        }
    }

    fn sets() -> (SequenceSet, SequenceSet) {
        let query = SequenceSet::new()
            .with("q1", "MKTAYIAKQR")
            .unwrap()
            .with("q2", "MSEEKLQRIA")
            .unwrap();
        let target = SequenceSet::new()
            .with("r1", "MKTAYIAKQR")
            .unwrap()
            .with("r2", "MSEEKLQRVA")
            .unwrap();
        (query, target)
    }

    #[test]
    fn test_hits_reach_sink_in_output_order() {
        let fixture = Fixture::new(&format!(
            "printf '# BLASTP\\n{}\\n{}\\n'",
            HIT_Q1_R1, HIT_Q2_R2
        ));
        let (query, target) = sets();
        let mut hits = Vec::new();
        let mut sink = |hit: HitRecord| hits.push(hit);

        let stats = fixture
            .aligner()
            .align(&query, &target, "1.0E-5", &mut sink)
            .unwrap();

        assert_eq!(stats.hits, 2);
        assert_eq!(hits[0].query_id, "q1");
        assert_eq!(hits[1].target_id, "r2");
        assert_eq!(hits[1].bit_score, 95.5);
        assert_eq!(fixture.scratch_entries(), 0);
    }

    #[test]
    fn test_arguments_and_input_files() {
        // Echo the evalue argument back as a hit so the test can see it
        let fixture = Fixture::new(
            r#"while [ "$#" -gt 0 ]; do
  case "$1" in
    -query) query="$2"; shift 2 ;;
    -evalue) evalue="$2"; shift 2 ;;
    *) shift ;;
  esac
done
grep -q '^>q1$' "$query" || exit 9
printf 'q1\tr1\t99.0\t10\t0\t0\t1\t10\t1\t10\t%s\t50.0\n' "$evalue""#,
        );
        let (query, target) = sets();
        let mut evalues = Vec::new();
        let mut sink = |hit: HitRecord| evalues.push(hit.e_value);

        fixture
            .aligner()
            .align(&query, &target, "0.001", &mut sink)
            .unwrap();
        assert_eq!(evalues, vec!["0.001"]);
    }

    #[test]
    fn test_empty_input_skips_aligner() {
        let fixture = Fixture::new("exit 1");
        let (query, _) = sets();
        let mut count = 0;
        let mut sink = |_hit: HitRecord| count += 1;

        let stats = fixture
            .aligner()
            .align(&query, &SequenceSet::new(), "1.0E-5", &mut sink)
            .unwrap();
        assert_eq!(stats, AlignmentStats::default());
        assert!(!fixture.scratch().exists());
    }

    #[test]
    fn test_nonzero_exit_reports_stderr() {
        let fixture = Fixture::new("echo 'BLAST Database error: No alias or index file found' >&2\nexit 2");
        let (query, target) = sets();
        let mut sink = |_hit: HitRecord| {};

        let err = fixture
            .aligner()
            .align(&query, &target, "1.0E-5", &mut sink)
            .unwrap_err();
        match err {
            HomologyError::AlignerFailure { tool, message } => {
                assert_eq!(tool, "blastp");
                assert!(message.contains("exited with code 2"));
                assert!(message.contains("No alias or index file found"));
            }
            other => panic!("Expected AlignerFailure, got {:?}", other),
        }
        assert_eq!(fixture.scratch_entries(), 0);
    }

    #[test]
    fn test_database_failure_stops_before_search() {
        let fixture = Fixture::new(&format!("printf '{}\\n'", HIT_Q1_R1));
        write_script(&fixture.bin(), "makeblastdb", "echo 'bad fasta' >&2\nexit 1");
        let (query, target) = sets();
        let mut count = 0;
        let mut sink = |_hit: HitRecord| count += 1;

        let err = fixture
            .aligner()
            .align(&query, &target, "1.0E-5", &mut sink)
            .unwrap_err();
        assert!(matches!(err, HomologyError::AlignerFailure { ref tool, .. } if tool == "makeblastdb"));
        assert_eq!(count, 0);
    }

    #[test]
    fn test_missing_binary() {
        let fixture = Fixture::new("exit 0");
        fs::remove_file(fixture.bin().join("blastp")).unwrap();
        let (query, target) = sets();
        let mut sink = |_hit: HitRecord| {};

        let err = fixture
            .aligner()
            .align(&query, &target, "1.0E-5", &mut sink)
            .unwrap_err();
        match err {
            HomologyError::AlignerFailure { message, .. } => {
                assert!(message.contains("binary not found"))
            }
            other => panic!("Expected AlignerFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_output_is_parse_error() {
        let fixture = Fixture::new(&format!("printf '{}\\nq2\\tr2\\t80.0\\n'", HIT_Q1_R1));
        let (query, target) = sets();
        let mut count = 0;
        let mut sink = |_hit: HitRecord| count += 1;

        let err = fixture
            .aligner()
            .align(&query, &target, "1.0E-5", &mut sink)
            .unwrap_err();
        assert!(matches!(err, HomologyError::Parse { line: 2, .. }));
        assert_eq!(count, 1);
        assert_eq!(fixture.scratch_entries(), 0);
    }

    #[test]
    fn test_failed_run_preserved_when_configured() {
        let fixture = Fixture::new("exit 3");
        let (query, target) = sets();
        let mut aligner = fixture.aligner();
        aligner.scratch.preserve_on_failure = true;
        let mut sink = |_hit: HitRecord| {};

        assert!(aligner.align(&query, &target, "1.0E-5", &mut sink).is_err());
        assert_eq!(fixture.scratch_entries(), 1);
    }

    #[test]
    fn test_hits_stream_before_process_exits() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("first-hit-seen");
        // Second hit is only printed once the sink has seen the first one
        let fixture = Fixture::new(&format!(
            "printf '{}\\n'\ni=0\nwhile [ ! -f '{}' ]; do\n  i=$((i+1))\n  [ \"$i\" -gt 100 ] && exit 7\n  sleep 0.1\ndone\nprintf '{}\\n'",
            HIT_Q1_R1,
            marker.display(),
            HIT_Q2_R2
        ));
        let (query, target) = sets();
        let mut seen = Vec::new();
        let mut sink = |hit: HitRecord| {
            if seen.is_empty() {
                fs::write(&marker, b"").unwrap();
            }
            seen.push(hit.target_id);
        };

        let stats = fixture
            .aligner()
            .align(&query, &target, "1.0E-5", &mut sink)
            .unwrap();
        assert_eq!(stats.hits, 2);
        assert_eq!(seen, vec!["r1", "r2"]);
    }

    #[test]
    fn test_cancellation_kills_running_search() {
        let fixture = Fixture::new("exec sleep 30");
        let (query, target) = sets();
        let token = CancellationToken::new();
        let aligner = fixture.aligner().with_cancellation(token.clone());

        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(300));
            token.cancel();
        });

        let started = Instant::now();
        let mut sink = |_hit: HitRecord| {};
        let err = aligner.align(&query, &target, "1.0E-5", &mut sink).unwrap_err();
        canceller.join().unwrap();

        assert!(matches!(err, HomologyError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(fixture.scratch_entries(), 0);
    }

    #[test]
    fn test_cancelled_before_start() {
        let fixture = Fixture::new("exit 0");
        let (query, target) = sets();
        let aligner = fixture.aligner();
        aligner.cancellation_token().cancel();
        let mut sink = |_hit: HitRecord| {};

        let err = aligner.align(&query, &target, "1.0E-5", &mut sink).unwrap_err();
        assert!(matches!(err, HomologyError::Cancelled));
        assert!(!fixture.scratch().exists());
    }

    #[test]
    fn test_timeout_is_reported_as_cancelled() {
        let fixture = Fixture::new("exec sleep 30");
        let (query, target) = sets();
        let mut aligner = fixture.aligner();
        aligner.config.timeout_seconds = Some(1);
        let mut sink = |_hit: HitRecord| {};

        let started = Instant::now();
        let err = aligner.align(&query, &target, "1.0E-5", &mut sink).unwrap_err();
        assert!(matches!(err, HomologyError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_timeout_kills_wrapper_children() {
        let fixture = Fixture::new(&format!("sleep 30\nprintf '{}\\n'", HIT_Q1_R1));
        let (query, target) = sets();
        let mut aligner = fixture.aligner();
        aligner.config.timeout_seconds = Some(1);
        let mut seen = 0usize;
        let mut sink = |_hit: HitRecord| seen += 1;

        let started = Instant::now();
        let err = aligner.align(&query, &target, "1.0E-5", &mut sink).unwrap_err();
        assert!(matches!(err, HomologyError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(seen, 0);
    }

    #[test]
    fn test_cancellation_kills_wrapper_children() {
        let fixture = Fixture::new("sleep 30\nexit 0");
        let (query, target) = sets();
        let token = CancellationToken::new();
        let aligner = fixture.aligner().with_cancellation(token.clone());

        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(300));
            token.cancel();
        });

        let started = Instant::now();
        let mut sink = |_hit: HitRecord| {};
        let err = aligner.align(&query, &target, "1.0E-5", &mut sink).unwrap_err();
        canceller.join().unwrap();

        assert!(matches!(err, HomologyError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(fixture.scratch_entries(), 0);
    }

    #[test]
    fn test_version_and_availability() {
        let fixture = Fixture::new(
            "if [ \"$1\" = \"-version\" ]; then\n  echo 'blastp: 2.14.0+'\n  echo ' Package: blast 2.14.0'\nfi",
        );
        let aligner = fixture.aligner();
        assert!(aligner.is_available());
        assert_eq!(aligner.version().unwrap(), "blastp: 2.14.0+");
        assert_eq!(aligner.name(), "blast");

        fs::remove_file(fixture.bin().join("makeblastdb")).unwrap();
        assert!(!aligner.is_available());
    }
}
