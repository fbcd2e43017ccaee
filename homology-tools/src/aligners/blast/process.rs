//! Supervised external process: stderr capture, cancellation and timeout

use crossbeam::channel::{self, RecvTimeoutError, Sender};
use homology_core::{CancellationToken, HomologyError, HomologyResult};
use parking_lot::Mutex;
use std::io::{ErrorKind, Read};
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A running child process watched by a background thread.
///
/// The child leads its own process group, so wrapper scripts and anything
/// they start are killed together. The watchdog kills the group when the
/// cancellation token fires or the timeout expires; the caller then sees
/// `Cancelled` instead of a tool error.
pub(crate) struct SupervisedProcess {
    label: String,
    child: Arc<Mutex<Child>>,
    stdout: Option<ChildStdout>,
    stderr_handle: Option<JoinHandle<String>>,
    watchdog_stop: Option<Sender<()>>,
    watchdog_handle: Option<JoinHandle<bool>>,
    finished: bool,
}

impl SupervisedProcess {
    /// Spawn `cmd`. stdout is piped only when `capture_stdout` is set.
    pub(crate) fn spawn(
        mut cmd: Command,
        label: &str,
        capture_stdout: bool,
        timeout: Option<Duration>,
        cancel: CancellationToken,
    ) -> HomologyResult<Self> {
        cmd.stdin(Stdio::null())
            .stdout(if capture_stdout { Stdio::piped() } else { Stdio::null() })
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        debug!(tool = label, command = ?cmd, "Starting external process");

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                HomologyError::aligner(
                    label,
                    format!("binary not found at {:?}", cmd.get_program()),
                )
            } else {
                HomologyError::aligner(label, format!("failed to start {:?}: {}", cmd.get_program(), e))
            }
        })?;

        let stdout = child.stdout.take();
        let stderr_handle = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut bytes = Vec::new();
                let _ = stderr.read_to_end(&mut bytes);
                String::from_utf8_lossy(&bytes).into_owned()
            })
        });

        let child = Arc::new(Mutex::new(child));
        let (stop_tx, stop_rx) = channel::bounded::<()>(1);
        let watched = Arc::clone(&child);
        let watched_label = label.to_string();
        let watchdog_handle = thread::spawn(move || {
            let started = Instant::now();
            loop {
                match stop_rx.recv_timeout(POLL_INTERVAL) {
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => return false,
                    Err(RecvTimeoutError::Timeout) => {
                        let expired = timeout.is_some_and(|limit| started.elapsed() > limit);
                        if cancel.is_cancelled() || expired {
                            if expired {
                                warn!(tool = %watched_label, "Aligner timed out, killing process");
                            } else {
                                debug!(tool = %watched_label, "Run cancelled, killing process");
                            }
                            kill_tree(&mut watched.lock());
                            return true;
                        }
                    }
                }
            }
        });

        Ok(Self {
            label: label.to_string(),
            child,
            stdout,
            stderr_handle,
            watchdog_stop: Some(stop_tx),
            watchdog_handle: Some(watchdog_handle),
            finished: false,
        })
    }

    pub(crate) fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.stdout.take()
    }

    /// Stop the watchdog; true if it killed the process
    fn stop_watchdog(&mut self) -> bool {
        if let Some(stop) = self.watchdog_stop.take() {
            let _ = stop.try_send(());
        }
        self.watchdog_handle
            .take()
            .map(|h| h.join().unwrap_or(false))
            .unwrap_or(false)
    }

    fn collect_stderr(&mut self) -> String {
        self.stderr_handle
            .take()
            .map(|h| h.join().unwrap_or_default())
            .unwrap_or_default()
    }

    /// Poll until the child exits while the watchdog keeps running
    fn wait_for_exit(&self) -> HomologyResult<ExitStatus> {
        loop {
            if let Some(status) = self.child.lock().try_wait()? {
                return Ok(status);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Wait for a normal exit. Returns the captured stderr on success.
    pub(crate) fn finish(mut self) -> HomologyResult<String> {
        // Close our end of stdout so a child blocked on a full pipe can exit
        drop(self.stdout.take());

        let status = self.wait_for_exit();
        let interrupted = self.stop_watchdog();
        let stderr = self.collect_stderr();
        self.finished = true;

        if interrupted {
            return Err(HomologyError::Cancelled);
        }
        let status = status?;
        if !status.success() {
            return Err(HomologyError::aligner(
                &self.label,
                format!("{}: {}", describe_status(&status), stderr.trim()),
            ));
        }
        Ok(stderr)
    }

    /// Kill the child and reap it. Returns true if the watchdog had
    /// already interrupted it.
    pub(crate) fn abort(&mut self) -> bool {
        if self.finished {
            return false;
        }
        drop(self.stdout.take());
        {
            let mut child = self.child.lock();
            kill_tree(&mut child);
            let _ = child.wait();
        }
        let interrupted = self.stop_watchdog();
        let _ = self.collect_stderr();
        self.finished = true;
        interrupted
    }
}

impl Drop for SupervisedProcess {
    fn drop(&mut self) {
        if !self.finished {
            self.abort();
        }
    }
}

/// Kill the child's process group, then the child itself
fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
        // SAFETY: killpg only sends a signal; the group was created at spawn
        unsafe {
            libc::killpg(pgid, libc::SIGKILL);
        }
    }
    let _ = child.kill();
}

fn describe_status(status: &ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("exited with code {}", code);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return match signal {
                9 => "killed by SIGKILL (possibly out of memory)".to_string(),
                11 => "crashed with SIGSEGV".to_string(),
                _ => format!("killed by signal {}", signal),
            };
        }
    }
    "terminated abnormally".to_string()
}
