//! Subprocess execution with timeout and output capture.
//!
//! Both the checker and the drafting agent are external programs. This module
//! runs one of them to completion (or kills it when the timeout expires) and
//! hands back the raw exit code and captured streams. Callers decide what a
//! failure means for them.

use std::ffi::OsStr;
use std::io::{self, Read, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Initial poll interval while waiting for the child.
const POLL_START: Duration = Duration::from_millis(5);

/// Upper bound for the poll interval.
const POLL_MAX: Duration = Duration::from_millis(100);

/// Raw result of a finished subprocess.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Exit code of the process (None if it was terminated by a signal).
    pub exit_code: Option<i32>,
    /// Bytes written to stdout.
    pub stdout: Vec<u8>,
    /// Bytes written to stderr.
    pub stderr: Vec<u8>,
}

/// Reasons a subprocess could not be run to completion.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("'{program}' was not found; ensure it is installed and in PATH")]
    NotFound { program: String },

    #[error("failed to execute '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' did not finish within {} seconds and was killed", .timeout.as_secs())]
    TimedOut { program: String, timeout: Duration },

    #[error("failed to {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

/// Run `program args...` to completion, bounded by `timeout`.
///
/// stdin receives `input` (or is closed when `None`); stdout and stderr are
/// drained on their own threads so the child can never block on a full pipe.
pub fn run_with_timeout<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    input: Option<&[u8]>,
    timeout: Duration,
) -> Result<ProcessOutput, ProcessError> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let start = Instant::now();
    let mut child = command.spawn().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ProcessError::NotFound {
                program: program.to_string(),
            }
        } else {
            ProcessError::Spawn {
                program: program.to_string(),
                source: e,
            }
        }
    })?;

    let writer = match (child.stdin.take(), input) {
        (Some(stdin), Some(input)) => Some(feed(stdin, input.to_vec())),
        _ => None,
    };
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let timed_out = || ProcessError::TimedOut {
        program: program.to_string(),
        timeout,
    };

    let Some(exit_code) = wait_with_timeout(&mut child, timeout)? else {
        // Reader threads finish on their own once the killed child's pipes close.
        return Err(timed_out());
    };

    // A descendant of the child may still hold the pipes open, so collecting
    // output is bounded by the same deadline as the wait.
    let deadline = start + timeout;
    if let Some(writer) = writer {
        collect(writer, deadline, "write subprocess stdin")?.ok_or_else(timed_out)?;
    }
    let stdout = match stdout {
        Some(pipe) => collect(pipe, deadline, "read subprocess stdout")?.ok_or_else(timed_out)?,
        None => Vec::new(),
    };
    let stderr = match stderr {
        Some(pipe) => collect(pipe, deadline, "read subprocess stderr")?.ok_or_else(timed_out)?,
        None => Vec::new(),
    };

    Ok(ProcessOutput {
        exit_code,
        stdout,
        stderr,
    })
}

/// Wait for a child process with timeout.
///
/// Returns `Some(exit_code)` when the child exited, `None` when it was killed.
fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
) -> Result<Option<Option<i32>>, ProcessError> {
    let start = Instant::now();
    let mut poll_interval = POLL_START;

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status.code())),
            Ok(None) => {
                if start.elapsed() >= timeout {
                    kill_process(child);
                    return Ok(None);
                }
                thread::sleep(poll_interval);
                poll_interval = (poll_interval * 2).min(POLL_MAX);
            }
            Err(e) => {
                kill_process(child);
                return Err(ProcessError::Io {
                    context: "check process status".to_string(),
                    source: e,
                });
            }
        }
    }
}

/// Kill a process and reap it.
fn kill_process(child: &mut Child) {
    // On Unix this is SIGKILL; on Windows it is TerminateProcess.
    let _ = child.kill();
    let _ = child.wait();
}

/// Result of a pipe thread, delivered once the thread is done.
type PipeResult<T> = Receiver<io::Result<T>>;

fn drain<R: Read + Send + 'static>(mut pipe: R) -> PipeResult<Vec<u8>> {
    spawn_pipe_thread(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn feed<W: Write + Send + 'static>(mut pipe: W, input: Vec<u8>) -> PipeResult<()> {
    spawn_pipe_thread(move || {
        match pipe.write_all(&input) {
            // The child may exit without reading its input.
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
            other => other?,
        }
        drop(pipe);
        Ok(())
    })
}

fn spawn_pipe_thread<T, F>(work: F) -> PipeResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        // The receiver is gone when the caller already gave up on this pipe.
        let _ = tx.send(work());
    });
    rx
}

/// Wait for a pipe thread until `deadline`. `Ok(None)` means the deadline passed.
fn collect<T>(
    pipe: PipeResult<T>,
    deadline: Instant,
    context: &str,
) -> Result<Option<T>, ProcessError> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    match pipe.recv_timeout(remaining) {
        Ok(result) => result.map(Some).map_err(|e| ProcessError::Io {
            context: context.to_string(),
            source: e,
        }),
        Err(RecvTimeoutError::Timeout) => Ok(None),
        Err(RecvTimeoutError::Disconnected) => Err(ProcessError::Io {
            context: context.to_string(),
            source: io::Error::other("pipe thread panicked"),
        }),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn test_captures_both_streams_and_exit_code() {
        let output = run_with_timeout(
            "sh",
            &sh("echo out; echo err >&2; exit 3"),
            None,
            Duration::from_secs(10),
        )
        .unwrap();

        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout, b"out\n");
        assert_eq!(output.stderr, b"err\n");
    }

    #[test]
    fn test_feeds_stdin() {
        let output = run_with_timeout(
            "sh",
            &sh("cat"),
            Some(b"hello from stdin".as_slice()),
            Duration::from_secs(10),
        )
        .unwrap();

        assert_eq!(output.exit_code, Some(0));
        assert_eq!(output.stdout, b"hello from stdin");
    }

    #[test]
    fn test_large_output_does_not_deadlock() {
        // Far more than a pipe buffer on either stream.
        let output = run_with_timeout(
            "sh",
            &sh("i=0; while [ $i -lt 20000 ]; do echo line-$i; echo err-$i >&2; i=$((i+1)); done"),
            None,
            Duration::from_secs(60),
        )
        .unwrap();

        assert_eq!(output.exit_code, Some(0));
        assert_eq!(String::from_utf8(output.stdout).unwrap().lines().count(), 20000);
        assert_eq!(String::from_utf8(output.stderr).unwrap().lines().count(), 20000);
    }

    #[test]
    fn test_timeout_kills_process() {
        let start = Instant::now();
        let err = run_with_timeout("sh", &sh("exec sleep 10"), None, Duration::from_secs(1))
            .unwrap_err();

        assert!(matches!(err, ProcessError::TimedOut { .. }));
        assert!(start.elapsed() < Duration::from_secs(8));
    }

    #[test]
    fn test_background_descendant_cannot_outlive_timeout() {
        // The shell exits at once but `sleep` keeps stdout and stderr open.
        let start = Instant::now();
        let err = run_with_timeout("sh", &sh("sleep 8 & exit 0"), None, Duration::from_secs(1))
            .unwrap_err();

        assert!(matches!(err, ProcessError::TimedOut { .. }));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_missing_program_is_not_found() {
        let err = run_with_timeout(
            "nonexistent_program_xyz_123",
            &Vec::<String>::new(),
            None,
            Duration::from_secs(1),
        )
        .unwrap_err();

        assert!(matches!(err, ProcessError::NotFound { .. }));
        assert!(err.to_string().contains("nonexistent_program_xyz_123"));
    }

    #[test]
    fn test_signal_termination_has_no_exit_code() {
        let output =
            run_with_timeout("sh", &sh("kill -9 $$"), None, Duration::from_secs(10)).unwrap();
        assert_eq!(output.exit_code, None);
    }
}
