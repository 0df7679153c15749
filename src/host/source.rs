use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

/// Upper bound on how long a key source may run a system command
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

/// One strategy for finding a stable host identifier
pub trait KeySource {
    /// Short label used in logs and in `KeyOrigin::Platform`
    fn name(&self) -> &'static str;

    /// Look for an identifier. Any failure is reported as `None` so the
    /// resolver can move on to the next source.
    fn probe(&self) -> Option<String>;
}

/// Run `program` with `args` and return its stdout as text.
///
/// Returns `None` if the program can't be started, exits unsuccessfully,
/// prints non-UTF-8 output, or if the whole call (waiting for the child and
/// collecting its output) takes longer than `timeout`. A child still running
/// at the deadline is killed.
pub fn run_command(program: &str, args: &[&str], timeout: Duration) -> Option<String> {
    let deadline = Instant::now() + timeout;
    let mut child = match Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            tracing::debug!("failed to run {}: {}", program, e);
            return None;
        }
    };

    // Drain stdout on a separate thread so a chatty child can't block on a
    // full pipe while we wait for it. Processes the child leaves behind may
    // keep the pipe open, so the output is collected with a deadline too.
    let mut stdout = child.stdout.take()?;
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = tx.send(stdout.read_to_end(&mut buf).map(|_| buf));
    });

    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            tracing::debug!("{} did not finish within {:?}, killing it", program, timeout);
            let _ = child.kill();
            let _ = child.wait();
            return None;
        }
        Err(e) => {
            tracing::debug!("failed to wait for {}: {}", program, e);
            return None;
        }
    };

    let remaining = deadline.saturating_duration_since(Instant::now());
    let output = match rx.recv_timeout(remaining) {
        Ok(Ok(buf)) => buf,
        Ok(Err(e)) => {
            tracing::debug!("failed to read output of {}: {}", program, e);
            return None;
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            tracing::debug!("output of {} still open after {:?}", program, timeout);
            return None;
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => return None,
    };

    if !status.success() {
        tracing::debug!("{} exited with {}", program, status);
        return None;
    }

    match String::from_utf8(output) {
        Ok(text) => Some(text),
        Err(_) => {
            tracing::debug!("{} produced non-UTF-8 output", program);
            None
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_none() {
        assert_eq!(
            run_command("trinomial-no-such-program", &[], DEFAULT_COMMAND_TIMEOUT),
            None
        );
    }

    #[test]
    fn test_captures_stdout() {
        let out = run_command("sh", &["-c", "echo hello"], DEFAULT_COMMAND_TIMEOUT);
        assert_eq!(out.as_deref(), Some("hello\n"));
    }

    #[test]
    fn test_failing_exit_status_is_none() {
        assert_eq!(run_command("sh", &["-c", "echo x; exit 3"], DEFAULT_COMMAND_TIMEOUT), None);
    }

    #[test]
    fn test_timeout_kills_child() {
        let started = Instant::now();
        let out = run_command("sleep", &["10"], Duration::from_millis(200));
        assert_eq!(out, None);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_timeout_covers_leftover_background_process() {
        let started = Instant::now();
        let out = run_command("sh", &["-c", "sleep 4 & echo hi"], Duration::from_millis(200));
        assert_eq!(out, None);
        assert!(
            started.elapsed() < Duration::from_secs(2),
            "background process holding stdout should not outlast the timeout"
        );
    }
}
