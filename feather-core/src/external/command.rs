//! Typed descriptors for external tool invocations.
//!
//! Every ffmpeg/ffprobe call in the pipeline is expressed as a [`ToolCommand`]
//! (program, arguments, accepted exit codes, deadline) and executed through a
//! [`ToolRunner`]. [`SystemRunner`] spawns real processes; tests substitute
//! their own runner to simulate the tools.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error};

use crate::error::{ToolError, command_failed_error, command_start_error, command_wait_error};

/// How often a running child is polled while a deadline is active.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Description of a single external tool invocation.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
    expected_exit_codes: Vec<i32>,
    timeout: Option<Duration>,
}

impl ToolCommand {
    /// Creates a command for `program` that expects exit code 0 and has no deadline.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            expected_exit_codes: vec![0],
            timeout: None,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Replaces the set of exit codes treated as success.
    #[must_use]
    pub fn expect_exit_codes(mut self, codes: &[i32]) -> Self {
        self.expected_exit_codes = codes.to_vec();
        self
    }

    /// Sets the deadline after which the process is killed.
    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Short name used in log lines and error messages (e.g. `ffmpeg`).
    pub fn tool_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    /// Returns true if `status` is one of the accepted exit codes.
    pub fn accepts(&self, status: ExitStatus) -> bool {
        status
            .code()
            .is_some_and(|code| self.expected_exit_codes.contains(&code))
    }

    /// Returns true if any argument contains `needle`.
    pub fn has_arg_containing(&self, needle: &str) -> bool {
        self.args
            .iter()
            .any(|a| a.to_string_lossy().contains(needle))
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.contains(' ') {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Something that can execute a [`ToolCommand`].
pub trait ToolRunner {
    /// Runs the command to completion (or until its deadline) and returns the
    /// captured output regardless of exit status.
    fn execute(&self, cmd: &ToolCommand) -> Result<ToolOutput, ToolError>;

    /// Runs the command and turns an unexpected exit status into
    /// [`ToolError::Failed`].
    fn run(&self, cmd: &ToolCommand) -> Result<ToolOutput, ToolError> {
        let output = self.execute(cmd)?;
        if cmd.accepts(output.status) {
            Ok(output)
        } else {
            let stderr = output.stderr_lossy();
            error!(
                "{} exited with {}: {}",
                cmd.tool_name(),
                output.status,
                last_lines(&stderr, 5)
            );
            Err(command_failed_error(cmd.tool_name(), output.status, stderr))
        }
    }
}

/// Runs tools as child processes of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn execute(&self, cmd: &ToolCommand) -> Result<ToolOutput, ToolError> {
        debug!("Running command: {cmd}");
        let tool = cmd.tool_name();

        let mut child = Command::new(cmd.program())
            .args(cmd.get_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| command_start_error(tool.clone(), e))?;

        // Drain both pipes on their own threads so a chatty child never blocks.
        let stdout_handle = child.stdout.take().map(spawn_reader);
        let stderr_handle = child.stderr.take().map(spawn_reader);

        let status = match cmd.get_timeout() {
            Some(timeout) => {
                let start = Instant::now();
                loop {
                    match child.try_wait() {
                        Ok(Some(status)) => break status,
                        Ok(None) if start.elapsed() >= timeout => {
                            error!("{tool} exceeded its {}s deadline, killing it", timeout.as_secs());
                            let _ = child.kill();
                            let _ = child.wait();
                            return Err(ToolError::Timeout {
                                tool,
                                after: timeout,
                            });
                        }
                        Ok(None) => thread::sleep(POLL_INTERVAL),
                        Err(e) => {
                            let _ = child.kill();
                            return Err(command_wait_error(tool, e));
                        }
                    }
                }
            }
            None => child.wait().map_err(|e| command_wait_error(tool.clone(), e))?,
        };

        let stdout = join_reader(stdout_handle);
        let stderr = join_reader(stderr_handle);
        debug!("{} finished with {}", cmd.tool_name(), status);

        Ok(ToolOutput {
            status,
            stdout,
            stderr,
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn join_reader(handle: Option<thread::JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Keeps the tail of a tool's stderr, which is where ffmpeg puts the reason.
pub(crate) fn last_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].join(" | ")
}
