//! External process execution
//!
//! Everything nvprobe learns about the GPUs comes from running other
//! programs. [`CommandRunner`] is the seam between the probe and the OS so
//! tests can script the vendor tool's output.

use std::process::Command;

use tracing::trace;

use crate::error::{NvprobeError, Result};

/// Captured result of one process invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub status: Option<i32>,
    /// Standard output, decoded as UTF-8 (lossy)
    pub stdout: String,
    /// Standard error, decoded as UTF-8 (lossy)
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Convert a non-zero exit into [`NvprobeError::CommandFailed`]
    pub fn check(self, program: &str) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(NvprobeError::CommandFailed {
                program: program.to_string(),
                code: self.status,
                stderr: self.stderr,
            })
        }
    }
}

/// Runs external programs to completion
pub trait CommandRunner {
    /// Run `program` with `args`, blocking until it exits
    ///
    /// An `Err` means the process could not be started; a process that ran
    /// and failed is reported through [`CommandOutput::status`].
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        (**self).run(program, args)
    }
}

/// Runs programs on the host via `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        trace!("Running {} {:?}", program, args);

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| NvprobeError::Spawn {
                program: program.to_string(),
                source,
            })?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
