use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ProcessError;

#[derive(Debug, Clone)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Argument string appended after `args` exactly as written.
    ///
    /// `cmd.exe` does not understand the `\"` escapes produced when quoting
    /// individual arguments, so a shell line containing quoted paths has to
    /// reach it verbatim. Outside Windows it is passed as one argument.
    pub raw_args: Option<String>,
    pub working_dir: Option<PathBuf>,
}

impl ProcessCommand {
    /// Render the command line as the child process sees it.
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        if let Some(raw) = &self.raw_args {
            line.push(' ');
            line.push_str(raw);
        }
        line
    }
}

#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Error(i32),
    Signal(i32),
}

impl ExitStatus {
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Success)
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Success => write!(f, "exit code 0"),
            ExitStatus::Error(code) => write!(f, "exit code {code}"),
            ExitStatus::Signal(signal) => write!(f, "signal {signal}"),
        }
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError>;
}

/// Runs commands on the tokio runtime and buffers their output.
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    fn log_command_start(command: &ProcessCommand) {
        tracing::debug!("Executing subprocess: {}", command.display());

        if let Some(ref dir) = command.working_dir {
            tracing::trace!("Working directory: {:?}", dir);
        }
    }

    fn configure_command(command: &ProcessCommand) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args);

        if let Some(raw) = &command.raw_args {
            Self::append_raw_args(&mut cmd, raw);
        }

        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }

        cmd.stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped());
        cmd
    }

    #[cfg(windows)]
    fn append_raw_args(cmd: &mut tokio::process::Command, raw: &str) {
        cmd.raw_arg(raw);
    }

    #[cfg(not(windows))]
    fn append_raw_args(cmd: &mut tokio::process::Command, raw: &str) {
        cmd.arg(raw);
    }

    fn map_spawn_error(error: std::io::Error, command: &ProcessCommand) -> ProcessError {
        if error.kind() == std::io::ErrorKind::NotFound {
            ProcessError::CommandNotFound(command.program.clone())
        } else {
            tracing::error!(
                "Failed to spawn '{}': {:?} (kind: {:?})",
                command.program,
                error,
                error.kind()
            );
            ProcessError::SpawnFailed {
                command: command.display(),
                source: error,
            }
        }
    }

    fn parse_exit_status(status: std::process::ExitStatus) -> ExitStatus {
        if status.success() {
            ExitStatus::Success
        } else if let Some(code) = status.code() {
            ExitStatus::Error(code)
        } else {
            Self::parse_signal_status(status)
        }
    }

    #[cfg(unix)]
    fn parse_signal_status(status: std::process::ExitStatus) -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            ExitStatus::Signal(signal)
        } else {
            ExitStatus::Error(1)
        }
    }

    #[cfg(not(unix))]
    fn parse_signal_status(_status: std::process::ExitStatus) -> ExitStatus {
        ExitStatus::Error(1)
    }

    fn build_output(
        output: std::process::Output,
        status: ExitStatus,
        duration: Duration,
    ) -> ProcessOutput {
        ProcessOutput {
            status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration,
        }
    }

    fn log_result(result: &ProcessOutput, command: &ProcessCommand) {
        let command_str = command.display();

        match &result.status {
            ExitStatus::Success => {
                tracing::debug!(
                    "Subprocess completed successfully in {:?}: {}",
                    result.duration,
                    command_str
                );
                tracing::trace!("Stdout length: {} bytes", result.stdout.len());
                tracing::trace!("Stderr length: {} bytes", result.stderr.len());
            }
            ExitStatus::Error(code) => {
                tracing::debug!(
                    "Subprocess failed with exit code {} in {:?}: {}",
                    code,
                    result.duration,
                    command_str
                );
                if !result.stderr.is_empty() {
                    tracing::trace!("Stderr: {}", result.stderr);
                }
            }
            ExitStatus::Signal(signal) => {
                tracing::warn!(
                    "Subprocess terminated by signal {} in {:?}: {}",
                    signal,
                    result.duration,
                    command_str
                );
            }
        }
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        let start = std::time::Instant::now();

        Self::log_command_start(&command);

        let child = Self::configure_command(&command)
            .spawn()
            .map_err(|e| Self::map_spawn_error(e, &command))?;

        let output = child.wait_with_output().await?;

        let status = Self::parse_exit_status(output.status);
        let result = Self::build_output(output, status, start.elapsed());

        Self::log_result(&result, &command);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_command(program: &str, args: &[&str]) -> ProcessCommand {
        ProcessCommand {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            raw_args: None,
            working_dir: None,
        }
    }

    #[test]
    fn test_display_without_args() {
        assert_eq!(test_command("where", &[]).display(), "where");
    }

    #[test]
    fn test_display_with_args() {
        assert_eq!(
            test_command("sh", &["-c", "identify -version"]).display(),
            "sh -c identify -version"
        );
    }

    #[test]
    fn test_display_with_raw_args() {
        let mut command = test_command("cmd", &[]);
        command.raw_args = Some("/d /s /c \"\"C:\\IM 7\\magick.exe\" -version\"".to_string());
        assert_eq!(
            command.display(),
            "cmd /d /s /c \"\"C:\\IM 7\\magick.exe\" -version\""
        );
    }

    #[test]
    fn test_exit_status_display() {
        assert_eq!(ExitStatus::Success.to_string(), "exit code 0");
        assert_eq!(ExitStatus::Error(1).to_string(), "exit code 1");
        assert_eq!(ExitStatus::Signal(9).to_string(), "signal 9");
    }

    #[test]
    fn test_only_success_is_success() {
        assert!(ExitStatus::Success.success());
        assert!(!ExitStatus::Error(127).success());
        assert!(!ExitStatus::Signal(15).success());
    }

    #[test]
    #[cfg(unix)]
    fn test_parse_exit_status() {
        use std::os::unix::process::ExitStatusExt;

        let status = std::process::ExitStatus::from_raw(0);
        assert_eq!(
            TokioProcessRunner::parse_exit_status(status),
            ExitStatus::Success
        );

        // Exit code 1
        let status = std::process::ExitStatus::from_raw(256);
        assert_eq!(
            TokioProcessRunner::parse_exit_status(status),
            ExitStatus::Error(1)
        );

        // Killed by SIGKILL
        let status = std::process::ExitStatus::from_raw(9);
        assert_eq!(
            TokioProcessRunner::parse_exit_status(status),
            ExitStatus::Signal(9)
        );
    }

    #[test]
    fn test_map_spawn_error_not_found() {
        let command = test_command("nonexistent_command_12345", &[]);
        let error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        match TokioProcessRunner::map_spawn_error(error, &command) {
            ProcessError::CommandNotFound(program) => {
                assert_eq!(program, "nonexistent_command_12345")
            }
            other => panic!("Expected CommandNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_map_spawn_error_other() {
        let command = test_command("convert", &["a.png", "b.jpg"]);
        let error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        match TokioProcessRunner::map_spawn_error(error, &command) {
            ProcessError::SpawnFailed { command, .. } => {
                assert_eq!(command, "convert a.png b.jpg")
            }
            other => panic!("Expected SpawnFailed, got {other:?}"),
        }
    }
}
