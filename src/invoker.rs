//! Running ImageMagick commands end to end.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::error::{ExecError, Result};
use crate::resolver::Resolver;
use crate::split::split_command;
use crate::subprocess::ProcessRunner;

/// Captured output of a completed tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    pub stdout: String,
    pub stderr: String,
}

pub struct Invoker {
    resolver: Arc<Resolver>,
    runner: Arc<dyn ProcessRunner>,
    working_dir: Option<PathBuf>,
}

impl Invoker {
    pub fn new(resolver: Arc<Resolver>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            resolver,
            runner,
            working_dir: None,
        }
    }

    /// Run every command from `dir` instead of the current directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Execute `command`, e.g. `"convert in.png -resize 50% out.jpg"`.
    ///
    /// A failing tool that still wrote to stdout counts as success; only a
    /// failure with empty stdout becomes an invocation error.
    ///
    /// # Errors
    ///
    /// Returns a format error for a command without parameters, any
    /// resolution error, a process error if the shell cannot be spawned, and
    /// an invocation error when the tool fails without output.
    pub async fn execute(&self, command: &str) -> Result<InvocationResult> {
        let parsed = split_command(command)?;
        let resolved = self.resolver.resolve(&parsed.program).await?;

        let reconstructed =
            reconstruct_command(&parsed.program, &resolved, &parsed.parameters);
        debug!("Preparing to execute: {}", reconstructed);

        let mut shell = self.resolver.platform().shell_command(&reconstructed);
        shell.working_dir = self.working_dir.clone();

        let output = self.runner.run(shell).await?;
        trace!("status: {}", output.status);
        trace!("stdout: {}", output.stdout);
        trace!("stderr: {}", output.stderr);

        if !output.status.success() {
            if output.stdout.is_empty() {
                let underlying = match output.stderr.trim() {
                    "" => format!("Command failed with {}", output.status),
                    stderr => format!("Command failed with {}: {}", output.status, stderr),
                };
                return Err(ExecError::invocation(
                    format!(
                        "Failed to call '{command}', which was mapped to '{reconstructed}'. Error is '{underlying}'."
                    ),
                    output.stdout,
                    output.stderr,
                ));
            }

            // TODO: partial banners from a failed run can hide real errors;
            // expose the exit status on InvocationResult so callers can decide.
            warn!(
                "'{}' failed with {} but produced output, treating as success",
                reconstructed, output.status
            );
        }

        Ok(InvocationResult {
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Build the shell command line for a resolved program.
///
/// When the resolved file does not carry the tool name it is the unified
/// launcher, and the tool name becomes its first argument.
pub fn reconstruct_command(program: &str, resolved: &str, parameters: &str) -> String {
    if is_unified_launcher(program, resolved) {
        format!("\"{resolved}\" {} {parameters}", file_name(program))
    } else {
        format!("\"{resolved}\" {parameters}")
    }
}

fn is_unified_launcher(program: &str, resolved: &str) -> bool {
    if resolved == program {
        return false;
    }
    !file_name(resolved)
        .to_ascii_lowercase()
        .contains(&file_name(program).to_ascii_lowercase())
}

/// Last component of a path written with either separator.
fn file_name(path: &str) -> &str {
    path.rsplit(['\\', '/']).next().unwrap_or(path)
}
