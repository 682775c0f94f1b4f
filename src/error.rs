use thiserror::Error;

use crate::subprocess::ProcessError;

/// Category of an [`ExecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The command string has no parameter section.
    Format,
    /// No usable launcher was found in the installation folder.
    Configuration,
    /// The tool failed without producing any standard output.
    Invocation,
    /// The subprocess layer itself failed.
    Process,
}

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("{message}")]
    Format { message: String },

    #[error("{message}")]
    Configuration { message: String },

    #[error("{message}")]
    Invocation {
        message: String,
        stdout: String,
        stderr: String,
    },

    #[error(transparent)]
    Process(#[from] ProcessError),
}

impl ExecError {
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn invocation(
        message: impl Into<String>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::Invocation {
            message: message.into(),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Format { .. } => ErrorKind::Format,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Invocation { .. } => ErrorKind::Invocation,
            Self::Process(_) => ErrorKind::Process,
        }
    }

    /// Standard output captured from the failed subprocess, if any.
    pub fn stdout(&self) -> Option<&str> {
        match self {
            Self::Invocation { stdout, .. } => Some(stdout),
            _ => None,
        }
    }

    /// Standard error captured from the failed subprocess, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Invocation { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExecError>;
