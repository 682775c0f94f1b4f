//! Platform family detection and the platform-specific command forms.

use crate::subprocess::{ProcessCommand, ProcessCommandBuilder};

/// The two platform families that resolve executables differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    /// Detect the platform family this binary was built for.
    pub fn detect() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Command that runs `command_line` through the platform shell.
    ///
    /// On Windows the line goes to `cmd /d /s /c` verbatim inside one pair of
    /// quotes, which `/s` strips again, so quoted paths survive intact.
    pub fn shell_command(&self, command_line: &str) -> ProcessCommand {
        match self {
            Platform::Windows => ProcessCommandBuilder::new("cmd")
                .raw_args(format!("/d /s /c \"{command_line}\""))
                .build(),
            Platform::Unix => ProcessCommandBuilder::new("sh")
                .arg("-c")
                .arg(command_line)
                .build(),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Windows => write!(f, "windows"),
            Platform::Unix => write!(f, "unix"),
        }
    }
}
