//! Process spawning behind a trait, so resolution and invocation can be
//! exercised without ImageMagick installed.

pub mod builder;
pub mod error;
pub mod mock;
pub mod runner;


pub use builder::ProcessCommandBuilder;
pub use error::ProcessError;
pub use mock::MockProcessRunner;
pub use runner::{
    ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner, TokioProcessRunner,
};

use std::sync::Arc;

/// Shared runner that spawns real processes.
pub fn system_runner() -> Arc<dyn ProcessRunner> {
    Arc::new(TokioProcessRunner)
}
