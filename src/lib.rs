//! # magick-exec
//!
//! Resolve and invoke ImageMagick command-line tools the same way on every
//! platform.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use magick_exec::{subprocess, Invoker, Resolver, SearchSettings};
//!
//! # async fn run() -> magick_exec::Result<()> {
//! let runner = subprocess::system_runner();
//! let resolver = Arc::new(Resolver::detect(SearchSettings::default(), Arc::clone(&runner)));
//! let invoker = Invoker::new(resolver, runner);
//!
//! let result = invoker.execute("identify -version").await?;
//! println!("{}", result.stdout);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - `split` - Splitting a command string into program and parameters
//! - `resolver` - Platform-aware executable resolution with memoization
//! - `invoker` - Command reconstruction, execution and outcome classification
//! - `platform` - Platform family detection and shell invocation
//! - `subprocess` - Subprocess abstraction layer for testing
//! - `config` - Configuration file and environment overrides
pub mod config;
pub mod error;
pub mod invoker;
pub mod platform;
pub mod resolver;
pub mod split;
pub mod subprocess;

pub use error::{ErrorKind, ExecError, Result};
pub use invoker::{reconstruct_command, InvocationResult, Invoker};
pub use platform::Platform;
pub use resolver::{ResolutionCache, ResolveStrategy, Resolver, SearchSettings};
pub use split::{split_command, ParsedCommand};
