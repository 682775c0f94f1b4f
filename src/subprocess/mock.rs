use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::error::ProcessError;
use super::runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner};

/// Scriptable [`ProcessRunner`] that records every command it receives.
///
/// Expectations are checked in registration order; the first one whose
/// program and matcher accept a command supplies the canned output.
#[derive(Clone, Default)]
pub struct MockProcessRunner {
    expectations: Arc<Mutex<Vec<Expectation>>>,
    history: Arc<Mutex<Vec<ProcessCommand>>>,
}

type ArgsMatcher = Box<dyn Fn(&[String]) -> bool + Send + Sync>;

enum Matcher {
    Any,
    Args(ArgsMatcher),
    /// Exact command line as rendered by [`ProcessCommand::display`].
    CommandLine(String),
}

impl Matcher {
    fn accepts(&self, command: &ProcessCommand) -> bool {
        match self {
            Matcher::Any => true,
            Matcher::Args(matcher) => matcher(&command.args),
            Matcher::CommandLine(line) => command.display() == *line,
        }
    }
}

struct Expectation {
    program: String,
    matcher: Matcher,
    response: ProcessOutput,
    calls: usize,
    limit: Option<usize>,
}

/// Pending expectation; registered with [`ExpectationBuilder::finish`].
pub struct ExpectationBuilder {
    runner: MockProcessRunner,
    expectation: Expectation,
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_command(&mut self, program: &str) -> ExpectationBuilder {
        ExpectationBuilder {
            runner: self.clone(),
            expectation: Expectation {
                program: program.to_string(),
                matcher: Matcher::Any,
                response: ProcessOutput {
                    status: ExitStatus::Success,
                    stdout: String::new(),
                    stderr: String::new(),
                    duration: Duration::ZERO,
                },
                calls: 0,
                limit: None,
            },
        }
    }

    pub fn verify_called(&self, program: &str, times: usize) -> bool {
        let history = self.history.lock().unwrap();
        history.iter().filter(|cmd| cmd.program == program).count() == times
    }

    pub fn get_call_history(&self) -> Vec<ProcessCommand> {
        self.history.lock().unwrap().clone()
    }

    /// Every received command rendered as one line, in call order.
    pub fn command_lines(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap()
            .iter()
            .map(ProcessCommand::display)
            .collect()
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        self.history.lock().unwrap().push(command.clone());

        let mut expectations = self.expectations.lock().unwrap();
        let expectation = expectations
            .iter_mut()
            .find(|e| e.program == command.program && e.matcher.accepts(&command))
            .ok_or_else(|| {
                ProcessError::MockExpectationNotMet(format!(
                    "No expectation found for command: {}",
                    command.display()
                ))
            })?;

        expectation.calls += 1;
        if let Some(limit) = expectation.limit {
            if expectation.calls > limit {
                return Err(ProcessError::MockExpectationNotMet(format!(
                    "Command '{}' called {} times, expected {}",
                    command.display(),
                    expectation.calls,
                    limit
                )));
            }
        }

        Ok(expectation.response.clone())
    }
}

impl ExpectationBuilder {
    pub fn with_args<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&[String]) -> bool + Send + Sync + 'static,
    {
        self.expectation.matcher = Matcher::Args(Box::new(matcher));
        self
    }

    /// Match only the command whose rendered line equals `line`, raw
    /// arguments included.
    pub fn with_command_line(mut self, line: &str) -> Self {
        self.expectation.matcher = Matcher::CommandLine(line.to_string());
        self
    }

    pub fn returns_stdout(mut self, stdout: &str) -> Self {
        self.expectation.response.stdout = stdout.to_string();
        self
    }

    pub fn returns_stderr(mut self, stderr: &str) -> Self {
        self.expectation.response.stderr = stderr.to_string();
        self
    }

    pub fn returns_exit_code(mut self, code: i32) -> Self {
        self.expectation.response.status = match code {
            0 => ExitStatus::Success,
            code => ExitStatus::Error(code),
        };
        self
    }

    pub fn returns_success(self) -> Self {
        self.returns_exit_code(0)
    }

    pub fn times(mut self, n: usize) -> Self {
        self.expectation.limit = Some(n);
        self
    }

    pub fn finish(self) {
        self.runner
            .expectations
            .lock()
            .unwrap()
            .push(self.expectation);
    }
}
