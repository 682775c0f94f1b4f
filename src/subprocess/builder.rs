use crate::subprocess::ProcessCommand;

/// Fluent construction of a [`ProcessCommand`].
pub struct ProcessCommandBuilder {
    command: ProcessCommand,
}

impl ProcessCommandBuilder {
    pub fn new(program: &str) -> Self {
        Self {
            command: ProcessCommand {
                program: program.to_string(),
                args: Vec::new(),
                raw_args: None,
                working_dir: None,
            },
        }
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.command.args.push(arg.to_string());
        self
    }

    /// Pass `raw` to the program without any per-argument quoting.
    pub fn raw_args(mut self, raw: impl Into<String>) -> Self {
        self.command.raw_args = Some(raw.into());
        self
    }

    pub fn build(self) -> ProcessCommand {
        self.command
    }
}
