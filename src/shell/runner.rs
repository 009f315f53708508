//! Step-oriented command runner shared by the host tool adapters.

use console::style;

use crate::error::{ProvisionError, Result};
use crate::ui::OutputMode;

use super::command::{display_command, execute, CommandOptions, CommandResult};

/// Runs external tools on behalf of provisioning steps.
///
/// Tool output streams straight to the terminal unless the run is quiet,
/// in which case it is captured and only surfaces, through the returned
/// error, when the command fails. Verbose runs also echo each command
/// (`+ cmd`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Runner {
    mode: OutputMode,
}

impl Runner {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    /// Run a command that must succeed.
    ///
    /// A non-zero exit becomes [`ProvisionError::InstallFailure`] tagged
    /// with `step` and carrying the captured output.
    pub fn run(
        &self,
        step: &str,
        program: &str,
        args: &[String],
        options: CommandOptions,
    ) -> Result<CommandResult> {
        let rendered = display_command(program, args);
        self.echo(&rendered);

        let capture = !self.mode.shows_command_output();
        let options = CommandOptions {
            capture_stdout: capture,
            capture_stderr: capture,
            ..options
        };

        let result = execute(program, args, &options)?;
        tracing::debug!(
            "{} -> {:?} in {:?}",
            rendered,
            result.exit_code,
            result.duration
        );

        if result.success {
            Ok(result)
        } else {
            Err(ProvisionError::InstallFailure {
                step: step.to_string(),
                command: rendered,
                code: result.exit_code,
                output: result.diagnostic_output().to_string(),
            })
        }
    }

    /// Run a read-only query, always capturing output.
    ///
    /// A non-zero exit is returned to the caller to interpret.
    pub fn query(
        &self,
        program: &str,
        args: &[String],
        options: CommandOptions,
    ) -> Result<CommandResult> {
        let rendered = display_command(program, args);
        self.echo(&rendered);

        let options = CommandOptions {
            capture_stdout: true,
            capture_stderr: true,
            ..options
        };

        let result = execute(program, args, &options)?;
        tracing::debug!("{} -> {:?}", rendered, result.exit_code);
        Ok(result)
    }

    fn echo(&self, rendered: &str) {
        if self.mode == OutputMode::Verbose {
            eprintln!("{}", style(format!("+ {}", rendered)).dim());
        }
    }
}
