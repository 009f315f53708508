//! The seam between argument parsing and the work a command does.

use crate::error::Result;
use crate::ui::UserInterface;

/// Something `main` can run.
///
/// Errors abort with the error's own exit code; a returned
/// [`CommandResult`] carries the exit code of a run that finished.
pub trait Command {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// How a finished command wants the process to exit.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success() -> Self {
        Self { exit_code: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_exits_zero() {
        assert_eq!(CommandResult::success().exit_code, 0);
    }
}
