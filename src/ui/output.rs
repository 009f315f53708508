//! Output mode.

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Echo every command and stream tool output.
    Verbose,
    /// Show progress and stream tool output.
    #[default]
    Normal,
    /// Spinners and outcomes only. Tool output is captured and installers
    /// run with `-q`.
    Quiet,
}

impl OutputMode {
    /// Mode for the `--verbose` / `--quiet` flags. Verbose wins.
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    /// Check if this mode streams command output.
    pub fn shows_command_output(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }

    /// Check if this mode shows progress spinners.
    ///
    /// Only when output is captured; a spinner would redraw over streamed
    /// output.
    pub fn shows_spinners(&self) -> bool {
        !self.shows_command_output()
    }

    /// Check if this mode shows informational messages.
    pub fn shows_messages(&self) -> bool {
        !matches!(self, Self::Quiet)
    }
}
