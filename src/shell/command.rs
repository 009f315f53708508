//! External command execution.

use crate::error::{ProvisionError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output (empty unless captured).
    pub stdout: String,

    /// Standard error (empty unless captured).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Captured stderr, falling back to stdout when stderr is empty.
    pub fn diagnostic_output(&self) -> &str {
        if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with the inherited environment).
    pub env: Vec<(String, String)>,

    /// Inherited variables to drop before spawning.
    pub env_remove: Vec<String>,

    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,
}

impl CommandOptions {
    /// Options that capture both output streams.
    pub fn captured() -> Self {
        Self {
            capture_stdout: true,
            capture_stderr: true,
            ..Default::default()
        }
    }

    /// Set the working directory.
    pub fn in_dir(mut self, cwd: &Path) -> Self {
        self.cwd = Some(cwd.to_path_buf());
        self
    }

    /// Add an environment variable.
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    /// Drop an inherited environment variable.
    pub fn without_env(mut self, key: &str) -> Self {
        self.env_remove.push(key.to_string());
        self
    }
}

/// Render a program and its arguments the way a user would type them.
pub fn display_command(program: &str, args: &[String]) -> String {
    let mut parts = Vec::with_capacity(args.len() + 1);
    parts.push(quote_arg(program));
    parts.extend(args.iter().map(|a| quote_arg(a)));
    parts.join(" ")
}

fn quote_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }
    if arg
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '$' | '&' | '|' | ';' | '*'))
    {
        format!("'{}'", arg.replace('\'', r"'\''"))
    } else {
        arg.to_string()
    }
}

/// Execute a program with arguments, without going through a shell.
///
/// A non-zero exit is reported in the [`CommandResult`], not as an error.
/// Only a failure to start the process is an error.
pub fn execute(program: &str, args: &[String], options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    for key in &options.env_remove {
        cmd.env_remove(key);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    if options.capture_stdout {
        cmd.stdout(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
    }

    if options.capture_stderr {
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stderr(Stdio::inherit());
    }

    let output = cmd.output().map_err(|e| {
        tracing::debug!("Failed to spawn {}: {}", program, e);
        ProvisionError::CommandFailed {
            command: display_command(program, args),
        }
    })?;

    let duration = start.elapsed();

    let stdout = if options.capture_stdout {
        String::from_utf8_lossy(&output.stdout).to_string()
    } else {
        String::new()
    };

    let stderr = if options.capture_stderr {
        String::from_utf8_lossy(&output.stderr).to_string()
    } else {
        String::new()
    };

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn display_command_plain_args() {
        let rendered = display_command("pip", &args(&["install", "-e", "."]));
        assert_eq!(rendered, "pip install -e .");
    }

    #[test]
    fn display_command_quotes_spaces_and_specials() {
        let rendered = display_command("git", &args(&["config", "user.name", "Ada Lovelace"]));
        assert_eq!(rendered, "git config user.name 'Ada Lovelace'");
        assert_eq!(display_command("sh", &args(&["-c", ""])), "sh -c ''");
        assert_eq!(
            display_command("echo", &args(&["it's"])),
            r"echo 'it'\''s'"
        );
    }

    #[test]
    fn diagnostic_output_prefers_stderr() {
        let result = CommandResult::failure(
            Some(1),
            "out".to_string(),
            "err".to_string(),
            Duration::ZERO,
        );
        assert_eq!(result.diagnostic_output(), "err");

        let result =
            CommandResult::failure(Some(1), "out".to_string(), String::new(), Duration::ZERO);
        assert_eq!(result.diagnostic_output(), "out");
    }

    #[test]
    fn options_builder_accumulates() {
        let options = CommandOptions::captured()
            .with_env("PYENV_VERSION", "3.9.11")
            .without_env("VIRTUAL_ENV");
        assert!(options.capture_stdout && options.capture_stderr);
        assert_eq!(
            options.env,
            vec![("PYENV_VERSION".to_string(), "3.9.11".to_string())]
        );
        assert_eq!(options.env_remove, vec!["VIRTUAL_ENV".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn execute_successful_command() {
        let result = execute("sh", &args(&["-c", "echo hello"]), &CommandOptions::captured())
            .unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn execute_failing_command() {
        let result = execute("sh", &args(&["-c", "exit 3"]), &CommandOptions::captured())
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn execute_with_env_and_removal() {
        let options = CommandOptions::captured()
            .with_env("MY_VAR", "my_value")
            .without_env("HOME");
        let result = execute("sh", &args(&["-c", "echo $MY_VAR:${HOME:-unset}"]), &options)
            .unwrap();

        assert!(result.success);
        assert!(result.stdout.contains("my_value:unset"));
    }

    #[cfg(unix)]
    #[test]
    fn execute_with_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let options = CommandOptions::captured().in_dir(temp.path());

        let result = execute("pwd", &[], &options).unwrap();

        assert!(result.success);
        let name = temp.path().file_name().unwrap().to_string_lossy();
        assert!(result.stdout.contains(name.as_ref()));
    }

    #[test]
    fn execute_missing_program_is_an_error() {
        let result = execute(
            "pyboot-definitely-not-a-real-program",
            &[],
            &CommandOptions::captured(),
        );
        assert!(matches!(
            result,
            Err(ProvisionError::CommandFailed { .. })
        ));
    }
}
