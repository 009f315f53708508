//! Error types for pyboot operations.
//!
//! This module defines [`ProvisionError`], the primary error type used
//! throughout the provisioner, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `ProvisionError` for failures that abort the provisioning run
//! - Use `anyhow::Error` (via `ProvisionError::Other`) for unexpected errors
//! - A declined prompt is never an error; it is a branch of the workflow

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for provisioning operations.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The version manager is absent and was not (or could not be) installed.
    #[error("Version manager '{manager}' is not available: {message}")]
    ToolchainMissing { manager: String, message: String },

    /// The project's minimum Python version has no pinned release.
    #[error("Unsupported Python version '{constraint}' (supported: {supported})")]
    UnsupportedVersion {
        constraint: String,
        supported: String,
    },

    /// No metadata file declares a minimum Python version.
    #[error("No minimum Python version declared in project metadata under {path}")]
    ConstraintNotFound { path: PathBuf },

    /// An external tool ran and exited unsuccessfully.
    #[error("Step '{step}' failed: `{command}` exited with code {code:?}")]
    InstallFailure {
        step: String,
        command: String,
        code: Option<i32>,
        output: String,
    },

    /// An external tool could not be started at all.
    #[error("Command could not be started: {command}")]
    CommandFailed { command: String },

    /// `pip download` finished but left no source archive behind.
    #[error("No source distribution for '{requirement}' found in {dir}")]
    SdistNotFound { requirement: String, dir: PathBuf },

    /// The target directory exists but holds no usable interpreter.
    #[error("Virtual environment at {path} has no interpreter; re-run and accept replacement")]
    VirtualEnvBroken { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProvisionError {
    /// Process exit status for this error.
    ///
    /// A failed tool propagates its own exit status; everything else is 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InstallFailure {
                code: Some(code), ..
            } => u8::try_from(*code).ok().filter(|c| *c != 0).unwrap_or(1),
            _ => 1,
        }
    }

    /// Captured tool output, if the error came from a tool that produced any.
    pub fn command_output(&self) -> Option<(&str, &str)> {
        match self {
            Self::InstallFailure {
                command, output, ..
            } if !output.trim().is_empty() => Some((command.as_str(), output.as_str())),
            _ => None,
        }
    }
}

/// Result type alias for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisionError>;
