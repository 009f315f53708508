//! Command-line interface for pyboot.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{normalize_args, Cli};
pub use commands::{Command, CommandResult, ProvisionCommand};
