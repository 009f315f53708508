//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. pyboot has a
//! single command, [`ProvisionCommand`].

pub mod command;
pub mod provision;

pub use command::{Command, CommandResult};
pub use provision::ProvisionCommand;
