//! pyboot - Python development environment provisioning.
//!
//! pyboot turns a fresh checkout into a working Python development
//! environment: it resolves the interpreter version the project declares,
//! installs it through pyenv, creates a virtual environment, installs the
//! project's dependencies, and configures git.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`host`] - External tools (pyenv, pip, git, tar) behind traits
//! - [`provision`] - The provisioning workflow
//! - [`shell`] - Shell command execution
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//! - [`version`] - Version constraint extraction and pinning
//!
//! # Example
//!
//! ```
//! use pyboot::version::{PinTable, VersionConstraint};
//!
//! let pins = PinTable::default();
//! let pinned = pins.resolve(&VersionConstraint::new("3.9")).unwrap();
//! assert_eq!(pinned.as_str(), "3.9.11");
//! ```
//!
//! For full runs against scripted tools, see the integration tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod provision;
pub mod shell;
pub mod ui;
pub mod version;

pub use error::{ProvisionError, Result};
