//! Configuration loading, parsing, and validation for pyboot.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use pyboot::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join(".pyboot.yml"), "dependencies:\n  extras: [test]\n").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.dependencies.extras, vec!["test".to_string()]);
//! ```
//!
//! # Configuration File Location
//!
//! `.pyboot.yml` in the project root, or any file passed with `--config`.
//! Without either, built-in defaults apply.

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{load_config, load_config_file, parse_config, project_config_path, CONFIG_FILE_NAME};
pub use schema::{
    DependencyConfig, GitConfig, ProvisionConfig, PythonConfig, SdistDependency, ToolchainConfig,
};
pub use validator::{validate, validate_config, ValidationError};
