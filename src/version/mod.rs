//! Interpreter version resolution.
//!
//! The project's minimum Python version is read from its metadata and
//! mapped through a [`PinTable`] to the exact release to install.
//!
//! # Example
//!
//! ```
//! use pyboot::version::{PinTable, VersionConstraint};
//!
//! let pinned = PinTable::default().resolve(&VersionConstraint::new("3.9")).unwrap();
//! assert_eq!(pinned.as_str(), "3.9.11");
//! ```

pub mod constraint;
pub mod pins;

pub use constraint::{extract_constraint, read_constraint, VersionConstraint};
pub use pins::{PinTable, PinnedVersion, DEFAULT_PINS};

use std::path::Path;

use crate::config::PythonConfig;
use crate::error::Result;

/// Resolve the interpreter release to provision for a project.
///
/// Fails with `ConstraintNotFound` when no metadata file declares a
/// minimum, and `UnsupportedVersion` when the declared minor has no pin.
pub fn resolve_version(project_root: &Path, config: &PythonConfig) -> Result<PinnedVersion> {
    let constraint = read_constraint(project_root, &config.metadata_files)?;
    let pinned = PinTable::with_overrides(&config.pins).resolve(&constraint)?;
    tracing::debug!("Resolved Python {} -> {}", constraint, pinned);
    Ok(pinned)
}
