//! Minor → micro version pinning.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ProvisionError, Result};

use super::constraint::VersionConstraint;

/// Built-in pins: the interpreter release installed for each supported minor.
pub const DEFAULT_PINS: &[(&str, &str)] = &[
    ("3.7", "3.7.13"),
    ("3.8", "3.8.13"),
    ("3.9", "3.9.11"),
    ("3.10", "3.10.4"),
];

/// A fully specified interpreter version (e.g. "3.9.11").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PinnedVersion(String);

impl PinnedVersion {
    /// Wrap a full version string.
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    /// The version string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PinnedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lookup table from minor versions to pinned releases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinTable {
    pins: BTreeMap<String, String>,
}

impl Default for PinTable {
    fn default() -> Self {
        Self {
            pins: DEFAULT_PINS
                .iter()
                .map(|(minor, micro)| (minor.to_string(), micro.to_string()))
                .collect(),
        }
    }
}

impl PinTable {
    /// Built-in table with project overrides applied on top.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut table = Self::default();
        for (minor, micro) in overrides {
            table.pins.insert(minor.clone(), micro.clone());
        }
        table
    }

    /// Supported minor versions, in numeric order.
    pub fn supported(&self) -> Vec<&str> {
        let mut minors: Vec<&str> = self.pins.keys().map(String::as_str).collect();
        minors.sort_by_key(|m| minor_sort_key(m));
        minors
    }

    /// Resolve a constraint to its pinned release.
    ///
    /// # Errors
    ///
    /// `UnsupportedVersion` when the minor has no pin.
    pub fn resolve(&self, constraint: &VersionConstraint) -> Result<PinnedVersion> {
        self.pins
            .get(constraint.minor())
            .map(|micro| PinnedVersion::new(micro.clone()))
            .ok_or_else(|| ProvisionError::UnsupportedVersion {
                constraint: constraint.minor().to_string(),
                supported: self.supported().join(", "),
            })
    }
}

fn minor_sort_key(minor: &str) -> (u32, u32) {
    let mut parts = minor.split('.').map(|p| p.parse::<u32>().unwrap_or(0));
    (parts.next().unwrap_or(0), parts.next().unwrap_or(0))
}
