//! Configuration schema definitions for pyboot.
//!
//! This module contains the struct definitions that map to the
//! `.pyboot.yml` file format. Every section is optional; an absent
//! file is equivalent to `ProvisionConfig::default()`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration structure for `.pyboot.yml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    /// Interpreter version resolution
    pub python: PythonConfig,

    /// Version manager installation
    pub toolchain: ToolchainConfig,

    /// Dependency installation
    pub dependencies: DependencyConfig,

    /// Version control settings
    pub git: GitConfig,
}

/// Where the minimum Python version is read from and how it is pinned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PythonConfig {
    /// Metadata files searched in order, relative to the project root
    pub metadata_files: Vec<PathBuf>,

    /// Extra or overriding minor → micro pins (e.g. "3.11": "3.11.4")
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub pins: BTreeMap<String, String>,
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            metadata_files: vec![
                PathBuf::from("setup.py"),
                PathBuf::from("setup.cfg"),
                PathBuf::from("pyproject.toml"),
            ],
            pins: BTreeMap::new(),
        }
    }
}

/// How to install the version manager when it is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Shell command that installs pyenv, replacing package manager detection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_command: Option<String>,
}

/// What gets installed into the virtual environment, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyConfig {
    /// Packages whose requirements are only declared in their sdist
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sdist: Vec<SdistDependency>,

    /// Development requirements file, relative to the project root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_requirements: Option<PathBuf>,

    /// Extras for the editable project install
    pub extras: Vec<String>,

    /// In-repo test plugin installed in editable mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_plugin: Option<PathBuf>,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            sdist: Vec::new(),
            dev_requirements: Some(PathBuf::from("requirements-dev.txt")),
            extras: vec!["dev".to_string()],
            test_plugin: None,
        }
    }
}

/// A third-party package installed through its source distribution's
/// requirements file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdistDependency {
    /// pip requirement specifier (e.g. "somepkg==1.2.0")
    pub requirement: String,

    /// Requirements file inside the extracted sdist
    #[serde(default = "default_requirements_file")]
    pub requirements_file: PathBuf,
}

fn default_requirements_file() -> PathBuf {
    PathBuf::from("requirements.txt")
}

/// Git identity and hook settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Offer to set user.name / user.email when missing
    pub configure_identity: bool,

    /// Value for the repository's core.hooksPath (None leaves it alone)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hooks_path: Option<String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            configure_identity: true,
            hooks_path: Some(".githooks".to_string()),
        }
    }
}
