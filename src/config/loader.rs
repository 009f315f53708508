//! Configuration file discovery and loading.

use crate::config::schema::ProvisionConfig;
use crate::error::{ProvisionError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the project configuration, relative to the project root.
pub const CONFIG_FILE_NAME: &str = ".pyboot.yml";

/// Path where the project configuration is expected.
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_FILE_NAME)
}

/// Load a single config file and parse it into ProvisionConfig.
///
/// # Errors
///
/// Returns `Io` if the file can't be read.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<ProvisionConfig> {
    let content = fs::read_to_string(path)?;
    parse_config(&content, path)
}

/// Parse YAML content into ProvisionConfig.
///
/// An empty document is treated as an empty mapping.
pub fn parse_config(content: &str, source_path: &Path) -> Result<ProvisionConfig> {
    if content.trim().is_empty() {
        return Ok(ProvisionConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| ProvisionError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load config with optional path override.
///
/// An explicit path must exist. Without one, `.pyboot.yml` in the project
/// root is used when present and defaults apply otherwise.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<ProvisionConfig> {
    if let Some(override_path) = config_override {
        tracing::debug!("Loading config from {}", override_path.display());
        return load_config_file(override_path);
    }

    let path = project_config_path(project_root);
    if path.is_file() {
        tracing::debug!("Loading config from {}", path.display());
        load_config_file(&path)
    } else {
        tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
        Ok(ProvisionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_project_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(temp.path(), None).unwrap();
        assert_eq!(config, ProvisionConfig::default());
    }

    #[test]
    fn project_config_is_loaded() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "dependencies:\n  extras: [all]\n",
        )
        .unwrap();

        let config = load_config(temp.path(), None).unwrap();
        assert_eq!(config.dependencies.extras, vec!["all".to_string()]);
    }

    #[test]
    fn override_path_wins() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "git:\n  hooks_path: project-hooks\n",
        )
        .unwrap();
        let custom = temp.path().join("custom.yml");
        fs::write(&custom, "git:\n  hooks_path: custom-hooks\n").unwrap();

        let config = load_config(temp.path(), Some(&custom)).unwrap();
        assert_eq!(config.git.hooks_path.as_deref(), Some("custom-hooks"));
    }

    #[test]
    fn missing_override_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = load_config(temp.path(), Some(&temp.path().join("nope.yml")));
        assert!(matches!(result, Err(ProvisionError::Io(_))));
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "dependencies: [unclosed").unwrap();

        let err = load_config(temp.path(), None).unwrap_err();
        match err {
            ProvisionError::ConfigParseError { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "\n").unwrap();

        let config = load_config(temp.path(), None).unwrap();
        assert_eq!(config, ProvisionConfig::default());
    }
}
