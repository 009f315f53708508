//! Configuration validation rules.
//!
//! - Pin keys must be `major.minor`; values `major.minor.micro` of that minor
//! - At least one metadata file must be searched
//! - sdist requirements must be non-empty
//! - Extras must be bare names

use crate::config::schema::ProvisionConfig;
use crate::error::{ProvisionError, Result};
use regex::Regex;
use std::sync::LazyLock;

static MINOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+$").expect("valid minor regex"));
static MICRO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("valid micro regex"));
static EXTRA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("valid extra regex"));

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            message,
        }
    }
}

/// Validate a configuration and return all errors.
///
/// Collects every problem rather than stopping at the first one.
pub fn validate_config(config: &ProvisionConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_python(config));
    errors.extend(validate_dependencies(config));

    errors
}

fn validate_python(config: &ProvisionConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.python.metadata_files.is_empty() {
        errors.push(ValidationError::new(
            "no-metadata-files",
            "python.metadata_files must list at least one file".to_string(),
        ));
    }

    for (minor, micro) in &config.python.pins {
        if !MINOR_RE.is_match(minor) {
            errors.push(ValidationError::new(
                "invalid-pin-key",
                format!("Pin key '{}' must look like '3.9'", minor),
            ));
            continue;
        }
        if !MICRO_RE.is_match(micro) || !micro.starts_with(&format!("{}.", minor)) {
            errors.push(ValidationError::new(
                "invalid-pin-value",
                format!(
                    "Pin '{}' must map to a full {}.N release, got '{}'",
                    minor, minor, micro
                ),
            ));
        }
    }

    errors
}

fn validate_dependencies(config: &ProvisionConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (idx, dep) in config.dependencies.sdist.iter().enumerate() {
        if dep.requirement.trim().is_empty() {
            errors.push(ValidationError::new(
                "empty-sdist-requirement",
                format!("dependencies.sdist[{}] has an empty requirement", idx),
            ));
        }
        if dep.requirements_file.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "empty-sdist-requirements-file",
                format!("dependencies.sdist[{}] has an empty requirements_file", idx),
            ));
        }
    }

    for extra in &config.dependencies.extras {
        if !EXTRA_RE.is_match(extra) {
            errors.push(ValidationError::new(
                "invalid-extra",
                format!("Extra '{}' is not a valid extra name", extra),
            ));
        }
    }

    errors
}

/// Validate config, returning the first failure as an error.
pub fn validate(config: &ProvisionConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(ProvisionError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::SdistDependency;
    use std::path::PathBuf;

    fn rules(config: &ProvisionConfig) -> Vec<String> {
        validate_config(config).into_iter().map(|e| e.rule).collect()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&ProvisionConfig::default()).is_ok());
    }

    #[test]
    fn well_formed_pin_is_valid() {
        let mut config = ProvisionConfig::default();
        config
            .python
            .pins
            .insert("3.11".to_string(), "3.11.4".to_string());
        assert!(rules(&config).is_empty());
    }

    #[test]
    fn pin_key_must_be_minor() {
        let mut config = ProvisionConfig::default();
        config
            .python
            .pins
            .insert("3".to_string(), "3.11.4".to_string());
        assert_eq!(rules(&config), vec!["invalid-pin-key"]);
    }

    #[test]
    fn pin_value_must_belong_to_minor() {
        let mut config = ProvisionConfig::default();
        config
            .python
            .pins
            .insert("3.11".to_string(), "3.10.4".to_string());
        config
            .python
            .pins
            .insert("3.12".to_string(), "3.12".to_string());
        assert_eq!(rules(&config), vec!["invalid-pin-value", "invalid-pin-value"]);
    }

    #[test]
    fn pin_value_prefix_is_not_fooled_by_longer_minor() {
        let mut config = ProvisionConfig::default();
        config
            .python
            .pins
            .insert("3.1".to_string(), "3.10.4".to_string());
        assert_eq!(rules(&config), vec!["invalid-pin-value"]);
    }

    #[test]
    fn empty_metadata_files_rejected() {
        let mut config = ProvisionConfig::default();
        config.python.metadata_files.clear();
        assert_eq!(rules(&config), vec!["no-metadata-files"]);
    }

    #[test]
    fn empty_sdist_requirement_rejected() {
        let mut config = ProvisionConfig::default();
        config.dependencies.sdist.push(SdistDependency {
            requirement: "  ".to_string(),
            requirements_file: PathBuf::new(),
        });
        assert_eq!(
            rules(&config),
            vec!["empty-sdist-requirement", "empty-sdist-requirements-file"]
        );
    }

    #[test]
    fn bracketed_extra_rejected() {
        let mut config = ProvisionConfig::default();
        config.dependencies.extras = vec!["dev".to_string(), "[test]".to_string()];
        assert_eq!(rules(&config), vec!["invalid-extra"]);
    }

    #[test]
    fn validate_joins_messages() {
        let mut config = ProvisionConfig::default();
        config.python.metadata_files.clear();
        config.dependencies.extras = vec!["a,b".to_string()];

        let err = validate(&config).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("metadata_files"));
        assert!(msg.contains("a,b"));
    }
}
