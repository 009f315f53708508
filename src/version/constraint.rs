//! Minimum Python version extraction from project metadata.

use regex::Regex;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::{ProvisionError, Result};

// `python_requires=">=3.9"` (setup.py / setup.cfg) or
// `requires-python = ">=3.9"` (pyproject.toml). Captures the specifier set,
// quoted (1) or bare to the end of the line (2).
static DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^[^#\n]*?\b(?:python_requires|requires-python)\s*=\s*(?:["']([^"'\n]*)["']|([^"'#\n]+))"#,
    )
    .unwrap()
});

// One clause of a specifier set that bounds the version from below.
// `<4` and `!=3.5.*` never match. Only major.minor is kept.
static LOWER_BOUND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:>=|~=|===?|>)?\s*(\d+\.\d+)").unwrap());

/// A minor Python version (e.g. "3.9") the project declares as its minimum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionConstraint(String);

impl VersionConstraint {
    /// Wrap a minor version string.
    pub fn new(minor: impl Into<String>) -> Self {
        Self(minor.into())
    }

    /// The minor version, e.g. "3.9".
    pub fn minor(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the minimum-version constraint from metadata file contents.
///
/// The first clause of the specifier set with a lower bound wins, so
/// `"<4,>=3.9"` yields 3.9.
pub fn extract_constraint(content: &str) -> Option<VersionConstraint> {
    DECLARATION_RE.captures_iter(content).find_map(|caps| {
        let specifiers = caps.get(1).or_else(|| caps.get(2))?.as_str();
        specifiers.split(',').find_map(lower_bound)
    })
}

fn lower_bound(clause: &str) -> Option<VersionConstraint> {
    LOWER_BOUND_RE
        .captures(clause.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| VersionConstraint::new(m.as_str()))
}

/// Read the constraint from the first metadata file that declares one.
///
/// Files are tried in order; missing files are skipped.
pub fn read_constraint(
    project_root: &Path,
    metadata_files: &[impl AsRef<Path>],
) -> Result<VersionConstraint> {
    for file in metadata_files {
        let path = project_root.join(file.as_ref());
        if !path.is_file() {
            continue;
        }

        let content = fs::read_to_string(&path)?;
        if let Some(constraint) = extract_constraint(&content) {
            tracing::debug!(
                "Found minimum Python {} in {}",
                constraint,
                path.display()
            );
            return Ok(constraint);
        }
    }

    Err(ProvisionError::ConstraintNotFound {
        path: project_root.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn extracts_from_setup_py() {
        let content = r#"
from setuptools import setup

setup(
    name="example",
    python_requires=">=3.9",
    install_requires=["requests"],
)
"#;
        assert_eq!(extract_constraint(content), Some(VersionConstraint::new("3.9")));
    }

    #[test]
    fn extracts_from_setup_cfg_without_quotes() {
        let content = "[options]\npackages = find:\npython_requires = >=3.8\n";
        assert_eq!(extract_constraint(content), Some(VersionConstraint::new("3.8")));
    }

    #[test]
    fn extracts_from_pyproject() {
        let content = "[project]\nname = \"example\"\nrequires-python = \">= 3.10\"\n";
        assert_eq!(extract_constraint(content), Some(VersionConstraint::new("3.10")));
    }

    #[test]
    fn keeps_only_minor_of_micro_constraint() {
        let content = "python_requires='>=3.9.2'";
        assert_eq!(extract_constraint(content), Some(VersionConstraint::new("3.9")));
    }

    #[test]
    fn accepts_compatible_release_operator() {
        let content = "requires-python = \"~=3.11\"";
        assert_eq!(extract_constraint(content), Some(VersionConstraint::new("3.11")));
    }

    #[test]
    fn extracts_from_single_line_setup_call() {
        let content = "setup(name='x', python_requires='>=3.7')";
        assert_eq!(extract_constraint(content), Some(VersionConstraint::new("3.7")));
    }

    #[test]
    fn finds_lower_bound_after_upper_bound() {
        let content = "setup(name='x', python_requires=\"<4,>=3.9\")";
        assert_eq!(extract_constraint(content), Some(VersionConstraint::new("3.9")));

        let content = "[options]\npython_requires = !=3.5.*, <4, >= 3.8\n";
        assert_eq!(extract_constraint(content), Some(VersionConstraint::new("3.8")));
    }

    #[test]
    fn accepts_exclusive_and_bare_bounds() {
        let content = "python_requires=\">3.8\"";
        assert_eq!(extract_constraint(content), Some(VersionConstraint::new("3.8")));

        let content = "requires-python = \"3.10\"";
        assert_eq!(extract_constraint(content), Some(VersionConstraint::new("3.10")));
    }

    #[test]
    fn upper_bound_alone_is_not_a_constraint() {
        assert_eq!(extract_constraint("requires-python = \"<3.12\""), None);
    }

    #[test]
    fn ignores_commented_out_lines() {
        let content = "# python_requires='>=3.6'\n";
        assert_eq!(extract_constraint(content), None);
    }

    #[test]
    fn none_when_absent() {
        assert_eq!(extract_constraint("setup(name='x')"), None);
    }

    #[test]
    fn read_constraint_uses_first_declaring_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("setup.py"), "setup(name='x')\n").unwrap();
        fs::write(
            temp.path().join("pyproject.toml"),
            "[project]\nrequires-python = \">=3.9\"\n",
        )
        .unwrap();

        let files = [
            PathBuf::from("setup.py"),
            PathBuf::from("setup.cfg"),
            PathBuf::from("pyproject.toml"),
        ];
        let constraint = read_constraint(temp.path(), &files).unwrap();
        assert_eq!(constraint.minor(), "3.9");
    }

    #[test]
    fn read_constraint_fails_when_nothing_declares() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("setup.py"), "setup(name='x')\n").unwrap();

        let err = read_constraint(temp.path(), &[PathBuf::from("setup.py")]).unwrap_err();
        assert!(matches!(err, ProvisionError::ConstraintNotFound { .. }));
    }
}
