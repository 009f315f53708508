//! Platform and environment detection.

use std::path::PathBuf;

// Set by the common CI providers.
const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
];

/// Whether we are running under CI, where nobody can answer a prompt.
pub fn is_ci() -> bool {
    CI_VARS.iter().any(|var| std::env::var_os(var).is_some())
}

/// Virtual environment activated in the shell that launched us, if any.
pub fn inherited_virtual_env() -> Option<PathBuf> {
    std::env::var_os("VIRTUAL_ENV")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_ci_matches_known_variables() {
        let expected = CI_VARS.iter().any(|v| std::env::var_os(v).is_some());
        assert_eq!(is_ci(), expected);
    }

    #[test]
    fn inherited_virtual_env_is_never_empty_path() {
        if let Some(path) = inherited_virtual_env() {
            assert!(!path.as_os_str().is_empty());
        }
    }
}
