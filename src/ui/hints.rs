//! Follow-up hints shown after a run.

use std::path::Path;

use crate::error::ProvisionError;

/// How to activate the provisioned environment in the user's shell.
pub fn activate_command(target: &Path) -> String {
    if cfg!(windows) {
        format!("{}\\Scripts\\activate", target.display())
    } else {
        format!("source {}/bin/activate", target.display())
    }
}

/// Hint after a successful run.
pub fn after_success(target: &Path) -> String {
    format!("Activate it with `{}`", activate_command(target))
}

/// Suggested next action for a failure, if there is a useful one.
pub fn for_error(err: &ProvisionError) -> Option<String> {
    match err {
        ProvisionError::ToolchainMissing { .. } => Some(
            "Install pyenv (https://github.com/pyenv/pyenv#installation) and make sure it is on PATH"
                .to_string(),
        ),
        ProvisionError::UnsupportedVersion { .. } => {
            Some("Add a pin for this version under `python.pins` in .pyboot.yml".to_string())
        }
        ProvisionError::ConstraintNotFound { .. } => Some(
            "Declare `python_requires` in setup.py/setup.cfg or `requires-python` in pyproject.toml"
                .to_string(),
        ),
        ProvisionError::VirtualEnvBroken { path } => Some(format!(
            "Remove {} or re-run and accept replacement",
            path.display()
        )),
        ProvisionError::InstallFailure { .. } => {
            Some("Re-run with --verbose to see the full tool output".to_string())
        }
        _ => None,
    }
}
