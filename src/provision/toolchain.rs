//! Version manager and interpreter installation.

use crate::error::{ProvisionError, Result};
use crate::host::HostEnvironment;
use crate::ui::{ConfirmationPort, UserInterface};
use crate::version::PinnedVersion;

use super::{with_spinner, PROMPT_INSTALL_PYENV};

/// What [`ensure_toolchain`] had to install.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToolchainOutcome {
    /// The version manager itself was installed.
    pub manager_installed: bool,
    /// The pinned interpreter was built.
    pub interpreter_installed: bool,
}

/// Make sure the version manager and the pinned interpreter exist, then
/// pin the project to that interpreter.
///
/// Installing the manager needs consent; declining fails with
/// `ToolchainMissing` before anything else happens. The interpreter is
/// only built when missing, so a second run installs nothing.
pub fn ensure_toolchain(
    host: &mut HostEnvironment,
    version: &PinnedVersion,
    ui: &mut dyn UserInterface,
) -> Result<ToolchainOutcome> {
    let mut outcome = ToolchainOutcome::default();
    let manager = host.toolchain().name().to_string();

    if !host.toolchain().is_available() {
        let question = format!(
            "{} is not installed. Install it with {}?",
            manager,
            host.toolchain().install_source()
        );
        if !ui.ask_yes_no(PROMPT_INSTALL_PYENV, &question, false)? {
            return Err(ProvisionError::ToolchainMissing {
                manager,
                message: "installation declined".to_string(),
            });
        }

        with_spinner(ui, &format!("Installing {}", manager), || {
            host.toolchain_mut().install_manager()
        })?;

        if !host.toolchain().is_available() {
            return Err(ProvisionError::ToolchainMissing {
                manager: manager.clone(),
                message: format!(
                    "installed, but still not found; add {} to PATH (or set PYENV_ROOT) and re-run",
                    manager
                ),
            });
        }
        outcome.manager_installed = true;
    }

    let label = format!("Installing Python {}", version);
    let mut spinner = ui.start_spinner(&label);
    let built = host
        .toolchain()
        .is_version_installed(version)
        .and_then(|present| {
            if !present {
                host.toolchain().install_version(version)?;
            }
            Ok(!present)
        });
    match built {
        Ok(true) => {
            spinner.finish_success(&label);
            outcome.interpreter_installed = true;
        }
        Ok(false) => {
            tracing::debug!("Python {} already installed", version);
            spinner.finish_skipped(&format!("Python {} already installed", version));
        }
        Err(e) => {
            spinner.finish_error(&label);
            return Err(e);
        }
    }

    host.toolchain().set_local_version(version)?;
    Ok(outcome)
}
