//! Virtual environment reconciliation and activation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ProvisionError, Result};
use crate::host::{ActiveEnvironment, HostEnvironment};
use crate::shell::inherited_virtual_env;
use crate::ui::{ConfirmationPort, UserInterface};
use crate::version::PinnedVersion;

use super::{with_spinner, PROMPT_REPLACE_VENV};

/// How the target directory was reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Nothing existed; a fresh environment was created.
    Created,
    /// An existing environment was deleted and recreated.
    Replaced,
    /// An existing environment was kept as-is (replacement declined).
    Reused,
}

/// Bring `target` to a usable virtual environment.
///
/// An existing directory is only replaced with consent (default no);
/// otherwise it is reused untouched. A regular file at `target` is
/// never deleted.
pub fn reconcile_virtual_env(
    host: &mut HostEnvironment,
    target: &Path,
    version: &PinnedVersion,
    ui: &mut dyn UserInterface,
) -> Result<Reconciliation> {
    if !target.exists() {
        create(host, target, version, ui)?;
        return Ok(Reconciliation::Created);
    }

    if !target.is_dir() {
        return Err(ProvisionError::ConfigValidationError {
            message: format!(
                "{} exists and is not a directory; choose another --directory",
                target.display()
            ),
        });
    }

    let question = format!(
        "A virtual environment already exists at {}. Replace it?",
        target.display()
    );
    if !ui.ask_yes_no(PROMPT_REPLACE_VENV, &question, false)? {
        tracing::debug!("Reusing existing environment at {}", target.display());
        ui.message(&format!(
            "Keeping existing environment at {}",
            target.display()
        ));
        return Ok(Reconciliation::Reused);
    }

    host.deactivate();
    if is_active_in_shell(target, inherited_virtual_env()) {
        ui.warning(&format!(
            "{} is active in your shell; run `deactivate` and activate it again after this finishes",
            target.display()
        ));
    }

    with_spinner(ui, &format!("Removing {}", target.display()), || {
        fs::remove_dir_all(target).map_err(ProvisionError::from)
    })?;
    create(host, target, version, ui)?;
    Ok(Reconciliation::Replaced)
}

fn create(
    host: &HostEnvironment,
    target: &Path,
    version: &PinnedVersion,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    with_spinner(
        ui,
        &format!(
            "Creating virtual environment at {} (Python {})",
            target.display(),
            version
        ),
        || host.toolchain().create_virtualenv(version, target),
    )
}

/// Whether the launching shell has `target` activated.
pub fn is_active_in_shell(target: &Path, inherited: Option<PathBuf>) -> bool {
    let Some(active) = inherited else {
        return false;
    };
    match (fs::canonicalize(&active), fs::canonicalize(target)) {
        (Ok(a), Ok(b)) => a == b,
        _ => active == target,
    }
}

/// Make the environment at `target` the active one for the rest of the run.
///
/// Fails with `VirtualEnvBroken` when it has no interpreter, such as a
/// reused directory that was never a virtual environment.
pub fn activate(host: &mut HostEnvironment, target: &Path) -> Result<()> {
    let env = ActiveEnvironment::open(target)?;
    host.activate(env);
    Ok(())
}
