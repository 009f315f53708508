//! The environment-provisioning workflow.
//!
//! [`provision`] runs every step in a fixed order against a
//! [`HostEnvironment`]:
//!
//! 1. resolve the pinned interpreter version ([`crate::version`])
//! 2. [`ensure_toolchain`]: version manager, interpreter, local pin
//! 3. [`reconcile_virtual_env`]: create, replace, or reuse the target
//! 4. [`activate`] the environment for the rest of the run
//! 5. [`install_dependencies`]
//! 6. [`configure_auxiliary`]: git identity and hook path
//!
//! The first failure aborts the run. Nothing is rolled back.

pub mod auxiliary;
pub mod dependencies;
pub mod toolchain;
pub mod venv;

pub use auxiliary::{configure_auxiliary, AuxiliaryOutcome, IdentityOutcome};
pub use dependencies::install_dependencies;
pub use toolchain::{ensure_toolchain, ToolchainOutcome};
pub use venv::{activate, reconcile_virtual_env, Reconciliation};

use std::path::{Path, PathBuf};

use crate::config::ProvisionConfig;
use crate::error::Result;
use crate::host::HostEnvironment;
use crate::ui::UserInterface;
use crate::version::{resolve_version, PinnedVersion};

/// Prompt asking to install the version manager.
pub const PROMPT_INSTALL_PYENV: &str = "install_pyenv";
/// Prompt asking to replace an existing environment.
pub const PROMPT_REPLACE_VENV: &str = "replace_venv";
/// Prompt asking to configure a missing git identity.
pub const PROMPT_CONFIGURE_GIT_IDENTITY: &str = "configure_git_identity";
/// Prompt for the git user name.
pub const PROMPT_GIT_USER_NAME: &str = "git_user_name";
/// Prompt for the git user email.
pub const PROMPT_GIT_USER_EMAIL: &str = "git_user_email";

/// What the user asked for, parsed once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    /// Where the virtual environment lives.
    pub target_directory: PathBuf,
    pub verbose: bool,
    pub quiet: bool,
}

impl InstallRequest {
    pub fn new(target_directory: impl Into<PathBuf>, verbose: bool, quiet: bool) -> Self {
        Self {
            target_directory: target_directory.into(),
            verbose,
            quiet,
        }
    }

    /// Resolve a relative target against `cwd`.
    pub fn resolved_against(mut self, cwd: &Path) -> Self {
        if self.target_directory.is_relative() {
            self.target_directory = cwd.join(&self.target_directory);
        }
        self
    }

    /// Whether installers run with `-q`. Verbose overrides quiet.
    pub fn installer_quiet(&self) -> bool {
        self.quiet && !self.verbose
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    /// Interpreter version the environment was built from.
    pub version: PinnedVersion,
    pub toolchain: ToolchainOutcome,
    pub reconciliation: Reconciliation,
    pub auxiliary: AuxiliaryOutcome,
}

/// Run the whole workflow.
pub fn provision(
    host: &mut HostEnvironment,
    request: &InstallRequest,
    project_root: &Path,
    config: &ProvisionConfig,
    ui: &mut dyn UserInterface,
) -> Result<ProvisionReport> {
    let target = request.target_directory.as_path();
    tracing::debug!(
        "Provisioning {} for {}",
        target.display(),
        project_root.display()
    );
    ui.show_header(&format!("Provisioning {}", target.display()));

    let version = with_spinner(ui, "Resolving Python version", || {
        resolve_version(project_root, &config.python)
    })?;
    ui.success(&format!("Python {}", version));

    let toolchain = ensure_toolchain(host, &version, ui)?;
    let reconciliation = reconcile_virtual_env(host, target, &version, ui)?;
    activate(host, target)?;
    install_dependencies(
        host,
        project_root,
        &config.dependencies,
        request.installer_quiet(),
        ui,
    )?;
    let auxiliary = configure_auxiliary(host, &config.git, ui)?;

    Ok(ProvisionReport {
        version,
        toolchain,
        reconciliation,
        auxiliary,
    })
}

/// Run `f` under a spinner, finishing it with the outcome.
pub(crate) fn with_spinner<T>(
    ui: &mut dyn UserInterface,
    message: &str,
    f: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let mut spinner = ui.start_spinner(message);
    match f() {
        Ok(value) => {
            spinner.finish_success(message);
            Ok(value)
        }
        Err(e) => {
            spinner.finish_error(message);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProvisionError;
    use crate::host::MockHost;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn project(setup_py: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("setup.py"), setup_py).unwrap();
        fs::write(temp.path().join("requirements-dev.txt"), "pytest\n").unwrap();
        temp
    }

    #[test]
    fn installer_quiet_requires_quiet_without_verbose() {
        assert!(InstallRequest::new("venv", false, true).installer_quiet());
        assert!(!InstallRequest::new("venv", true, true).installer_quiet());
        assert!(!InstallRequest::new("venv", false, false).installer_quiet());
    }

    #[test]
    fn relative_target_resolved_against_cwd() {
        let request = InstallRequest::new("venv", false, false).resolved_against(Path::new("/work"));
        assert_eq!(request.target_directory, PathBuf::from("/work/venv"));

        let absolute = InstallRequest::new("/opt/venv", false, false).resolved_against(Path::new("/work"));
        assert_eq!(absolute.target_directory, PathBuf::from("/opt/venv"));
    }

    #[test]
    fn provision_reports_every_stage() {
        let temp = project("setup(python_requires='>=3.9')\n");
        let mock = MockHost::new();
        mock.set_git_config(crate::host::ConfigScope::Global, "user.name", "Ada");
        mock.set_git_config(crate::host::ConfigScope::Global, "user.email", "ada@example.com");
        let mut host = mock.host_environment();
        let mut ui = MockUI::new();
        let request = InstallRequest::new(temp.path().join("venv"), false, true);

        let report = provision(
            &mut host,
            &request,
            temp.path(),
            &ProvisionConfig::default(),
            &mut ui,
        )
        .unwrap();

        assert_eq!(report.version.as_str(), "3.9.11");
        assert_eq!(report.reconciliation, Reconciliation::Created);
        assert!(report.toolchain.interpreter_installed);
        assert!(!report.toolchain.manager_installed);
        assert_eq!(report.auxiliary.identity, IdentityOutcome::AlreadySet);
        assert_eq!(report.auxiliary.hooks_path.as_deref(), Some(".githooks"));
        assert!(host.active().is_some());
        assert!(ui.prompts_shown().is_empty());
    }

    #[test]
    fn unsupported_version_fails_before_touching_host() {
        let temp = project("setup(python_requires='>=3.5')\n");
        let mock = MockHost::new();
        let mut host = mock.host_environment();
        let mut ui = MockUI::new();
        let request = InstallRequest::new(temp.path().join("venv"), false, false);

        let err = provision(
            &mut host,
            &request,
            temp.path(),
            &ProvisionConfig::default(),
            &mut ui,
        )
        .unwrap_err();

        assert!(matches!(err, ProvisionError::UnsupportedVersion { .. }));
        assert!(mock.calls().is_empty());
        assert!(!temp.path().join("venv").exists());
    }

    #[test]
    fn with_spinner_finishes_with_outcome() {
        let mut ui = MockUI::new();
        let value = with_spinner(&mut ui, "Working", || Ok(3)).unwrap();
        assert_eq!(value, 3);

        let err = with_spinner::<()>(&mut ui, "Failing", || {
            Err(ProvisionError::CommandFailed {
                command: "nope".to_string(),
            })
        })
        .unwrap_err();
        assert!(matches!(err, ProvisionError::CommandFailed { .. }));
        assert_eq!(ui.spinners(), &["Working", "Failing"]);
    }
}
