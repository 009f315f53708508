//! The host boundary: every external tool the provisioner drives.
//!
//! Provisioning steps never spawn processes themselves. They talk to a
//! [`HostEnvironment`], which owns one narrow interface per tool:
//!
//! - [`Toolchain`]: the Python version manager (pyenv)
//! - [`Installer`]: the package installer (pip), always inside an
//!   [`ActiveEnvironment`]
//! - [`VersionControl`]: git configuration
//! - [`Archive`]: source distribution extraction (tar)
//!
//! [`HostEnvironment::system`] wires up the real tools. [`MockHost`]
//! provides scripted fakes that record every call in one shared log.

pub mod activation;
pub mod git;
pub mod mock;
pub mod package_manager;
pub mod pip;
pub mod pyenv;
pub mod tar;

pub use activation::{interpreter_subpath, ActiveEnvironment};
pub use git::Git;
pub use mock::{Call, MockHost};
pub use package_manager::{InstallPlan, SystemPackageManager};
pub use pip::Pip;
pub use pyenv::Pyenv;
pub use tar::Tar;

use std::path::{Path, PathBuf};

use crate::config::ProvisionConfig;
use crate::error::Result;
use crate::shell::{parse_system_path, Runner};
use crate::version::PinnedVersion;

/// The Python version manager.
pub trait Toolchain {
    /// Manager name, e.g. "pyenv".
    fn name(&self) -> &str;

    /// Whether the manager can be located.
    fn is_available(&self) -> bool;

    /// Describes how [`install_manager`](Self::install_manager) would
    /// install it, for the consent prompt.
    fn install_source(&self) -> String;

    /// Install the manager itself, then locate it again.
    fn install_manager(&mut self) -> Result<()>;

    /// Whether an interpreter version is already installed.
    fn is_version_installed(&self, version: &PinnedVersion) -> Result<bool>;

    /// Build and install an interpreter version.
    fn install_version(&self, version: &PinnedVersion) -> Result<()>;

    /// Pin the project directory to an interpreter version.
    fn set_local_version(&self, version: &PinnedVersion) -> Result<()>;

    /// Create a virtual environment at `target` using `version`.
    fn create_virtualenv(&self, version: &PinnedVersion, target: &Path) -> Result<()>;
}

/// The package installer, run inside an active environment.
pub trait Installer {
    /// Upgrade the installer itself.
    fn upgrade_self(&self, env: &ActiveEnvironment, quiet: bool) -> Result<()>;

    /// Download a requirement's source distribution (no dependencies, no
    /// binaries) into `dest`, returning the archive path.
    fn download_sdist(
        &self,
        env: &ActiveEnvironment,
        requirement: &str,
        dest: &Path,
        quiet: bool,
    ) -> Result<PathBuf>;

    /// Install everything listed in a requirements file.
    fn install_requirements(&self, env: &ActiveEnvironment, file: &Path, quiet: bool)
        -> Result<()>;

    /// Install a local package in editable mode with optional extras.
    fn install_editable(
        &self,
        env: &ActiveEnvironment,
        path: &Path,
        extras: &[String],
        quiet: bool,
    ) -> Result<()>;
}

/// Scope of a version-control setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigScope {
    /// The user's global configuration.
    Global,
    /// The project repository's configuration.
    Local,
}

impl ConfigScope {
    /// Command-line flag selecting this scope.
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Global => "--global",
            Self::Local => "--local",
        }
    }
}

/// Version-control configuration.
pub trait VersionControl {
    /// Read a setting; `None` when unset.
    fn get_config(&self, key: &str, scope: ConfigScope) -> Result<Option<String>>;

    /// Write a setting.
    fn set_config(&self, key: &str, value: &str, scope: ConfigScope) -> Result<()>;
}

/// Archive extraction.
pub trait Archive {
    /// Extract `archive` into `dest`, returning the extracted tree's root.
    fn extract(&self, archive: &Path, dest: &Path) -> Result<PathBuf>;
}

/// Explicit context for every provisioning operation.
pub struct HostEnvironment {
    toolchain: Box<dyn Toolchain>,
    installer: Box<dyn Installer>,
    vcs: Box<dyn VersionControl>,
    archive: Box<dyn Archive>,
    active: Option<ActiveEnvironment>,
}

impl HostEnvironment {
    /// Assemble a host from tool implementations.
    pub fn new(
        toolchain: Box<dyn Toolchain>,
        installer: Box<dyn Installer>,
        vcs: Box<dyn VersionControl>,
        archive: Box<dyn Archive>,
    ) -> Self {
        Self {
            toolchain,
            installer,
            vcs,
            archive,
            active: None,
        }
    }

    /// The real tools on this machine.
    pub fn system(project_root: &Path, config: &ProvisionConfig, runner: Runner) -> Self {
        let plan = InstallPlan::for_host(
            config.toolchain.install_command.as_deref(),
            &parse_system_path(),
        );
        Self::new(
            Box::new(Pyenv::locate(project_root, plan, runner)),
            Box::new(Pip::new(project_root, runner)),
            Box::new(Git::new(project_root, runner)),
            Box::new(Tar::new(runner)),
        )
    }

    pub fn toolchain(&self) -> &dyn Toolchain {
        self.toolchain.as_ref()
    }

    pub fn toolchain_mut(&mut self) -> &mut dyn Toolchain {
        self.toolchain.as_mut()
    }

    pub fn installer(&self) -> &dyn Installer {
        self.installer.as_ref()
    }

    pub fn vcs(&self) -> &dyn VersionControl {
        self.vcs.as_ref()
    }

    pub fn archive(&self) -> &dyn Archive {
        self.archive.as_ref()
    }

    /// Make `env` the environment for the rest of the run.
    pub fn activate(&mut self, env: ActiveEnvironment) {
        tracing::debug!("Activated {}", env.root().display());
        self.active = Some(env);
    }

    /// Drop the current activation, returning it.
    pub fn deactivate(&mut self) -> Option<ActiveEnvironment> {
        let previous = self.active.take();
        if let Some(env) = &previous {
            tracing::debug!("Deactivated {}", env.root().display());
        }
        previous
    }

    /// The currently active environment.
    pub fn active(&self) -> Option<&ActiveEnvironment> {
        self.active.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_scope_flags() {
        assert_eq!(ConfigScope::Global.flag(), "--global");
        assert_eq!(ConfigScope::Local.flag(), "--local");
    }

    #[test]
    fn activation_round_trip() {
        let temp = TempDir::new().unwrap();
        let mock = MockHost::new();
        let mut host = mock.host_environment();
        assert!(host.active().is_none());

        mock.write_interpreter(temp.path());
        let env = ActiveEnvironment::open(temp.path()).unwrap();
        host.activate(env.clone());
        assert_eq!(host.active(), Some(&env));

        assert_eq!(host.deactivate(), Some(env));
        assert!(host.active().is_none());
        assert!(host.deactivate().is_none());
    }
}
