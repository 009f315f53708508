//! Scripted host tools for testing.
//!
//! All four fakes share one [`MockHost`] state, so a test sees every tool
//! call in the order it happened:
//!
//! ```
//! use pyboot::host::{ConfigScope, MockHost};
//!
//! let mock = MockHost::new();
//! mock.set_git_config(ConfigScope::Global, "user.name", "Ada");
//!
//! let host = mock.host_environment();
//! let name = host.vcs().get_config("user.name", ConfigScope::Global).unwrap();
//! assert_eq!(name.as_deref(), Some("Ada"));
//! assert_eq!(mock.actions(), vec!["vcs.get_config --global user.name"]);
//! ```

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{ProvisionError, Result};
use crate::version::PinnedVersion;

use super::activation::{interpreter_subpath, ActiveEnvironment};
use super::tar::sdist_root_name;
use super::{Archive, ConfigScope, HostEnvironment, Installer, Toolchain, VersionControl};

/// One recorded tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    /// Which tool: `toolchain`, `installer`, `vcs`, or `archive`.
    pub tool: &'static str,
    /// Trait method name.
    pub action: &'static str,
    /// Arguments, rendered for assertions.
    pub args: Vec<String>,
}

impl Call {
    /// `tool.action`, the key used by [`MockHost::fail_on`].
    pub fn key(&self) -> String {
        format!("{}.{}", self.tool, self.action)
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<Call>,
    toolchain_available: bool,
    toolchain_installable: bool,
    installed_versions: BTreeSet<String>,
    git_config: BTreeMap<(ConfigScope, String), String>,
    failures: HashMap<String, i32>,
}

/// Handle to the shared state behind the fake tools.
#[derive(Debug, Clone)]
pub struct MockHost {
    state: Rc<RefCell<MockState>>,
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHost {
    /// A host with the version manager present and nothing installed.
    pub fn new() -> Self {
        let state = MockState {
            toolchain_available: true,
            toolchain_installable: true,
            ..Default::default()
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Whether the version manager starts out installed.
    pub fn set_toolchain_available(&self, available: bool) {
        self.state.borrow_mut().toolchain_available = available;
    }

    /// Whether installing the manager makes it locatable.
    pub fn set_toolchain_installable(&self, installable: bool) {
        self.state.borrow_mut().toolchain_installable = installable;
    }

    /// Mark an interpreter version as already installed.
    pub fn add_installed_version(&self, version: &str) {
        self.state
            .borrow_mut()
            .installed_versions
            .insert(version.to_string());
    }

    /// Installed interpreter versions.
    pub fn installed_versions(&self) -> Vec<String> {
        self.state
            .borrow()
            .installed_versions
            .iter()
            .cloned()
            .collect()
    }

    /// Seed a git setting.
    pub fn set_git_config(&self, scope: ConfigScope, key: &str, value: &str) {
        self.state
            .borrow_mut()
            .git_config
            .insert((scope, key.to_string()), value.to_string());
    }

    /// Current value of a git setting.
    pub fn git_config(&self, scope: ConfigScope, key: &str) -> Option<String> {
        self.state
            .borrow()
            .git_config
            .get(&(scope, key.to_string()))
            .cloned()
    }

    /// Make calls to `tool.action` fail with `exit_code`.
    pub fn fail_on(&self, key: &str, exit_code: i32) {
        self.state
            .borrow_mut()
            .failures
            .insert(key.to_string(), exit_code);
    }

    /// Every call so far.
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Every call so far, rendered as `tool.action args...`.
    pub fn actions(&self) -> Vec<String> {
        self.state
            .borrow()
            .calls
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    /// Number of calls to `tool.action`.
    pub fn count(&self, key: &str) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.key() == key)
            .count()
    }

    /// Write a stand-in interpreter so `root` passes activation.
    pub fn write_interpreter(&self, root: &Path) {
        let python = root.join(interpreter_subpath());
        if let Some(parent) = python.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let _ = fs::write(python, "");
    }

    /// A [`HostEnvironment`] backed by this mock.
    pub fn host_environment(&self) -> HostEnvironment {
        HostEnvironment::new(
            Box::new(MockToolchain(self.clone())),
            Box::new(MockInstaller(self.clone())),
            Box::new(MockVersionControl(self.clone())),
            Box::new(MockArchive(self.clone())),
        )
    }

    fn record(&self, tool: &'static str, action: &'static str, args: Vec<String>) -> Result<()> {
        let call = Call { tool, action, args };
        let key = call.key();
        let rendered = call.to_string();
        let mut state = self.state.borrow_mut();
        state.calls.push(call);

        match state.failures.get(&key) {
            Some(code) => Err(ProvisionError::InstallFailure {
                step: key,
                command: rendered,
                code: Some(*code),
                output: "scripted failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

// Absolute paths are mostly temp directories; keep the stable tail.
fn render_path(path: &Path, components: usize) -> String {
    if path.is_relative() {
        return path.display().to_string();
    }
    let tail: Vec<String> = path
        .components()
        .rev()
        .take(components)
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    tail.into_iter().rev().collect::<Vec<_>>().join("/")
}

fn flag(quiet: bool) -> Vec<String> {
    if quiet {
        vec!["-q".to_string()]
    } else {
        Vec::new()
    }
}

struct MockToolchain(MockHost);

impl Toolchain for MockToolchain {
    fn name(&self) -> &str {
        "pyenv"
    }

    fn is_available(&self) -> bool {
        self.0.state.borrow().toolchain_available
    }

    fn install_source(&self) -> String {
        "the mock installer".to_string()
    }

    fn install_manager(&mut self) -> Result<()> {
        self.0.record("toolchain", "install_manager", Vec::new())?;
        let mut state = self.0.state.borrow_mut();
        state.toolchain_available = state.toolchain_installable;
        Ok(())
    }

    fn is_version_installed(&self, version: &PinnedVersion) -> Result<bool> {
        self.0.record(
            "toolchain",
            "is_version_installed",
            vec![version.to_string()],
        )?;
        Ok(self
            .0
            .state
            .borrow()
            .installed_versions
            .contains(version.as_str()))
    }

    fn install_version(&self, version: &PinnedVersion) -> Result<()> {
        self.0
            .record("toolchain", "install_version", vec![version.to_string()])?;
        self.0.add_installed_version(version.as_str());
        Ok(())
    }

    fn set_local_version(&self, version: &PinnedVersion) -> Result<()> {
        self.0
            .record("toolchain", "set_local_version", vec![version.to_string()])
    }

    fn create_virtualenv(&self, version: &PinnedVersion, target: &Path) -> Result<()> {
        self.0.record(
            "toolchain",
            "create_virtualenv",
            vec![version.to_string(), render_path(target, 1)],
        )?;
        self.0.write_interpreter(target);
        Ok(())
    }
}

struct MockInstaller(MockHost);

impl Installer for MockInstaller {
    fn upgrade_self(&self, _env: &ActiveEnvironment, quiet: bool) -> Result<()> {
        self.0.record("installer", "upgrade_self", flag(quiet))
    }

    fn download_sdist(
        &self,
        _env: &ActiveEnvironment,
        requirement: &str,
        dest: &Path,
        quiet: bool,
    ) -> Result<PathBuf> {
        let mut args = flag(quiet);
        args.push(requirement.to_string());
        self.0.record("installer", "download_sdist", args)?;

        let stem = match requirement.split_once("==") {
            Some((name, version)) => format!("{}-{}", name.trim(), version.trim()),
            None => format!("{}-0.0.0", requirement.trim()),
        };
        fs::create_dir_all(dest)?;
        let archive = dest.join(format!("{}.tar.gz", stem));
        fs::write(&archive, "")?;
        Ok(archive)
    }

    fn install_requirements(
        &self,
        _env: &ActiveEnvironment,
        file: &Path,
        quiet: bool,
    ) -> Result<()> {
        let mut args = flag(quiet);
        args.push(render_path(file, 2));
        self.0.record("installer", "install_requirements", args)
    }

    fn install_editable(
        &self,
        _env: &ActiveEnvironment,
        path: &Path,
        extras: &[String],
        quiet: bool,
    ) -> Result<()> {
        let mut args = flag(quiet);
        args.push(super::pip::editable_spec(path, extras));
        self.0.record("installer", "install_editable", args)
    }
}

struct MockVersionControl(MockHost);

impl VersionControl for MockVersionControl {
    fn get_config(&self, key: &str, scope: ConfigScope) -> Result<Option<String>> {
        self.0.record(
            "vcs",
            "get_config",
            vec![scope.flag().to_string(), key.to_string()],
        )?;
        Ok(self.0.git_config(scope, key))
    }

    fn set_config(&self, key: &str, value: &str, scope: ConfigScope) -> Result<()> {
        self.0.record(
            "vcs",
            "set_config",
            vec![scope.flag().to_string(), key.to_string(), value.to_string()],
        )?;
        self.0.set_git_config(scope, key, value);
        Ok(())
    }
}

struct MockArchive(MockHost);

impl Archive for MockArchive {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<PathBuf> {
        self.0
            .record("archive", "extract", vec![render_path(archive, 1)])?;
        let root = dest.join(sdist_root_name(archive).unwrap_or_else(|| "sdist".to_string()));
        fs::create_dir_all(&root)?;
        Ok(root)
    }
}
