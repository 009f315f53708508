//! Virtual environment activation.
//!
//! Activation never mutates this process's environment. Instead the
//! [`ActiveEnvironment`] carries the variables every later tool
//! invocation is spawned with, so the environment's executables win on
//! the command search path for the rest of the run.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{ProvisionError, Result};
use crate::shell::CommandOptions;

#[cfg(windows)]
const BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
const BIN_DIR: &str = "bin";

#[cfg(windows)]
const PYTHON_EXE: &str = "python.exe";
#[cfg(not(windows))]
const PYTHON_EXE: &str = "python";

/// Relative location of the interpreter inside a virtual environment.
pub fn interpreter_subpath() -> PathBuf {
    Path::new(BIN_DIR).join(PYTHON_EXE)
}

/// An activated virtual environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEnvironment {
    root: PathBuf,
    bin_dir: PathBuf,
    python: PathBuf,
    search_path: OsString,
}

impl ActiveEnvironment {
    /// Activate the environment rooted at `root`.
    ///
    /// # Errors
    ///
    /// `VirtualEnvBroken` when `root` has no interpreter.
    pub fn open(root: &Path) -> Result<Self> {
        let base = env::var_os("PATH").unwrap_or_default();
        Self::open_with_path(root, &base)
    }

    /// Activate against an explicit base search path.
    pub fn open_with_path(root: &Path, base_path: &OsString) -> Result<Self> {
        let bin_dir = root.join(BIN_DIR);
        let python = bin_dir.join(PYTHON_EXE);
        if !python.is_file() {
            return Err(ProvisionError::VirtualEnvBroken {
                path: root.to_path_buf(),
            });
        }

        let search_path = env::join_paths(
            std::iter::once(bin_dir.clone()).chain(env::split_paths(base_path)),
        )
        .map_err(|e| anyhow::anyhow!("cannot build PATH for {}: {}", root.display(), e))?;

        Ok(Self {
            root: root.to_path_buf(),
            bin_dir,
            python,
            search_path,
        })
    }

    /// Environment root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the environment's executables.
    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    /// The environment's interpreter.
    pub fn python(&self) -> &Path {
        &self.python
    }

    /// Variables that make a child process run inside this environment.
    pub fn env_vars(&self) -> Vec<(String, String)> {
        vec![
            (
                "VIRTUAL_ENV".to_string(),
                self.root.to_string_lossy().into_owned(),
            ),
            (
                "PATH".to_string(),
                self.search_path.to_string_lossy().into_owned(),
            ),
        ]
    }

    /// Command options for running a tool inside this environment.
    pub fn command_options(&self) -> CommandOptions {
        let mut options = CommandOptions::default().without_env("PYTHONHOME");
        for (key, value) in self.env_vars() {
            options = options.with_env(&key, &value);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fake_venv(root: &Path) {
        let python = root.join(interpreter_subpath());
        fs::create_dir_all(python.parent().unwrap()).unwrap();
        fs::write(&python, "").unwrap();
    }

    #[test]
    fn open_requires_interpreter() {
        let temp = TempDir::new().unwrap();
        let err = ActiveEnvironment::open(temp.path()).unwrap_err();
        assert!(matches!(err, ProvisionError::VirtualEnvBroken { .. }));
    }

    #[test]
    fn open_resolves_layout() {
        let temp = TempDir::new().unwrap();
        fake_venv(temp.path());

        let env = ActiveEnvironment::open(temp.path()).unwrap();
        assert_eq!(env.root(), temp.path());
        assert_eq!(env.bin_dir(), temp.path().join(BIN_DIR));
        assert_eq!(env.python(), temp.path().join(BIN_DIR).join(PYTHON_EXE));
    }

    #[test]
    fn bin_dir_is_first_on_search_path() {
        let temp = TempDir::new().unwrap();
        fake_venv(temp.path());
        let base = env::join_paths([PathBuf::from("/usr/bin"), PathBuf::from("/bin")]).unwrap();

        let env = ActiveEnvironment::open_with_path(temp.path(), &base).unwrap();
        let vars = env.env_vars();
        let path = &vars.iter().find(|(k, _)| k == "PATH").unwrap().1;
        let entries: Vec<PathBuf> = env::split_paths(path).collect();

        assert_eq!(entries[0], temp.path().join(BIN_DIR));
        assert_eq!(entries[1], PathBuf::from("/usr/bin"));
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn command_options_set_virtual_env_and_drop_pythonhome() {
        let temp = TempDir::new().unwrap();
        fake_venv(temp.path());

        let options = ActiveEnvironment::open(temp.path())
            .unwrap()
            .command_options();
        assert!(options
            .env
            .iter()
            .any(|(k, v)| k == "VIRTUAL_ENV" && Path::new(v) == temp.path()));
        assert_eq!(options.env_remove, vec!["PYTHONHOME".to_string()]);
    }
}
