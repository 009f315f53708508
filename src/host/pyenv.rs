//! pyenv-backed [`Toolchain`].

use std::path::{Path, PathBuf};

use crate::error::{ProvisionError, Result};
use crate::shell::{display_command, locate_manager, parse_system_path, CommandOptions, Runner};
use crate::version::PinnedVersion;

use super::package_manager::InstallPlan;
use super::Toolchain;

const MANAGER: &str = "pyenv";

#[cfg(windows)]
const BINARY_SUBPATH: &str = "pyenv-win/bin/pyenv.bat";
#[cfg(not(windows))]
const BINARY_SUBPATH: &str = "bin/pyenv";

/// Locate pyenv: `$PYENV_ROOT/bin`, then PATH, then `~/.pyenv/bin`.
pub fn find_pyenv() -> Option<PathBuf> {
    locate_manager(
        MANAGER,
        "PYENV_ROOT",
        ".pyenv",
        BINARY_SUBPATH,
        &parse_system_path(),
        &|key: &str| std::env::var(key),
    )
}

/// Parse `pyenv versions --bare` output into version names.
pub fn parse_versions(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

/// The pyenv version manager.
#[derive(Debug, Clone)]
pub struct Pyenv {
    binary: Option<PathBuf>,
    project_root: PathBuf,
    plan: InstallPlan,
    runner: Runner,
}

impl Pyenv {
    /// Locate pyenv on this machine.
    pub fn locate(project_root: &Path, plan: InstallPlan, runner: Runner) -> Self {
        let binary = find_pyenv();
        match &binary {
            Some(path) => tracing::debug!("Found pyenv at {}", path.display()),
            None => tracing::debug!("pyenv not found"),
        }
        Self::with_binary(binary, project_root, plan, runner)
    }

    /// Use a known binary location (or none).
    pub fn with_binary(
        binary: Option<PathBuf>,
        project_root: &Path,
        plan: InstallPlan,
        runner: Runner,
    ) -> Self {
        Self {
            binary,
            project_root: project_root.to_path_buf(),
            plan,
            runner,
        }
    }

    fn program(&self) -> Result<String> {
        self.binary
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .ok_or_else(|| ProvisionError::ToolchainMissing {
                manager: MANAGER.to_string(),
                message: "pyenv could not be located".to_string(),
            })
    }

    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }
}

impl Toolchain for Pyenv {
    fn name(&self) -> &str {
        MANAGER
    }

    fn is_available(&self) -> bool {
        self.binary.is_some()
    }

    fn install_source(&self) -> String {
        format!(
            "{} ({})",
            self.plan.via,
            display_command(&self.plan.program, &self.plan.args)
        )
    }

    fn install_manager(&mut self) -> Result<()> {
        self.runner.run(
            "Install pyenv",
            &self.plan.program,
            &self.plan.args,
            CommandOptions::default(),
        )?;
        self.binary = find_pyenv();
        Ok(())
    }

    fn is_version_installed(&self, version: &PinnedVersion) -> Result<bool> {
        let program = self.program()?;
        let args = Self::args(&["versions", "--bare"]);
        let result = self
            .runner
            .query(&program, &args, CommandOptions::default())?;

        if !result.success {
            return Err(ProvisionError::InstallFailure {
                step: "List installed Python versions".to_string(),
                command: display_command(&program, &args),
                code: result.exit_code,
                output: result.diagnostic_output().to_string(),
            });
        }

        Ok(parse_versions(&result.stdout)
            .iter()
            .any(|v| v == version.as_str()))
    }

    fn install_version(&self, version: &PinnedVersion) -> Result<()> {
        self.runner.run(
            &format!("Install Python {}", version),
            &self.program()?,
            &Self::args(&["install", version.as_str()]),
            CommandOptions::default(),
        )?;
        Ok(())
    }

    fn set_local_version(&self, version: &PinnedVersion) -> Result<()> {
        self.runner.run(
            "Set local Python version",
            &self.program()?,
            &Self::args(&["local", version.as_str()]),
            CommandOptions::default().in_dir(&self.project_root),
        )?;
        Ok(())
    }

    fn create_virtualenv(&self, version: &PinnedVersion, target: &Path) -> Result<()> {
        let mut args = Self::args(&["exec", "python", "-m", "venv"]);
        args.push(target.to_string_lossy().into_owned());

        self.runner.run(
            "Create virtual environment",
            &self.program()?,
            &args,
            CommandOptions::default()
                .in_dir(&self.project_root)
                .with_env("PYENV_VERSION", version.as_str())
                .without_env("VIRTUAL_ENV"),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_versions_trims_and_skips_blank() {
        let output = "3.8.13\n  3.9.11\n\n3.10.4/envs/tools\n";
        assert_eq!(
            parse_versions(output),
            vec!["3.8.13", "3.9.11", "3.10.4/envs/tools"]
        );
    }

    #[test]
    fn parse_versions_empty() {
        assert!(parse_versions("").is_empty());
    }

    #[test]
    fn unavailable_without_binary() {
        let temp = TempDir::new().unwrap();
        let pyenv = Pyenv::with_binary(
            None,
            temp.path(),
            InstallPlan::installer_script(),
            Runner::default(),
        );
        assert!(!pyenv.is_available());
        assert_eq!(pyenv.name(), "pyenv");

        let err = pyenv
            .install_version(&PinnedVersion::new("3.9.11"))
            .unwrap_err();
        assert!(matches!(err, ProvisionError::ToolchainMissing { .. }));
    }

    #[test]
    fn install_source_names_plan() {
        let temp = TempDir::new().unwrap();
        let pyenv = Pyenv::with_binary(
            None,
            temp.path(),
            InstallPlan {
                program: "brew".to_string(),
                args: vec!["install".to_string(), "pyenv".to_string()],
                via: "Homebrew".to_string(),
            },
            Runner::default(),
        );
        assert_eq!(pyenv.install_source(), "Homebrew (brew install pyenv)");
    }

    #[cfg(unix)]
    mod scripted {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;

        // A stand-in pyenv that logs its arguments and environment.
        fn fake_pyenv(dir: &Path) -> PathBuf {
            let path = dir.join("pyenv");
            let script = format!(
                "#!/bin/sh\n\
                 echo \"$@ PYENV_VERSION=$PYENV_VERSION VIRTUAL_ENV=$VIRTUAL_ENV\" >> {log}\n\
                 if [ \"$1\" = versions ]; then printf '3.8.13\\n3.9.11\\n'; fi\n",
                log = dir.join("log").display()
            );
            fs::write(&path, script).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn pyenv_in(temp: &TempDir) -> Pyenv {
            Pyenv::with_binary(
                Some(fake_pyenv(temp.path())),
                temp.path(),
                InstallPlan::installer_script(),
                Runner::default(),
            )
        }

        #[test]
        fn detects_installed_versions() {
            let temp = TempDir::new().unwrap();
            let pyenv = pyenv_in(&temp);

            assert!(pyenv
                .is_version_installed(&PinnedVersion::new("3.9.11"))
                .unwrap());
            assert!(!pyenv
                .is_version_installed(&PinnedVersion::new("3.10.4"))
                .unwrap());
        }

        #[test]
        fn create_virtualenv_sets_version_and_clears_virtual_env() {
            let temp = TempDir::new().unwrap();
            let pyenv = pyenv_in(&temp);

            pyenv
                .create_virtualenv(&PinnedVersion::new("3.9.11"), Path::new("venv"))
                .unwrap();

            let log = fs::read_to_string(temp.path().join("log")).unwrap();
            assert_eq!(
                log.trim(),
                "exec python -m venv venv PYENV_VERSION=3.9.11 VIRTUAL_ENV="
            );
        }

        #[test]
        fn set_local_version_runs_in_project() {
            let temp = TempDir::new().unwrap();
            let pyenv = pyenv_in(&temp);

            pyenv
                .set_local_version(&PinnedVersion::new("3.9.11"))
                .unwrap();

            let log = fs::read_to_string(temp.path().join("log")).unwrap();
            assert!(log.starts_with("local 3.9.11"));
        }
    }
}
