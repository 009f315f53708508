//! pip-backed [`Installer`].
//!
//! Every invocation runs `<venv python> -m pip` from the project root with
//! the active environment's variables, so relative paths resolve against
//! the project.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ProvisionError, Result};
use crate::shell::Runner;

use super::activation::ActiveEnvironment;
use super::Installer;

const SDIST_EXTENSIONS: &[&str] = &[".tar.gz", ".tgz", ".zip"];

/// Build an editable install target: `path` or `path[extra1,extra2]`.
pub fn editable_spec(path: &Path, extras: &[String]) -> String {
    let path = path.to_string_lossy();
    if extras.is_empty() {
        path.into_owned()
    } else {
        format!("{}[{}]", path, extras.join(","))
    }
}

/// Find the downloaded source archive in `dir`.
///
/// When several are present the first by name wins, so the result does
/// not depend on directory iteration order.
pub fn find_sdist(dir: &Path) -> Result<Option<PathBuf>> {
    let mut archives: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .map(|name| {
                        let name = name.to_string_lossy();
                        SDIST_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
                    })
                    .unwrap_or(false)
        })
        .collect();
    archives.sort();
    Ok(archives.into_iter().next())
}

/// `pip <subcommand> [-q] <rest...>`
fn pip_args(subcommand: &str, quiet: bool, rest: &[&str]) -> Vec<String> {
    let mut args = vec!["-m".to_string(), "pip".to_string(), subcommand.to_string()];
    if quiet {
        args.push("-q".to_string());
    }
    args.extend(rest.iter().map(|a| a.to_string()));
    args
}

/// The pip package installer.
#[derive(Debug, Clone)]
pub struct Pip {
    project_root: PathBuf,
    runner: Runner,
}

impl Pip {
    pub fn new(project_root: &Path, runner: Runner) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            runner,
        }
    }

    fn pip(&self, step: &str, env: &ActiveEnvironment, args: Vec<String>) -> Result<()> {
        self.runner.run(
            step,
            &env.python().to_string_lossy(),
            &args,
            env.command_options().in_dir(&self.project_root),
        )?;
        Ok(())
    }
}

impl Installer for Pip {
    fn upgrade_self(&self, env: &ActiveEnvironment, quiet: bool) -> Result<()> {
        self.pip(
            "Upgrade pip",
            env,
            pip_args("install", quiet, &["--upgrade", "pip"]),
        )
    }

    fn download_sdist(
        &self,
        env: &ActiveEnvironment,
        requirement: &str,
        dest: &Path,
        quiet: bool,
    ) -> Result<PathBuf> {
        let dest_str = dest.to_string_lossy();
        self.pip(
            &format!("Download {}", requirement),
            env,
            pip_args(
                "download",
                quiet,
                &[
                    "--no-deps",
                    "--no-binary",
                    ":all:",
                    "-d",
                    &dest_str,
                    requirement,
                ],
            ),
        )?;

        find_sdist(dest)?.ok_or_else(|| ProvisionError::SdistNotFound {
            requirement: requirement.to_string(),
            dir: dest.to_path_buf(),
        })
    }

    fn install_requirements(
        &self,
        env: &ActiveEnvironment,
        file: &Path,
        quiet: bool,
    ) -> Result<()> {
        let file_str = file.to_string_lossy();
        self.pip(
            &format!("Install {}", file_str),
            env,
            pip_args("install", quiet, &["-r", &file_str]),
        )
    }

    fn install_editable(
        &self,
        env: &ActiveEnvironment,
        path: &Path,
        extras: &[String],
        quiet: bool,
    ) -> Result<()> {
        let spec = editable_spec(path, extras);
        self.pip(
            &format!("Install {} (editable)", spec),
            env,
            pip_args("install", quiet, &["-e", &spec]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn editable_spec_with_extras() {
        assert_eq!(
            editable_spec(Path::new("."), &["dev".to_string()]),
            ".[dev]"
        );
        assert_eq!(
            editable_spec(
                Path::new("plugins/pytest-local"),
                &["dev".to_string(), "docs".to_string()]
            ),
            "plugins/pytest-local[dev,docs]"
        );
    }

    #[test]
    fn editable_spec_without_extras() {
        assert_eq!(editable_spec(Path::new("tests/plugin"), &[]), "tests/plugin");
    }

    #[test]
    fn pip_args_quiet_follows_subcommand() {
        assert_eq!(
            pip_args("install", true, &["--upgrade", "pip"]),
            vec!["-m", "pip", "install", "-q", "--upgrade", "pip"]
        );
        assert_eq!(
            pip_args("install", false, &["-r", "requirements-dev.txt"]),
            vec!["-m", "pip", "install", "-r", "requirements-dev.txt"]
        );
    }

    #[test]
    fn find_sdist_picks_archive() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("notes.txt"), "").unwrap();
        fs::write(temp.path().join("somepkg-1.2.0.tar.gz"), "").unwrap();

        let found = find_sdist(temp.path()).unwrap();
        assert_eq!(found, Some(temp.path().join("somepkg-1.2.0.tar.gz")));
    }

    #[test]
    fn find_sdist_accepts_zip() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("legacy-0.1.zip"), "").unwrap();

        let found = find_sdist(temp.path()).unwrap();
        assert_eq!(found, Some(temp.path().join("legacy-0.1.zip")));
    }

    #[test]
    fn find_sdist_none_when_empty() {
        let temp = TempDir::new().unwrap();
        assert_eq!(find_sdist(temp.path()).unwrap(), None);
    }

    #[test]
    fn find_sdist_ignores_wheels() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("somepkg-1.2.0-py3-none-any.whl"), "").unwrap();
        assert_eq!(find_sdist(temp.path()).unwrap(), None);
    }
}
