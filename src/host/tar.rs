//! tar-backed [`Archive`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::shell::{CommandOptions, Runner};

use super::Archive;

/// Directory name an sdist unpacks to: the archive name without its
/// extension (`somepkg-1.2.0.tar.gz` → `somepkg-1.2.0`).
pub fn sdist_root_name(archive: &Path) -> Option<String> {
    let name = archive.file_name()?.to_string_lossy();
    [".tar.gz", ".tgz", ".tar.bz2", ".tar", ".zip"]
        .iter()
        .find_map(|ext| name.strip_suffix(ext))
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}

/// Locate the extracted tree under `dest`.
///
/// Prefers the directory named after the archive, then a single
/// top-level directory, then `dest` itself.
pub fn extracted_root(archive: &Path, dest: &Path) -> Result<PathBuf> {
    if let Some(name) = sdist_root_name(archive) {
        let candidate = dest.join(name);
        if candidate.is_dir() {
            return Ok(candidate);
        }
    }

    let dirs: Vec<PathBuf> = fs::read_dir(dest)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();

    match dirs.as_slice() {
        [only] => Ok(only.clone()),
        _ => Ok(dest.to_path_buf()),
    }
}

/// Archive extraction with the system `tar`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tar {
    runner: Runner,
}

impl Tar {
    pub fn new(runner: Runner) -> Self {
        Self { runner }
    }
}

impl Archive for Tar {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dest)?;
        let args = vec![
            "-xf".to_string(),
            archive.to_string_lossy().into_owned(),
            "-C".to_string(),
            dest.to_string_lossy().into_owned(),
        ];
        self.runner
            .run("Extract source distribution", "tar", &args, CommandOptions::default())?;
        extracted_root(archive, dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn root_name_strips_archive_extensions() {
        assert_eq!(
            sdist_root_name(Path::new("/tmp/somepkg-1.2.0.tar.gz")),
            Some("somepkg-1.2.0".to_string())
        );
        assert_eq!(
            sdist_root_name(Path::new("legacy-0.1.zip")),
            Some("legacy-0.1".to_string())
        );
        assert_eq!(
            sdist_root_name(Path::new("pkg-2.0.tgz")),
            Some("pkg-2.0".to_string())
        );
        assert_eq!(sdist_root_name(Path::new("README")), None);
        assert_eq!(sdist_root_name(Path::new(".tar.gz")), None);
    }

    #[test]
    fn extracted_root_prefers_named_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("other")).unwrap();
        fs::create_dir(temp.path().join("somepkg-1.2.0")).unwrap();

        let root = extracted_root(Path::new("somepkg-1.2.0.tar.gz"), temp.path()).unwrap();
        assert_eq!(root, temp.path().join("somepkg-1.2.0"));
    }

    #[test]
    fn extracted_root_falls_back_to_single_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("SomePkg-1.2.0")).unwrap();

        let root = extracted_root(Path::new("somepkg-1.2.0.tar.gz"), temp.path()).unwrap();
        assert_eq!(root, temp.path().join("SomePkg-1.2.0"));
    }

    #[test]
    fn extracted_root_falls_back_to_dest() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("setup.py"), "").unwrap();

        let root = extracted_root(Path::new("flat.tar.gz"), temp.path()).unwrap();
        assert_eq!(root, temp.path());
    }

    #[cfg(unix)]
    #[test]
    fn extracts_real_tarball() {
        use std::process::Command;

        let temp = TempDir::new().unwrap();
        let src = temp.path().join("build");
        fs::create_dir_all(src.join("somepkg-1.2.0")).unwrap();
        fs::write(src.join("somepkg-1.2.0/requirements.txt"), "six\n").unwrap();
        let archive = temp.path().join("somepkg-1.2.0.tar.gz");
        let status = Command::new("tar")
            .arg("-czf")
            .arg(&archive)
            .arg("-C")
            .arg(&src)
            .arg("somepkg-1.2.0")
            .status();
        if !matches!(status, Ok(s) if s.success()) {
            return;
        }

        let dest = temp.path().join("extracted");
        let root = Tar::default().extract(&archive, &dest).unwrap();
        assert_eq!(root, dest.join("somepkg-1.2.0"));
        assert!(root.join("requirements.txt").is_file());
    }
}
