//! Host package manager detection for installing the version manager.

use std::path::PathBuf;

use crate::shell::resolve_tool_path;

/// Installer script used when no supported package manager is present.
pub const PYENV_INSTALLER_SCRIPT: &str = "curl -fsSL https://pyenv.run | bash";

/// System package managers that ship pyenv.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemPackageManager {
    Homebrew,
    Pacman,
    Dnf,
}

impl SystemPackageManager {
    /// Detect the first supported package manager on the search path.
    ///
    /// Homebrew wins over distribution package managers so Linuxbrew users
    /// keep pyenv under their own prefix.
    pub fn detect(path_entries: &[PathBuf]) -> Option<Self> {
        [Self::Homebrew, Self::Pacman, Self::Dnf]
            .into_iter()
            .find(|pm| resolve_tool_path(pm.binary(), path_entries).is_some())
    }

    /// Executable name.
    pub fn binary(&self) -> &'static str {
        match self {
            Self::Homebrew => "brew",
            Self::Pacman => "pacman",
            Self::Dnf => "dnf",
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Homebrew => "Homebrew",
            Self::Pacman => "pacman",
            Self::Dnf => "dnf",
        }
    }

    /// Command that installs pyenv with this package manager.
    pub fn install_plan(&self) -> InstallPlan {
        let (program, args): (&str, &[&str]) = match self {
            Self::Homebrew => ("brew", &["install", "pyenv"]),
            Self::Pacman => ("sudo", &["pacman", "-S", "--noconfirm", "pyenv"]),
            Self::Dnf => ("sudo", &["dnf", "install", "-y", "pyenv"]),
        };
        InstallPlan {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            via: self.name().to_string(),
        }
    }
}

/// How the version manager will be installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    /// Program to run.
    pub program: String,
    /// Its arguments.
    pub args: Vec<String>,
    /// Human-readable source, shown in the consent prompt.
    pub via: String,
}

impl InstallPlan {
    /// Run a user-supplied shell command.
    pub fn shell(command: &str, via: &str) -> Self {
        Self {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), command.to_string()],
            via: via.to_string(),
        }
    }

    /// The upstream installer script.
    pub fn installer_script() -> Self {
        Self::shell(PYENV_INSTALLER_SCRIPT, "the pyenv installer script")
    }

    /// Choose a plan: a configured command, else the detected package
    /// manager, else the installer script.
    pub fn for_host(install_command: Option<&str>, path_entries: &[PathBuf]) -> Self {
        if let Some(command) = install_command.filter(|c| !c.trim().is_empty()) {
            return Self::shell(command, "the configured install command");
        }
        SystemPackageManager::detect(path_entries)
            .map(|pm| pm.install_plan())
            .unwrap_or_else(Self::installer_script)
    }
}
