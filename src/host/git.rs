//! git-backed [`VersionControl`].

use std::path::{Path, PathBuf};

use crate::error::{ProvisionError, Result};
use crate::shell::{display_command, CommandOptions, Runner};

use super::{ConfigScope, VersionControl};

/// git configuration access.
///
/// Local settings are read and written from the project root.
#[derive(Debug, Clone)]
pub struct Git {
    project_root: PathBuf,
    runner: Runner,
}

impl Git {
    pub fn new(project_root: &Path, runner: Runner) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            runner,
        }
    }

    fn options(&self) -> CommandOptions {
        CommandOptions::default().in_dir(&self.project_root)
    }
}

impl VersionControl for Git {
    fn get_config(&self, key: &str, scope: ConfigScope) -> Result<Option<String>> {
        let args = vec![
            "config".to_string(),
            scope.flag().to_string(),
            "--get".to_string(),
            key.to_string(),
        ];
        let result = self.runner.query("git", &args, self.options())?;

        match result.exit_code {
            Some(0) => {
                let value = result.stdout.trim();
                Ok((!value.is_empty()).then(|| value.to_string()))
            }
            // `git config --get` exits 1 when the key is unset.
            Some(1) => Ok(None),
            code => Err(ProvisionError::InstallFailure {
                step: format!("Read git {}", key),
                command: display_command("git", &args),
                code,
                output: result.diagnostic_output().to_string(),
            }),
        }
    }

    fn set_config(&self, key: &str, value: &str, scope: ConfigScope) -> Result<()> {
        let args = vec![
            "config".to_string(),
            scope.flag().to_string(),
            key.to_string(),
            value.to_string(),
        ];
        self.runner
            .run(&format!("Set git {}", key), "git", &args, self.options())?;
        Ok(())
    }
}
