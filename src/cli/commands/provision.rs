//! The provisioning command.
//!
//! `pyboot -d <dir>` loads the project configuration, builds a host from
//! the real tools on PATH, and runs the provisioning workflow.

use std::path::{Path, PathBuf};

use crate::config::{load_config, validate, ProvisionConfig};
use crate::error::Result;
use crate::host::HostEnvironment;
use crate::provision::{provision, IdentityOutcome, InstallRequest, ProvisionReport, Reconciliation};
use crate::shell::Runner;
use crate::ui::{hints, UserInterface};

use super::command::{Command, CommandResult};

/// The provision command implementation.
pub struct ProvisionCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    request: InstallRequest,
}

impl ProvisionCommand {
    /// Create a new provision command.
    pub fn new(project_root: &Path, config_path: Option<PathBuf>, request: InstallRequest) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path,
            request,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the install request.
    pub fn request(&self) -> &InstallRequest {
        &self.request
    }

    fn load(&self) -> Result<ProvisionConfig> {
        let config = load_config(&self.project_root, self.config_path.as_deref())?;
        validate(&config)?;
        Ok(config)
    }

    /// Run the workflow against an already assembled host.
    pub fn run_with(
        &self,
        host: &mut HostEnvironment,
        config: &ProvisionConfig,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let report = provision(host, &self.request, &self.project_root, config, ui)?;
        self.summarize(&report, ui);
        Ok(CommandResult::success())
    }

    fn summarize(&self, report: &ProvisionReport, ui: &mut dyn UserInterface) {
        let target = &self.request.target_directory;

        if report.reconciliation == Reconciliation::Reused {
            ui.message("Existing environment was kept; dependencies were refreshed in place");
        }
        if report.auxiliary.identity == IdentityOutcome::Declined {
            ui.message("Git identity is still unset");
        }

        ui.success(&format!(
            "Environment ready at {} (Python {})",
            target.display(),
            report.version
        ));
        ui.show_hint(&hints::after_success(target));
    }
}

impl Command for ProvisionCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = self.load()?;
        let runner = Runner::new(ui.output_mode());
        let mut host = HostEnvironment::system(&self.project_root, &config, runner);
        self.run_with(&mut host, &config, ui)
    }
}
