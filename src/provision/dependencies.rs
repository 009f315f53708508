//! Dependency installation into the active environment.

use std::path::Path;

use anyhow::anyhow;

use crate::config::{DependencyConfig, SdistDependency, CONFIG_FILE_NAME};
use crate::error::Result;
use crate::host::{ActiveEnvironment, HostEnvironment};
use crate::ui::UserInterface;

use super::with_spinner;

/// Install everything the project needs, in a fixed order:
///
/// 1. upgrade pip
/// 2. requirements of each configured source distribution
/// 3. the development requirements file
/// 4. the project itself, editable, with its extras
/// 5. the in-repo test plugin, editable
///
/// Steps 2 and 5 only run when `.pyboot.yml` lists them. The first failure
/// stops the sequence.
pub fn install_dependencies(
    host: &HostEnvironment,
    project_root: &Path,
    deps: &DependencyConfig,
    quiet: bool,
    ui: &mut dyn UserInterface,
) -> Result<()> {
    let env = host
        .active()
        .cloned()
        .ok_or_else(|| anyhow!("no virtual environment is active"))?;

    with_spinner(ui, "Upgrading pip", || {
        host.installer().upgrade_self(&env, quiet)
    })?;

    if deps.sdist.is_empty() {
        tracing::debug!(
            "No dependencies.sdist in {}, skipping sdist requirements",
            project_root.join(CONFIG_FILE_NAME).display()
        );
    } else {
        let staging = tempfile::Builder::new().prefix("pyboot-sdist-").tempdir()?;
        for (idx, dep) in deps.sdist.iter().enumerate() {
            let stage = staging.path().join(idx.to_string());
            with_spinner(
                ui,
                &format!("Installing requirements of {}", dep.requirement),
                || install_sdist_requirements(host, &env, dep, &stage, quiet),
            )?;
        }
    }

    // Passed through even when absent; pip reports the missing file.
    if let Some(dev) = &deps.dev_requirements {
        with_spinner(ui, &format!("Installing {}", dev.display()), || {
            host.installer().install_requirements(&env, dev, quiet)
        })?;
    }

    let extras = if deps.extras.is_empty() {
        String::new()
    } else {
        format!(" [{}]", deps.extras.join(","))
    };
    with_spinner(ui, &format!("Installing project{}", extras), || {
        host.installer()
            .install_editable(&env, Path::new("."), &deps.extras, quiet)
    })?;

    match &deps.test_plugin {
        Some(plugin) => {
            with_spinner(ui, &format!("Installing {}", plugin.display()), || {
                host.installer().install_editable(&env, plugin, &[], quiet)
            })?;
        }
        None => tracing::debug!("No dependencies.test_plugin configured"),
    }

    Ok(())
}

fn install_sdist_requirements(
    host: &HostEnvironment,
    env: &ActiveEnvironment,
    dep: &SdistDependency,
    stage: &Path,
    quiet: bool,
) -> Result<()> {
    let archive =
        host.installer()
            .download_sdist(env, &dep.requirement, &stage.join("download"), quiet)?;
    let root = host.archive().extract(&archive, &stage.join("src"))?;
    host.installer()
        .install_requirements(env, &root.join(&dep.requirements_file), quiet)
}
