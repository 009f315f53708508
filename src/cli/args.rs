//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::Parser;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::provision::InstallRequest;

/// pyboot - Python development environment provisioning.
#[derive(Debug, Parser)]
#[command(name = "pyboot")]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "Source distribution requirements (dependencies.sdist) and the test plugin \
                  (dependencies.test_plugin) are installed only when .pyboot.yml lists them."
)]
pub struct Cli {
    /// Where to create the virtual environment
    #[arg(short, long, value_name = "PATH")]
    pub directory: PathBuf,

    /// Echo every command and stream tool output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress installer output (ignored with --verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to project root (overrides current directory)
    #[arg(short, long, value_name = "PATH")]
    pub project: Option<PathBuf>,

    /// Path to config file (overrides default .pyboot.yml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Never prompt; answer from PYBOOT_PROMPT_* or defaults
    #[arg(long)]
    pub non_interactive: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// The install request, with a relative target resolved against `cwd`.
    pub fn install_request(&self, cwd: &Path) -> InstallRequest {
        InstallRequest::new(self.directory.clone(), self.verbose, self.quiet).resolved_against(cwd)
    }

    /// The project root, resolved against `cwd`.
    pub fn project_root(&self, cwd: &Path) -> PathBuf {
        match &self.project {
            Some(p) if p.is_relative() => cwd.join(p),
            Some(p) => p.clone(),
            None => cwd.to_path_buf(),
        }
    }
}

/// Long options also accepted with a single dash (`-directory`).
const LONG_OPTIONS: &[&str] = &[
    "directory",
    "verbose",
    "quiet",
    "help",
    "project",
    "config",
    "version",
];

/// Options whose next argument is a value, never an option.
const VALUE_OPTIONS: &[&str] = &[
    "-d",
    "--directory",
    "-p",
    "--project",
    "-c",
    "--config",
];

/// Rewrite single-dash long options to their double-dash form.
///
/// `-directory venv`, `-directory=venv`, and `-help` become
/// `--directory venv`, `--directory=venv`, and `--help`. Option values
/// and everything after `--` are left alone.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    let mut expect_value = false;
    let mut passthrough = false;

    for (idx, arg) in args.into_iter().enumerate() {
        // argv[0]
        if idx == 0 || passthrough || expect_value {
            expect_value = false;
            out.push(arg);
            continue;
        }

        let Some(text) = arg.to_str() else {
            out.push(arg);
            continue;
        };

        if text == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }

        let rewritten = text
            .strip_prefix('-')
            .filter(|rest| !rest.starts_with('-'))
            .and_then(|rest| {
                let name = rest.split('=').next().unwrap_or(rest);
                LONG_OPTIONS
                    .contains(&name)
                    .then(|| format!("--{}", rest))
            });

        let normalized = rewritten.unwrap_or_else(|| text.to_string());
        expect_value = VALUE_OPTIONS.contains(&normalized.as_str());
        out.push(OsString::from(normalized));
    }

    out
}
