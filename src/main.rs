//! pyboot CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use pyboot::cli::{normalize_args, Cli, Command, ProvisionCommand};
use pyboot::shell::is_ci;
use pyboot::ui::{create_ui, hints, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("pyboot=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pyboot=info"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    init_tracing(cli.debug);

    tracing::debug!("pyboot starting with args: {:?}", cli);

    let output_mode = OutputMode::from_flags(cli.verbose, cli.quiet);

    // Handle --no-color
    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let is_interactive = !cli.non_interactive && !is_ci();
    let mut ui = create_ui(is_interactive, output_mode);

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            ui.error(&format!("Cannot read the current directory: {}", e));
            return ExitCode::from(1);
        }
    };

    let command = ProvisionCommand::new(
        &cli.project_root(&cwd),
        cli.config.clone(),
        cli.install_request(&cwd),
    );

    match command.execute(ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            let hint = hints::for_error(&e);
            match e.command_output() {
                Some((cmd, output)) => ui.show_error_block(cmd, output, hint.as_deref()),
                None => {
                    if let Some(hint) = hint {
                        ui.show_hint(&hint);
                    }
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}
