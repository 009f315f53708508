//! External command execution and environment lookup.

pub mod command;
pub mod path;
pub mod platform;
pub mod runner;

pub use command::{display_command, execute, CommandOptions, CommandResult};
pub use path::{locate_manager, parse_system_path, resolve_tool_path};
pub use platform::{inherited_virtual_env, is_ci};
pub use runner::Runner;
