//! Executable lookup on PATH and at well-known install locations.
//!
//! Version managers are often installed but not yet on PATH in a
//! non-interactive process (the shell init that adds them hasn't run).
//! Lookups therefore take explicit directory lists and an env lookup
//! function so callers can probe extra locations and tests can stay
//! off the real environment.

use std::path::{Path, PathBuf};

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable. Does NOT use
/// the `which` command; its behavior varies across systems.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    for dir in path_entries {
        for name in candidate_names(tool) {
            let candidate = dir.join(name);
            if candidate.is_file() && is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

#[cfg(windows)]
fn candidate_names(tool: &str) -> Vec<String> {
    vec![
        format!("{}.exe", tool),
        format!("{}.bat", tool),
        tool.to_string(),
    ]
}

#[cfg(not(windows))]
fn candidate_names(tool: &str) -> Vec<String> {
    vec![tool.to_string()]
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Locate a manager binary: `$<env_var>/<subpath>` first, then PATH,
/// then `$HOME/<home_default>/<subpath>`.
pub fn locate_manager<F>(
    tool: &str,
    env_var: &str,
    home_default: &str,
    binary_subpath: &str,
    path_entries: &[PathBuf],
    env_fn: &F,
) -> Option<PathBuf>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    // 1. Relocated installs
    if let Ok(root) = env_fn(env_var) {
        let candidate = PathBuf::from(root).join(binary_subpath);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }

    // 2. Already on PATH
    if let Some(found) = resolve_tool_path(tool, path_entries) {
        return Some(found);
    }

    // 3. Default install location
    let home = env_fn("HOME").or_else(|_| env_fn("USERPROFILE")).ok()?;
    let candidate = PathBuf::from(home).join(home_default).join(binary_subpath);
    if candidate.is_file() && is_executable(&candidate) {
        Some(candidate)
    } else {
        None
    }
}
