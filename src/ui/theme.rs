//! Visual theme and styling.

use console::Style;

/// Styles for everything pyboot prints.
///
/// [`PybootTheme::plain`] renders without escape codes, which is what
/// `--no-color`, `NO_COLOR`, and redirected output get.
#[derive(Debug, Clone)]
pub struct PybootTheme {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    /// Skipped steps.
    pub dim: Style,
    pub highlight: Style,
    /// The 🐍 banner.
    pub header: Style,
    /// Failed command lines in error blocks.
    pub command: Style,
    /// Error block box drawing.
    pub border: Style,
    pub hint: Style,
}

impl Default for PybootTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl PybootTheme {
    /// The colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow().bold(),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().cyan().bold(),
            command: Style::new().cyan(),
            border: Style::new().dim(),
            hint: Style::new().yellow(),
        }
    }

    /// No styling at all.
    pub fn plain() -> Self {
        let none = Style::new();
        Self {
            success: none.clone(),
            warning: none.clone(),
            error: none.clone(),
            dim: none.clone(),
            highlight: none.clone(),
            header: none.clone(),
            command: none.clone(),
            border: none.clone(),
            hint: none,
        }
    }

    /// Colored when the terminal and environment allow it, plain otherwise.
    pub fn detect() -> Self {
        if should_use_colors() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    fn mark(style: &Style, icon: &str, msg: &str) -> String {
        style.apply_to(format!("{} {}", icon, msg)).to_string()
    }

    pub fn format_success(&self, msg: &str) -> String {
        Self::mark(&self.success, "✓", msg)
    }

    pub fn format_warning(&self, msg: &str) -> String {
        Self::mark(&self.warning, "⚠", msg)
    }

    pub fn format_error(&self, msg: &str) -> String {
        Self::mark(&self.error, "✗", msg)
    }

    pub fn format_skipped(&self, msg: &str) -> String {
        Self::mark(&self.dim, "○", msg)
    }

    /// The banner printed once at the start of a run.
    pub fn format_header(&self, title: &str) -> String {
        format!(
            "{} {}",
            self.header.apply_to("🐍"),
            self.header.apply_to(title)
        )
    }

    /// Render a failed command and its captured output as a boxed block.
    pub fn format_error_block(&self, command: &str, output: &str, hint: Option<&str>) -> String {
        let b = &self.border;
        let mut lines = vec![
            format!("    {}", b.apply_to("┌─ Command ──────────────────────────")),
            format!("    {} {}", b.apply_to("│"), self.command.apply_to(command)),
        ];

        if !output.is_empty() {
            lines.push(format!(
                "    {}",
                b.apply_to("├─ Output ───────────────────────────")
            ));
            lines.extend(
                output
                    .lines()
                    .map(|line| format!("    {} {}", b.apply_to("│"), line)),
            );
        }
        lines.push(format!(
            "    {}",
            b.apply_to("└────────────────────────────────────")
        ));

        if let Some(h) = hint {
            lines.push(String::new());
            lines.push(format!("    {}", self.hint.apply_to(format!("Hint: {}", h))));
        }
        lines.join("\n")
    }
}

/// Whether stdout gets colored output.
///
/// Off when `NO_COLOR` is set, when `--no-color` turned `console` colors
/// off, or when stdout is not a terminal.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    console::colors_enabled() && console::Term::stdout().is_term()
}
