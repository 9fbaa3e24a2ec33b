//! Styles for sync and list output.

use console::Style;

/// Styles applied to report lines.
#[derive(Debug, Clone)]
pub struct TsyncTheme {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    /// Untouched files and verbose detail lines.
    pub dim: Style,
    /// Bundle header in `sync` output.
    pub header: Style,
    /// Bundle names in `list`.
    pub key: Style,
}

impl Default for TsyncTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl TsyncTheme {
    /// Colored styles.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            header: Style::new().bold().cyan(),
            key: Style::new().bold(),
        }
    }

    /// Styles that add no escape codes.
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            header: Style::new(),
            key: Style::new(),
        }
    }

    /// Pick colored or plain depending on the terminal.
    pub fn detect() -> Self {
        if should_use_colors() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    /// `✓` line for a written file or a finished run.
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// `⚠` line for a sync diagnostic.
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// `✗` line for a fatal error.
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// `○` line for a preserved or unchanged file.
    pub fn format_skipped(&self, msg: &str) -> String {
        format!("{}", self.dim.apply_to(format!("○ {}", msg)))
    }

    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(format!("▸ {}", title)))
    }
}

/// False when `NO_COLOR` is set or stdout is not a terminal.
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}
