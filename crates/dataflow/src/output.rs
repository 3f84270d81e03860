//! Terminal output for generated artifacts and status lines.
//!
//! Artifacts go to stdout uncolored so they can be piped or redirected;
//! status lines go to stderr with color.

use std::fmt::Display;

use console::{Style, Term};

/// Terminal output formatter.
pub(crate) struct Output {
    artifacts: Term,
    status: Term,
    done: Style,
    notice: Style,
    alert: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            artifacts: Term::stdout(),
            status: Term::stderr(),
            done: Style::new().green(),
            notice: Style::new().yellow(),
            alert: Style::new().red(),
        }
    }

    /// Write an artifact to stdout.
    pub(crate) fn artifact(&self, text: &str) -> std::io::Result<()> {
        self.artifacts.write_line(text.trim_end())
    }

    /// Report a generated artifact (green).
    pub(crate) fn generated(&self, what: &str) {
        self.status_line(&self.done, &format!("Generated {what}"));
    }

    /// Report that a fallback payload replaced the response (yellow).
    pub(crate) fn fallback(&self, what: &str) {
        self.status_line(
            &self.notice,
            &format!("Warning: response was not a valid {what}, using fallback output"),
        );
    }

    /// Report a command failure (red).
    pub(crate) fn failure(&self, err: &dyn Display) {
        self.status_line(&self.alert, &format!("Error: {err}"));
    }

    fn status_line(&self, style: &Style, msg: &str) {
        let _ = self.status.write_line(&style.apply_to(msg).to_string());
    }
}
