//! Terminal rendering for [`nuru_diagnostic::CompilerDiagnostic`] reports.
//!
//! Kept as its own crate (rather than folded into `nuru_diagnostic`) so that a
//! non-interactive consumer of `nuruc` — a build script, an IDE integration — can
//! depend on the diagnostic *model* without pulling in `miette`'s terminal-width
//! detection and graphical renderer.

use std::io::IsTerminal;

use miette::{GraphicalReportHandler, GraphicalTheme, ReportHandler};

/// Render a single diagnostic to a string using `miette`'s graphical handler,
/// falling back to a narrow, colorless theme when stdout isn't a terminal (CI logs,
/// `cargo px check` piped into a file).
pub fn render(diagnostic: &(dyn miette::Diagnostic)) -> String {
    let theme = if std::io::stdout().is_terminal() {
        GraphicalTheme::unicode()
    } else {
        GraphicalTheme::unicode_nocolor()
    };
    let handler = GraphicalReportHandler::new_themed(theme);
    let mut out = String::new();
    handler
        .render_report(&mut out, diagnostic)
        .expect("rendering a diagnostic into a String should never fail");
    out
}

/// Render a batch of diagnostics, one after another, separated by a blank line.
pub fn render_all<'a>(diagnostics: impl IntoIterator<Item = &'a dyn miette::Diagnostic>) -> String {
    diagnostics
        .into_iter()
        .map(render)
        .collect::<Vec<_>>()
        .join("\n")
}
