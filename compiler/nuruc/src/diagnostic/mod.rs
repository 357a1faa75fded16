//! A toolkit to assemble and report errors and warnings to the user.
//!
//! Every stage works with a plain [`RawDiagnostic`] — source-span-plus-message,
//! nothing miette-specific — so the pattern/dsl/attrs/handler/combine modules don't
//! need to depend on `nuru_diagnostic` or carry source text around. The [`DiagnosticSink`]
//! converts them to full [`nuru_diagnostic::CompilerDiagnostic`]s (with a rendered
//! source snippet) only once, at the point they're handed to `nuruc_cli`.

mod sink;

pub use sink::DiagnosticSink;

use nuru_ir::{DiagnosticCode, Location};

#[derive(Debug, Clone)]
pub struct RawDiagnostic {
    pub code: Option<DiagnosticCode>,
    pub message: String,
    pub location: Option<Location>,
    pub is_error: bool,
    pub help: Option<String>,
}

impl RawDiagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            location: None,
            is_error: true,
            help: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            location: None,
            is_error: false,
            help: None,
        }
    }

    pub fn code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}
