//! Rich, span-annotated diagnostics shared between `nuruc` and `nuruc_cli`.
//!
//! `nuruc`'s stages never print directly: they build a [`CompilerDiagnostic`] and hand
//! it to a [`nuruc::diagnostic::DiagnosticSink`]-equivalent accumulator, which the CLI
//! drains and renders through `miette`'s graphical handler at the end of the run.

use std::fmt::{Display, Formatter};

use miette::{Diagnostic, LabeledSpan, Severity, SourceSpan};
use nuru_ir::{DiagnosticCode, Location};

mod utils;

pub use utils::{AnyhowBridge, InteropError};

/// A source file, named for display purposes, annotated with zero or more labeled
/// spans. Cheap to build from a [`Location`] plus the file contents `nuruc` already
/// had in hand while walking the host AST.
#[derive(Debug, Clone)]
pub struct AnnotatedSource {
    name: String,
    contents: String,
    labels: Vec<LabeledSpan>,
}

impl AnnotatedSource {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
            labels: Vec::new(),
        }
    }

    pub fn labeled(mut self, location: &Location, message: impl Into<String>) -> Self {
        self.labels.push(LabeledSpan::new_with_span(
            Some(message.into()),
            SourceSpan::new(location.offset.into(), 0),
        ));
        self
    }
}

/// An optional "here's how to fix it" note, sometimes carrying its own code snippet
/// (e.g. suggesting the corrected pattern string).
#[derive(Debug, Clone)]
pub struct HelpWithSnippet {
    pub message: String,
    pub snippet: Option<AnnotatedSource>,
}

impl HelpWithSnippet {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            snippet: None,
        }
    }
}

/// A fully-formed diagnostic: a stable [`DiagnosticCode`], a severity, a one-line
/// message, an optional annotated source snippet and an optional help note.
#[derive(Debug, Clone)]
pub struct CompilerDiagnostic {
    code: Option<DiagnosticCode>,
    severity: Severity,
    message: String,
    source: Option<AnnotatedSource>,
    help: Option<HelpWithSnippet>,
}

impl Display for CompilerDiagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CompilerDiagnostic {}

impl Diagnostic for CompilerDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.code.map(|c| Box::new(c) as Box<dyn Display + 'a>)
    }

    fn severity(&self) -> Option<Severity> {
        Some(self.severity)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h.message.clone()) as Box<dyn Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.source
            .as_ref()
            .map(|s| &s.contents as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        self.source
            .as_ref()
            .map(|s| Box::new(s.labels.clone().into_iter()) as Box<dyn Iterator<Item = _>>)
    }
}

impl CompilerDiagnostic {
    pub fn builder(message: impl Into<String>) -> CompilerDiagnosticBuilder {
        CompilerDiagnosticBuilder {
            code: None,
            severity: Severity::Error,
            message: message.into(),
            source: None,
            help: None,
        }
    }

    pub fn code(&self) -> Option<DiagnosticCode> {
        self.code
    }

    pub fn severity_level(&self) -> Severity {
        self.severity
    }
}

pub struct CompilerDiagnosticBuilder {
    code: Option<DiagnosticCode>,
    severity: Severity,
    message: String,
    source: Option<AnnotatedSource>,
    help: Option<HelpWithSnippet>,
}

impl CompilerDiagnosticBuilder {
    pub fn code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn error(mut self) -> Self {
        self.severity = Severity::Error;
        self
    }

    pub fn warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    pub fn info(mut self) -> Self {
        self.severity = Severity::Advice;
        self
    }

    pub fn source(mut self, source: AnnotatedSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn help(mut self, help: HelpWithSnippet) -> Self {
        self.help = Some(help);
        self
    }

    pub fn build(self) -> CompilerDiagnostic {
        CompilerDiagnostic {
            code: self.code,
            severity: self.severity,
            message: self.message,
            source: self.source,
            help: self.help,
        }
    }
}
