use std::{
    ops::DerefMut,
    sync::{Arc, Mutex},
};

use miette::Severity;
use nuru_diagnostic::{AnnotatedSource, CompilerDiagnostic};

use super::RawDiagnostic;

/// An accumulator for diagnostics.
///
/// The sink can be cheaply cloned, since it's a wrapper around a reference-counted
/// vector. Every compiler stage pushes [`RawDiagnostic`]s as it works; the sink
/// converts each one to a full [`CompilerDiagnostic`] on the way in, reading the
/// source file named by its `Location` (if any) to build the annotated snippet.
#[derive(Clone, Default)]
pub struct DiagnosticSink {
    diagnostics: Arc<Mutex<Vec<CompilerDiagnostic>>>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new diagnostic into the sink.
    pub fn push(&self, diagnostic: RawDiagnostic) {
        let compiled = Self::compile(diagnostic);
        self.diagnostics
            .lock()
            .expect("The lock around the diagnostic sink was poisoned")
            .push(compiled);
    }

    fn compile(diagnostic: RawDiagnostic) -> CompilerDiagnostic {
        let mut builder = CompilerDiagnostic::builder(diagnostic.message);
        builder = if diagnostic.is_error {
            builder.error()
        } else {
            builder.warning()
        };
        if let Some(code) = diagnostic.code {
            builder = builder.code(code);
        }
        if let Some(location) = &diagnostic.location {
            if let Ok(contents) = fs_err::read_to_string(&location.file) {
                let source = AnnotatedSource::new(location.file.clone(), contents)
                    .labeled(location, "here");
                builder = builder.source(source);
            }
        }
        if let Some(help) = diagnostic.help {
            builder = builder.help(nuru_diagnostic::HelpWithSnippet::new(help));
        }
        builder.build()
    }

    /// Drain the sink, retrieving all the diagnostics accumulated so far.
    pub fn drain(&self) -> Vec<CompilerDiagnostic> {
        std::mem::take(
            self.diagnostics
                .lock()
                .expect("The lock around the diagnostic sink was poisoned")
                .deref_mut(),
        )
    }

    /// Returns `true` if at least one diagnostic with severity "ERROR" has been
    /// pushed into the sink.
    pub fn has_errored(&self) -> bool {
        self.diagnostics
            .lock()
            .expect("The lock around the diagnostic sink was poisoned")
            .iter()
            .any(|d| d.severity_level() == Severity::Error)
    }

    /// Check if the sink is empty.
    pub fn is_empty(&self) -> bool {
        self.diagnostics
            .lock()
            .expect("The lock around the diagnostic sink was poisoned")
            .is_empty()
    }

    /// Get the number of diagnostics accumulated so far.
    pub fn len(&self) -> usize {
        self.diagnostics
            .lock()
            .expect("The lock around the diagnostic sink was poisoned")
            .len()
    }
}
