//! The Nuru compiler.
//!
//! Drives the nine stages from SPEC_FULL.md §2 over a set of source files: parses
//! each one with `syn`, runs the DSL interpreter (§4.3) and the attributed route
//! scanner (§4.4) over every file, resolves the attributed routes crate-wide (group
//! chains and trait sightings are routinely declared in a different file than the
//! struct that uses them), merges and validates every `AppModel` found (§4.6), then
//! emits one generated dispatcher source file (§4.7).
//!
//! Each stage is a pure function over its input snapshot, per §5: nothing here holds
//! onto process-wide mutable state beyond the [`diagnostic::DiagnosticSink`] passed
//! through the call, which is itself just an append-only accumulator.

pub mod attrs;
pub mod combine;
pub mod diagnostic;
pub mod dsl;
pub mod emit;
pub mod handler;
pub mod pattern;
pub mod persistence;
mod util;

use combine::deps::ConstructorIndex;
use diagnostic::{DiagnosticSink, RawDiagnostic};
use nuru_diagnostic::CompilerDiagnostic;
use nuru_ir::{codes, AppModel};
use rayon::prelude::*;

/// One source file handed to the compiler: a path (used only for diagnostic spans
/// and `syn`'s own error messages) and its contents.
pub struct SourceFile {
    pub path: String,
    pub source: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// The result of a successful compilation.
pub struct CompileOutput {
    /// The generated dispatcher source, already run through `prettyplease`.
    pub generated_source: String,
    /// Non-fatal diagnostics (warnings, info) collected along the way. Errors abort
    /// the compilation instead (see [`compile`]'s return type).
    pub diagnostics: Vec<CompilerDiagnostic>,
}

/// Run the full compiler pipeline over every file in `files`.
///
/// On success, returns the generated source plus any warnings. On failure — at least
/// one error-severity diagnostic anywhere in the crate — returns every diagnostic
/// collected and emits no source at all, per §5's "a canceled run must leave no
/// emitted source" and §7's error-propagation table (a `NURU_D001`/`NURU051`/
/// `NURU_H002` aborts emission; a parse or per-route validation failure only drops
/// the offending route and lets the rest of the app through).
pub fn compile(files: &[SourceFile]) -> Result<CompileOutput, Vec<CompilerDiagnostic>> {
    let sink = DiagnosticSink::new();

    let mut asts = Vec::with_capacity(files.len());
    for file in files {
        match syn::parse_file(&file.source) {
            Ok(ast) => asts.push((file, ast)),
            Err(err) => {
                sink.push(
                    RawDiagnostic::error(format!("failed to parse `{}`: {err}", file.path))
                        .code(codes::NURU_P001_MALFORMED_BRACE),
                );
            }
        }
    }

    // Stage 4 + stage 5 are independent per compilation unit (§5): each file's DSL
    // extraction, attribute scan, and constructor scan only ever reads that one
    // file's AST, so they run across a rayon thread pool and are folded back
    // together below. `DiagnosticSink` is the one piece of shared state, and it's
    // built to be pushed into concurrently (§5: "the only process-wide state is the
    // host compiler's diagnostic sink ... write-append with per-unit identities").
    let per_file: Vec<(Vec<AppModel>, attrs::ScanResult, ConstructorIndex)> = asts
        .par_iter()
        .map(|(file, ast)| {
            let apps = dsl::extract_apps(ast, &file.path, &file.source, &sink);
            let file_scan = attrs::scan_file(ast, &file.path, &file.source, &sink);
            let mut constructors = ConstructorIndex::default();
            combine::deps::scan_file(ast, &mut constructors);
            (apps, file_scan, constructors)
        })
        .collect();

    let mut apps: Vec<AppModel> = Vec::new();
    let mut scan = attrs::ScanResult::default();
    let mut constructors = ConstructorIndex::default();
    for (file_apps, file_scan, file_constructors) in per_file {
        apps.extend(file_apps);
        scan.groups.extend(file_scan.groups);
        scan.endpoints.extend(file_scan.endpoints);
        scan.trait_sightings.extend(file_scan.trait_sightings);
        scan.handler_sites.extend(file_scan.handler_sites);
        for (name, deps) in file_constructors {
            constructors.entry(name).or_insert(deps);
        }
    }

    if sink.has_errored() {
        return Err(sink.drain());
    }

    // Stage 5 (continued): cross-file resolution — group-prefix chains, message
    // types from trait sightings, alias explosion — now that every file has been
    // scanned.
    let resolved_endpoints = attrs::resolve(&scan.groups, &scan.endpoints, &scan.trait_sightings, &sink);
    let handler_index = attrs::build_handler_index(scan.handler_sites);

    // Stage 7: merge each app's fluent routes with its filtered, handler-resolved
    // attributed routes, then validate the combined route set.
    let apps = combine::combine(apps, &resolved_endpoints, &handler_index, &constructors, &sink);

    if sink.has_errored() {
        return Err(sink.drain());
    }

    // Stage 8: emit. A crate with zero apps still produces a (near-empty) generated
    // file rather than erroring — there's nothing to dispatch, but nothing wrong
    // either.
    let generated_source = emit::emit_file(&apps, &constructors);

    Ok(CompileOutput {
        generated_source,
        diagnostics: sink.drain(),
    })
}
