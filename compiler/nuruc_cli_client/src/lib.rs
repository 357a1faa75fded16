//! A thin, in-process interface to the Nuru compiler, meant to be called from a
//! host crate's `build.rs`.
//!
//! `nuruc_cli_client::compile_and_emit()` is the one call a `build.rs` needs: it
//! scans `$CARGO_MANIFEST_DIR/src` for `.rs` files, runs [`nuruc::compile`], writes
//! the generated dispatcher to `$OUT_DIR/nuru_generated.rs`, and wires up the
//! `cargo:rerun-if-changed` directives so Cargo only re-invokes the compiler when a
//! scanned file actually changed. Host crates include the result with:
//!
//! ```ignore
//! include!(concat!(env!("OUT_DIR"), "/nuru_generated.rs"));
//! ```
//!
//! Kept as its own crate (rather than folded into `nuruc` itself) so that depending
//! on "run the compiler from my build script" doesn't pull every extraction-stage
//! internal into a `build-dependencies` edge — the same reason `pavexc_cli_client`
//! exists as a thin shim over `pavexc` rather than every `pavex`-using crate
//! depending on the compiler directly.

use std::path::{Path, PathBuf};

use miette::Severity;
use nuru_diagnostic::CompilerDiagnostic;
use nuruc::SourceFile;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("failed to read source files: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to walk `{0}`: {1}")]
    Walk(PathBuf, walkdir::Error),
    #[error("nuruc reported {count} error(s):\n{rendered}")]
    Diagnostics { count: usize, rendered: String },
}

/// Scan `source_dir` for `.rs` files, compile them, and write the generated
/// dispatcher to `out_path`. Returns the (possibly empty) list of warning-level
/// diagnostics collected along the way; any error-level diagnostic is returned as
/// [`CompileError::Diagnostics`] instead, with nothing written to `out_path`.
pub fn compile_dir(source_dir: &Path, out_path: &Path) -> Result<Vec<CompilerDiagnostic>, CompileError> {
    let files = collect_source_files(source_dir)?;
    match nuruc::compile(&files) {
        Ok(output) => {
            if let Some(parent) = out_path.parent() {
                fs_err::create_dir_all(parent)?;
            }
            fs_err::write(out_path, output.generated_source)?;
            Ok(output.diagnostics)
        }
        Err(diagnostics) => Err(render_error(diagnostics)),
    }
}

/// The call a `build.rs` actually makes: resolve `$CARGO_MANIFEST_DIR/src` and
/// `$OUT_DIR/nuru_generated.rs` from the environment Cargo sets for build scripts,
/// emit the `cargo:rerun-if-changed` lines for every scanned file, and panic with a
/// rendered diagnostic report on failure (a `build.rs` has no other way to fail the
/// build cleanly).
pub fn compile_and_emit() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is not set; \
        `compile_and_emit` must be called from a build.rs");
    let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR is not set; \
        `compile_and_emit` must be called from a build.rs");

    let source_dir = PathBuf::from(manifest_dir).join("src");
    let out_path = PathBuf::from(out_dir).join("nuru_generated.rs");

    for entry in walkdir::WalkDir::new(&source_dir)
        .into_iter()
        .filter_entry(|e| e.file_name() != "target")
        .filter_map(Result::ok)
    {
        if entry.file_type().is_file() {
            println!("cargo:rerun-if-changed={}", entry.path().display());
        }
    }

    match compile_dir(&source_dir, &out_path) {
        Ok(warnings) => {
            for warning in &warnings {
                eprintln!("{}", nuru_miette::render(warning));
            }
        }
        Err(err) => panic!("{err}"),
    }
}

fn collect_source_files(root: &Path) -> Result<Vec<SourceFile>, CompileError> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.file_name() != "target")
    {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_default();
            CompileError::Walk(path, e)
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) != Some("rs") {
            continue;
        }
        let source = fs_err::read_to_string(entry.path())?;
        files.push(SourceFile::new(entry.path().display().to_string(), source));
    }
    Ok(files)
}

fn render_error(diagnostics: Vec<CompilerDiagnostic>) -> CompileError {
    let count = diagnostics.iter().filter(|d| d.severity_level() == Severity::Error).count();
    let rendered = nuru_miette::render_all(diagnostics.iter().map(|d| d as &dyn miette::Diagnostic));
    CompileError::Diagnostics { count, rendered }
}
