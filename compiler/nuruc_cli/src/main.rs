//! `nuruc`: the command-line entry point to the Nuru compiler.
//!
//! Thin by design — argument parsing and I/O live here; every actual compiler stage
//! lives in the `nuruc` library crate. `nuruc_cli_client` wraps this binary (or calls
//! `nuruc::compile` in-process) for `build.rs` authors who don't want to shell out by
//! hand.

use std::path::{Path, PathBuf};

use clap::Parser;
use miette::Severity;
use nuruc::{compile, SourceFile};

#[derive(Parser, Debug)]
#[command(name = "nuruc", version, about = "The Nuru compile-time CLI route compiler")]
struct Cli {
    /// Root directory to scan for `.rs` source files (recursively).
    #[arg(long, default_value = "src")]
    source_dir: PathBuf,

    /// Where to write the generated dispatcher source. Defaults to
    /// `$OUT_DIR/nuru_generated.rs` when invoked from a `build.rs` (`OUT_DIR` is set);
    /// otherwise `<source-dir>/../nuru_generated.rs`.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Only report whether the output would change; don't write it. Used by CI to
    /// assert a committed generated file is up to date.
    #[arg(long)]
    check: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let files = collect_source_files(&cli.source_dir)?;

    let output = match compile(&files) {
        Ok(output) => output,
        Err(diagnostics) => {
            let report = nuru_miette::render_all(diagnostics.iter().map(|d| d as &dyn miette::Diagnostic));
            eprintln!("{report}");
            anyhow::bail!(
                "nuruc failed with {} error(s)",
                diagnostics
                    .iter()
                    .filter(|d| d.severity_level() == Severity::Error)
                    .count()
            );
        }
    };

    if !output.diagnostics.is_empty() {
        let report = nuru_miette::render_all(output.diagnostics.iter().map(|d| d as &dyn miette::Diagnostic));
        eprintln!("{report}");
    }

    let out_path = resolve_out_path(&cli);
    let mut writer = if cli.check {
        nuruc::persistence::AppWriter::check_mode()
    } else {
        nuruc::persistence::AppWriter::update_mode()
    };
    writer.persist_if_changed(&out_path, output.generated_source.as_bytes())?;
    if let Err(errors) = writer.verify() {
        for error in &errors {
            eprintln!("{}", nuru_miette::render(error));
        }
        anyhow::bail!("generated output is out of date; re-run without --check to update it");
    }

    Ok(())
}

fn resolve_out_path(cli: &Cli) -> PathBuf {
    if let Some(out) = &cli.out {
        return out.clone();
    }
    if let Ok(out_dir) = std::env::var("OUT_DIR") {
        return PathBuf::from(out_dir).join("nuru_generated.rs");
    }
    cli.source_dir
        .parent()
        .unwrap_or(Path::new("."))
        .join("nuru_generated.rs")
}

/// Recursively collect every `.rs` file under `root`, skipping `target/` directories
/// (a build artifact, never user source) the same way `cargo` itself ignores them
/// when watching for changes.
fn collect_source_files(root: &Path) -> anyhow::Result<Vec<SourceFile>> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.file_name() != "target")
    {
        let entry = entry?;
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
