//! End-to-end exercises of the full compiler pipeline (SPEC_FULL.md §8.2), feeding
//! synthetic source through [`nuruc::compile`] and asserting on the result rather than
//! on any one stage in isolation.

use nuruc::{compile, SourceFile};

fn single(source: &str) -> Result<nuruc::CompileOutput, Vec<nuru_diagnostic::CompilerDiagnostic>> {
    compile(&[SourceFile::new("src/main.rs", source)])
}

fn has_code(diagnostics: &[nuru_diagnostic::CompilerDiagnostic], code: &str) -> bool {
    diagnostics
        .iter()
        .any(|d| d.code().map(|c| c.0) == Some(code))
}

/// S1: a typed positional parameter with a default falls back to `0` when omitted,
/// and the generated dispatcher compiles down to a non-empty `prettyplease`-formatted
/// source with the route's handler wired in.
#[test]
fn s1_typed_positional_with_default() {
    let source = r#"
        fn main() {
            let app = nuru::AppBuilder::new()
                .with_name("sleepy")
                .map("sleep {seconds:int?}")
                .with_handler(|seconds: Option<i64>| {
                    let _ = seconds;
                })
                .as_command()
                .done()
                .build();
            app.run(&std::env::args().collect::<Vec<_>>());
        }
    "#;

    let output = single(source).expect("a single well-formed route should compile");
    assert!(!output.generated_source.is_empty());
    assert!(output.generated_source.contains("sleep"));
}

/// S2: three routes sharing the `deploy {env}` prefix at different specificities.
/// `deploy {env} --force` (specificity 1800) strictly out-specifies the bare
/// `deploy {env}` route (1500), and `deploy {env} --dry-run?` (1550) has the same
/// required signature as the bare route but a higher specificity, so it shadows it:
/// every input `deploy {env} --dry-run?` could match, `deploy {env}` already matches
/// first. The route is unreachable (`NURU_R003`), which §7/§8.2 classify as an error,
/// so the compile fails and no source is emitted.
#[test]
fn s2_overlapping_specificity_flags_the_unreachable_route() {
    let source = r#"
        fn main() {
            let app = nuru::AppBuilder::new()
                .with_name("deployer")
                .map("deploy {env}")
                .with_handler(|env: String| { let _ = env; })
                .as_command()
                .done()
                .map("deploy {env} --force")
                .with_handler(|env: String| { let _ = env; })
                .as_command()
                .done()
                .map("deploy {env} --dry-run?")
                .with_handler(|env: String| { let _ = env; })
                .as_query()
                .done()
                .build();
            app.run(&std::env::args().collect::<Vec<_>>());
        }
    "#;

    let diagnostics = single(source).expect_err("an unreachable route is a fatal error");
    assert!(has_code(&diagnostics, "NURU_R003"));
}

/// A route declared twice verbatim is `NURU_R002` and aborts the compile entirely —
/// no source is emitted for a crate with a route collision.
#[test]
fn duplicate_routes_abort_the_compile() {
    let source = r#"
        fn main() {
            let app = nuru::AppBuilder::new()
                .map("status")
                .with_handler(|| {})
                .as_query()
                .done()
                .map("status")
                .with_handler(|| {})
                .as_query()
                .done()
                .build();
        }
    "#;

    let diagnostics = single(source).expect_err("a duplicate route must fail the compile");
    assert!(has_code(&diagnostics, "NURU_R002"));
}

/// A route whose required arguments are a strict subset of an earlier, equally (or
/// more) specific route's is unreachable (`NURU_R003`), which §7/§8.2 classify as an
/// error — the compile fails rather than silently dropping the route.
#[test]
fn shadowed_route_fails_the_compile() {
    let source = r#"
        fn main() {
            let app = nuru::AppBuilder::new()
                .map("greet {name?}")
                .with_handler(|name: Option<String>| { let _ = name; })
                .as_query()
                .done()
                .map("greet")
                .with_handler(|| {})
                .as_query()
                .done()
                .build();
        }
    "#;

    let diagnostics = single(source).expect_err("a shadowed route is a fatal error");
    assert!(has_code(&diagnostics, "NURU_R003"));
}

/// A crate with no `AppBuilder` chain at all still compiles, producing a near-empty
/// dispatcher rather than erroring (§5: stage 8 never requires a non-empty app set).
#[test]
fn empty_crate_compiles_to_empty_dispatcher() {
    let source = r#"
        fn main() {
            println!("no routes here");
        }
    "#;

    let output = single(source).expect("a crate with no routes is not an error");
    assert!(output.diagnostics.is_empty());
}
