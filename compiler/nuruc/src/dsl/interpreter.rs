//! Walks a parsed source file's function bodies looking for
//! `AppBuilder::new()....build()` chains (§4.3) and turns each one into an
//! [`nuru_ir::AppModel`].
//!
//! `syn::visit::Visit` only gives read-only traversal; building up per-binding state
//! (a `let app = AppBuilder::new()...build();` followed later by `app.run(args);`)
//! needs a little more than that, so this is a hand-rolled statement walker rather
//! than a `Visit` impl.

use std::collections::HashMap;

use nuru_ir::{AppModel, BehaviorDefinition, EntryPointKind, MessageType};
use syn::Expr;

use crate::diagnostic::{DiagnosticSink, RawDiagnostic};
use crate::util;

use super::chain::{self, ChainLink};
use super::draft::AppModelDraft;

/// Walk every function-shaped item in `file` (free functions, `impl` methods, and
/// nested `mod`s), collecting one finished [`AppModel`] per distinct `.build()` call.
pub fn extract_apps(
    file: &syn::File,
    file_path: &str,
    source: &str,
    sink: &DiagnosticSink,
) -> Vec<AppModel> {
    let mut finished = Vec::new();
    visit_items(&file.items, file_path, source, sink, &mut finished);
    finished
}

fn visit_items(
    items: &[syn::Item],
    file_path: &str,
    source: &str,
    sink: &DiagnosticSink,
    finished: &mut Vec<AppModel>,
) {
    for item in items {
        match item {
            syn::Item::Fn(f) => visit_block(&f.block, file_path, source, sink, finished),
            syn::Item::Impl(i) => {
                for impl_item in &i.items {
                    if let syn::ImplItem::Fn(f) = impl_item {
                        visit_block(&f.block, file_path, source, sink, finished);
                    }
                }
            }
            syn::Item::Mod(m) => {
                if let Some((_, items)) = &m.content {
                    visit_items(items, file_path, source, sink, finished);
                }
            }
            _ => {}
        }
    }
}

fn visit_block(
    block: &syn::Block,
    file_path: &str,
    source: &str,
    sink: &DiagnosticSink,
    finished: &mut Vec<AppModel>,
) {
    let mut bindings: HashMap<String, AppModelDraft> = HashMap::new();

    for stmt in &block.stmts {
        match stmt {
            syn::Stmt::Local(local) => {
                let Some(init) = &local.init else { continue };
                let Some(links) = chain::flatten(&init.expr) else {
                    continue;
                };
                let draft = process_chain(&links, file_path, source, sink);
                match &local.pat {
                    syn::Pat::Ident(pi) if !draft.is_built => {
                        bindings.insert(pi.ident.to_string(), draft);
                    }
                    syn::Pat::Ident(pi) => {
                        bindings.insert(pi.ident.to_string(), draft);
                    }
                    _ => {
                        if draft.is_built {
                            finished.push(draft.model);
                        }
                    }
                }
            }
            syn::Stmt::Expr(expr, _) => {
                handle_standalone_expr(expr, file_path, source, sink, &mut bindings, finished);
            }
            _ => {}
        }
    }

    for (_, draft) in bindings {
        if draft.is_built {
            finished.push(draft.model);
        }
    }
}

fn handle_standalone_expr(
    expr: &Expr,
    file_path: &str,
    source: &str,
    sink: &DiagnosticSink,
    bindings: &mut HashMap<String, AppModelDraft>,
    finished: &mut Vec<AppModel>,
) {
    if let Some(links) = chain::flatten(expr) {
        let draft = process_chain(&links, file_path, source, sink);
        if draft.is_built {
            finished.push(draft.model);
        }
        return;
    }
    // Not a chain rooted at `AppBuilder::new`; check for `<binding>.run(args)` /
    // `<binding>.run_repl(args)` referencing a draft built in an earlier statement.
    if let Expr::MethodCall(mc) = expr {
        if let Expr::Path(p) = mc.receiver.as_ref() {
            if let Some(ident) = p.path.get_ident() {
                if let Some(draft) = bindings.get_mut(&ident.to_string()) {
                    let kind = match mc.method.to_string().as_str() {
                        "run" => Some(EntryPointKind::RunAsync),
                        "run_repl" => Some(EntryPointKind::RunReplAsync),
                        _ => None,
                    };
                    if let Some(kind) = kind {
                        let loc = util::span_to_location(mc.method.span(), file_path, source);
                        draft.record_entry_point(kind, loc);
                    }
                }
            }
        }
    }
}

fn process_chain(links: &[ChainLink<'_>], file_path: &str, source: &str, sink: &DiagnosticSink) -> AppModelDraft {
    let root_span = match &links[0] {
        ChainLink::Root { span, .. } => *span,
        ChainLink::Method { span, .. } => *span,
    };
    let build_location = util::span_to_location(root_span, file_path, source);
    let mut draft = AppModelDraft::new(build_location);

    for link in &links[1..] {
        let ChainLink::Method {
            name,
            args,
            turbofish,
            span,
        } = link
        else {
            continue;
        };
        let loc = util::span_to_location(*span, file_path, source);

        match name.as_str() {
            "with_name" => draft.model.app_name = first_str(args),
            "with_version" => draft.model.app_version = first_str(args),
            "with_description" => {
                let value = first_str(args);
                if let Some(route) = draft.open_route.as_mut() {
                    route.description = value;
                } else {
                    draft.model.app_description = value;
                }
            }
            "add_configuration" => draft.model.has_configuration = true,
            "configure_services" => {
                if let Some(closure_arg) = args.first() {
                    super::services::interpret(closure_arg, &mut draft, file_path, source, sink);
                }
            }
            "use_runtime_service_resolution" => draft.model.opted_into_runtime_di = true,
            "add_type_converter" => {
                // Recorded implicitly: `has_converter` on parameter bindings is derived
                // by the handler extractor cross-checking the type name against the set
                // of `add_type_converter::<T>()` calls seen here. Nothing structural to
                // add to `AppModel` itself (§4.7.4 tracks it at the binding level).
            }
            "add_behavior" => {
                let behavior_type = turbofish.first().cloned().unwrap_or_default();
                let order = draft.model.behaviors.behaviors.len();
                draft.add_behavior(BehaviorDefinition {
                    behavior_type,
                    filter_type: None,
                    order,
                    location: loc,
                });
            }
            "implements" => {
                if let (Some(filter), Some(last)) =
                    (turbofish.first(), draft.model.behaviors.behaviors.last_mut())
                {
                    last.filter_type = Some(filter.clone());
                }
            }
            "discover_endpoints" => {
                draft.model.discover_enabled = true;
                if let Some(root) = turbofish.first() {
                    draft.model.discover_root = Some(root.clone());
                }
            }
            "map_endpoint" => {
                draft.model.discover_enabled = true;
            }
            "map" => {
                let pattern = first_str(args).unwrap_or_default();
                draft.open_route(pattern.clone(), loc.clone());
                match crate::pattern::parse_pattern(&pattern) {
                    Ok(compiled) => {
                        for issue in &compiled.issues {
                            sink.push(
                                RawDiagnostic {
                                    code: Some(issue.code),
                                    message: issue.message.clone(),
                                    location: Some(loc.clone()),
                                    is_error: issue.is_error,
                                    help: None,
                                },
                            );
                        }
                        if let Some(route) = draft.open_route.as_mut() {
                            route.compiled = Some(compiled);
                        }
                    }
                    Err(e) => {
                        sink.push(RawDiagnostic::error(e.to_string()).code(e.code()).at(loc));
                    }
                }
            }
            "with_handler" => {
                let segments = draft
                    .open_route
                    .as_ref()
                    .and_then(|r| r.compiled.as_ref())
                    .map(|c| c.segments.clone())
                    .unwrap_or_default();
                let services = draft.model.services.clone();
                if let (Some(arg), Some(route)) = (args.first(), draft.open_route.as_mut()) {
                    route.handler = Some(crate::handler::extract_handler(
                        arg, &segments, &services, file_path, source,
                    ));
                }
            }
            "as_query" => set_message_type(&mut draft, MessageType::Query),
            "as_command" => set_message_type(&mut draft, MessageType::Command),
            "as_idempotent_command" => set_message_type(&mut draft, MessageType::IdempotentCommand),
            "done" => match draft.close_route() {
                Some(route) => draft.model.routes.push(route),
                None => sink.push(
                    RawDiagnostic::error(
                        "`.done()` called with no open `.map(...)` route, or the route's pattern \
                         failed to compile",
                    )
                    .at(loc),
                ),
            },
            "build" => draft.is_built = true,
            "run" => draft.record_entry_point(EntryPointKind::RunAsync, loc),
            "run_repl" => draft.record_entry_point(EntryPointKind::RunReplAsync, loc),
            other => sink.push(
                RawDiagnostic::warning(format!(
                    "unrecognized builder method `.{other}(...)`; ignoring and continuing"
                ))
                .at(loc),
            ),
        }
    }

    draft
}

fn set_message_type(draft: &mut AppModelDraft, message_type: MessageType) {
    if let Some(route) = draft.open_route.as_mut() {
        route.message_type = message_type;
    }
}

fn first_str(args: &syn::punctuated::Punctuated<Expr, syn::token::Comma>) -> Option<String> {
    args.first().and_then(util::str_literal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> Vec<AppModel> {
        let file = syn::parse_file(source).expect("valid Rust source");
        let sink = DiagnosticSink::new();
        extract_apps(&file, "test.rs", source, &sink)
    }

    #[test]
    fn finds_one_app_per_build_call() {
        let apps = extract(
            r#"
            fn main() {
                let app = nuru::AppBuilder::new()
                    .with_name("greeter")
                    .map("hello")
                    .with_handler(|| {})
                    .as_query()
                    .done()
                    .build();
            }
            "#,
        );
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].app_name.as_deref(), Some("greeter"));
        assert_eq!(apps[0].routes.len(), 1);
        assert_eq!(apps[0].routes[0].pattern, "hello");
    }

    #[test]
    fn ignores_chains_not_rooted_at_app_builder() {
        let apps = extract(
            r#"
            fn main() {
                let other = SomethingElse::new().with_name("nope").build();
            }
            "#,
        );
        assert!(apps.is_empty());
    }

    #[test]
    fn records_run_entry_point_on_a_later_statement() {
        let apps = extract(
            r#"
            fn main() {
                let app = nuru::AppBuilder::new().build();
                app.run(&args);
            }
            "#,
        );
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].entry_points.len(), 1);
    }

    #[test]
    fn done_without_an_open_route_raises_a_diagnostic() {
        let file = syn::parse_file(
            r#"
            fn main() {
                let app = nuru::AppBuilder::new().done().build();
            }
            "#,
        )
        .unwrap();
        let sink = DiagnosticSink::new();
        extract_apps(&file, "test.rs", "", &sink);
        assert!(sink.has_errored());
    }

    #[test]
    fn unrecognized_method_warns_but_does_not_abort() {
        let file = syn::parse_file(
            r#"
            fn main() {
                let app = nuru::AppBuilder::new().frobnicate().build();
            }
            "#,
        )
        .unwrap();
        let sink = DiagnosticSink::new();
        let apps = extract_apps(&file, "test.rs", "", &sink);
        assert_eq!(apps.len(), 1);
        assert!(!sink.has_errored());
    }
}
