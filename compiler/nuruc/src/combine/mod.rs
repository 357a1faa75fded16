//! Stage 7 (§4.6): merges each `AppModel`'s fluent routes with its (filtered,
//! handler-resolved) attributed routes, then validates the merged result.

mod duplicates;
pub mod deps;
mod reachability;

use nuru_ir::{codes, AppModel, HandlerKind};

use crate::attrs::{self, HandlerIndex, ResolvedEndpoint};
use crate::diagnostic::{DiagnosticSink, RawDiagnostic};
use deps::ConstructorIndex;

/// Merge and validate every `AppModel` extracted from the crate.
///
/// `resolved_endpoints` is the crate-wide, not-yet-filtered set of attributed routes
/// (§4.4's output); each app picks its own subset according to whether it ever called
/// `.discover_endpoints()`/`.map_endpoint()` and, if so, which root (if any) it named.
pub fn combine(
    mut apps: Vec<AppModel>,
    resolved_endpoints: &[ResolvedEndpoint],
    handler_index: &HandlerIndex,
    constructor_index: &ConstructorIndex,
    sink: &DiagnosticSink,
) -> Vec<AppModel> {
    for app in &mut apps {
        attach_attributed_routes(app, resolved_endpoints, handler_index, sink);
        validate_handlers(app, sink);
        reachability::check_handler_dependencies(app, sink);
        reachability::check_service_graph(app, constructor_index, sink);

        let merged = std::mem::take(&mut app.routes)
            .into_iter()
            .chain(std::mem::take(&mut app.attributed_routes))
            .collect();
        let validated = duplicates::validate(merged, sink);

        // Re-split: the emitter only cares about `all_routes()`, but keeping the
        // fluent/attributed split intact (rather than dumping everything into
        // `routes`) preserves `AppModel`'s documented invariant for any stage added
        // after this one that still wants to tell the two provenances apart.
        let (fluent, attributed): (Vec<_>, Vec<_>) = validated.into_iter().partition(|r| !r.is_from_attrs());
        app.routes = fluent;
        app.attributed_routes = attributed;
    }
    apps
}

fn attach_attributed_routes(
    app: &mut AppModel,
    resolved_endpoints: &[ResolvedEndpoint],
    handler_index: &HandlerIndex,
    sink: &DiagnosticSink,
) {
    if !app.discover_enabled {
        return;
    }
    let mut order = app.routes.len();
    for endpoint in resolved_endpoints {
        if !is_included(app, endpoint) {
            continue;
        }
        let chain = effective_chain(app, endpoint);
        let mut route = attrs::resolve::build_route(
            &chain,
            &endpoint.pattern_tail,
            &endpoint.fields,
            endpoint.message_type,
            endpoint.description.clone(),
            endpoint.location.clone(),
            order,
            sink,
        );
        route.handler = Some(attrs::resolve_handler(
            &endpoint.struct_name,
            &endpoint.fields,
            &app.services,
            handler_index,
        ));
        order += 1;
        app.attributed_routes.push(route);
    }
}

/// Subset publishing (§4.4): with no turbofish, every endpoint is published; with
/// `.discover_endpoints::<G>()`, only endpoints whose group chain visits `G` (or whose
/// own struct *is* `G`) are.
fn is_included(app: &AppModel, endpoint: &ResolvedEndpoint) -> bool {
    match &app.discover_root {
        None => true,
        Some(root) => {
            endpoint.struct_name == *root || endpoint.group_chain_names.iter().any(|n| n == root)
        }
    }
}

/// Open Question decision (see DESIGN.md): subset publishing always strips only the
/// chain's index-0 root prefix, regardless of where in the chain `G` actually sits.
fn effective_chain(app: &AppModel, endpoint: &ResolvedEndpoint) -> nuru_ir::GroupPrefixChain {
    match &app.discover_root {
        Some(_) => endpoint.group_chain.without_root(),
        None => endpoint.group_chain.clone(),
    }
}

fn validate_handlers(app: &AppModel, sink: &DiagnosticSink) {
    for route in app.all_routes() {
        let Some(handler) = &route.handler else { continue };
        if handler.has_closure_capture {
            sink.push(
                RawDiagnostic::error(
                    "handler closure references a variable from its enclosing scope; only its own \
                     parameters and crate-level items are visible to the emitted dispatcher",
                )
                .code(codes::NURU_H002_CLOSURE_CAPTURE)
                .at(handler.location.clone()),
            );
        } else if handler.kind == HandlerKind::None {
            sink.push(
                RawDiagnostic::error(format!(
                    "`{}`'s handler isn't a closure, a block closure, or a path to a free \
                     function/associated method",
                    route.pattern
                ))
                .code(codes::NURU_H001_UNSUPPORTED_HANDLER_SHAPE)
                .at(handler.location.clone()),
            );
        }
    }
}
