//! Dependency-injection reachability checks (§4.6 "Service reachability").
//!
//! `NURU_D001` is a per-handler check: does every `BindingSource::Service` parameter
//! have a matching registration? `NURU051` is crate-wide: can every *registered*
//! service's own constructor dependencies be resolved, with no cycle among them?
//! The second question is answered with a directed graph over service type names,
//! the same `petgraph::graphmap::DiGraphMap` + `toposort` shape pavex's own component
//! scope graph uses to order its dependency injection.

use ahash::{HashMap, HashMapExt};

use nuru_ir::{codes, AppModel, BindingSource, ServiceRegistration};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::diagnostic::{DiagnosticSink, RawDiagnostic};

use super::deps::ConstructorIndex;

/// `NURU_D001`: every handler parameter bound to [`BindingSource::Service`] must name
/// a type some registration in `app.services` actually provides. Skipped entirely
/// when the app opted into `.use_runtime_service_resolution()` (§4.3).
pub fn check_handler_dependencies(app: &AppModel, sink: &DiagnosticSink) {
    if app.opted_into_runtime_di {
        return;
    }
    for route in app.all_routes() {
        let Some(handler) = &route.handler else { continue };
        for param in &handler.parameters {
            if param.source != BindingSource::Service {
                continue;
            }
            let bare = param.parameter_type_name.trim_start_matches('&').trim_start_matches("dyn ");
            let satisfied = app.services.iter().any(|s| s.service_type == bare);
            if !satisfied {
                sink.push(
                    RawDiagnostic::error(format!(
                        "handler parameter `{}: {}` asks for a service that was never registered \
                         with `.configure_services(...)`",
                        param.handler_parameter_name, param.parameter_type_name
                    ))
                    .code(codes::NURU_D001_UNRESOLVED_SERVICE)
                    .at(route.location.clone()),
                );
            }
        }
    }
}

/// `NURU051`: every registered service's constructor dependencies must themselves be
/// resolvable — registered somewhere in `app.services` — and the whole dependency
/// graph must be acyclic. Skipped under the same runtime-DI opt-out as `NURU_D001`.
pub fn check_service_graph(app: &AppModel, constructors: &ConstructorIndex, sink: &DiagnosticSink) {
    if app.opted_into_runtime_di {
        return;
    }
    if app.services.is_empty() {
        return;
    }

    let registered: HashMap<&str, &ServiceRegistration> =
        app.services.iter().map(|s| (s.implementation_type.as_str(), s)).collect();

    let mut ids: HashMap<&str, usize> = HashMap::new();
    let mut names: Vec<&str> = Vec::new();

    let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
    for service in &app.services {
        let service_id = node_id(&service.implementation_type, &mut ids, &mut names);
        graph.add_node(service_id);
        let Some(deps) = constructors.get(&service.implementation_type) else {
            continue;
        };
        for dep in deps {
            let bare = dep.trim_start_matches('&').trim_start_matches("dyn ");
            if !registered.contains_key(bare) {
                sink.push(
                    RawDiagnostic::error(format!(
                        "service `{}` depends on `{bare}`, which has no registration reachable at \
                         compile time",
                        service.implementation_type
                    ))
                    .code(codes::NURU_D051_UNRESOLVABLE_DEPENDENCY)
                    .at(service.location.clone()),
                );
                continue;
            }
            let dep_id = node_id(bare, &mut ids, &mut names);
            graph.add_edge(service_id, dep_id, ());
        }
    }

    fn node_id<'a>(name: &'a str, ids: &mut HashMap<&'a str, usize>, names: &mut Vec<&'a str>) -> usize {
        if let Some(&id) = ids.get(name) {
            return id;
        }
        let id = names.len();
        names.push(name);
        ids.insert(name, id);
        id
    }

    if let Err(cycle) = toposort(&graph, None) {
        let name = names.get(cycle.node_id()).copied().unwrap_or("<unknown>");
        sink.push(RawDiagnostic::error(format!(
            "service dependency cycle detected at `{name}`"
        ))
        .code(codes::NURU_D051_UNRESOLVABLE_DEPENDENCY));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nuru_ir::{HandlerDefinition, HandlerKind, Location, MessageType, RouteDefinition, ServiceRegistration};
    use nuru_ir::Lifetime;

    fn loc() -> Location {
        Location::new(1, 1, 0, "test.rs")
    }

    fn route_with_service_param(type_name: &str) -> RouteDefinition {
        RouteDefinition {
            pattern: "greet".to_string(),
            segments: Vec::new(),
            handler: Some(HandlerDefinition {
                kind: HandlerKind::Lambda,
                parameters: vec![nuru_ir::ParameterBinding {
                    handler_parameter_name: "clock".to_string(),
                    parameter_type_name: type_name.to_string(),
                    source: BindingSource::Service,
                    route_segment_name: None,
                    is_nullable: false,
                    is_enum_type: false,
                    has_converter: false,
                }],
                return_type: None,
                is_async: false,
                body_span: None,
                has_closure_capture: false,
                location: loc(),
            }),
            message_type: MessageType::Query,
            description: None,
            specificity: 1000,
            order: 0,
            group_prefix_chain: Default::default(),
            aliases: Vec::new(),
            is_help_route: false,
            is_from_attrs: false,
            location: loc(),
        }
    }

    fn app_with_route(route: RouteDefinition, services: Vec<ServiceRegistration>) -> AppModel {
        let mut app = AppModel::new(loc());
        app.routes.push(route);
        app.services = services;
        app
    }

    #[test]
    fn unregistered_service_parameter_raises_d001() {
        let app = app_with_route(route_with_service_param("Clock"), Vec::new());
        let sink = DiagnosticSink::new();
        check_handler_dependencies(&app, &sink);
        assert!(sink.has_errored());
    }

    #[test]
    fn registered_service_parameter_is_satisfied() {
        let app = app_with_route(
            route_with_service_param("Clock"),
            vec![ServiceRegistration::new("Clock", "Clock", Lifetime::Singleton, loc())],
        );
        let sink = DiagnosticSink::new();
        check_handler_dependencies(&app, &sink);
        assert!(!sink.has_errored());
    }

    #[test]
    fn runtime_di_opt_out_skips_the_check_entirely() {
        let mut app = app_with_route(route_with_service_param("Clock"), Vec::new());
        app.opted_into_runtime_di = true;
        let sink = DiagnosticSink::new();
        check_handler_dependencies(&app, &sink);
        assert!(!sink.has_errored());
    }

    #[test]
    fn unresolvable_constructor_dependency_raises_051() {
        let mut app = AppModel::new(loc());
        app.services = vec![ServiceRegistration::new("Repo", "Repo", Lifetime::Singleton, loc())];
        let mut constructors = ConstructorIndex::default();
        constructors.insert("Repo".to_string(), vec!["Database".to_string()]);
        let sink = DiagnosticSink::new();
        check_service_graph(&app, &constructors, &sink);
        assert!(sink.has_errored());
    }

    #[test]
    fn dependency_cycle_is_detected() {
        let mut app = AppModel::new(loc());
        app.services = vec![
            ServiceRegistration::new("A", "A", Lifetime::Singleton, loc()),
            ServiceRegistration::new("B", "B", Lifetime::Singleton, loc()),
        ];
        let mut constructors = ConstructorIndex::default();
        constructors.insert("A".to_string(), vec!["B".to_string()]);
        constructors.insert("B".to_string(), vec!["A".to_string()]);
        let sink = DiagnosticSink::new();
        check_service_graph(&app, &constructors, &sink);
        assert!(sink.has_errored());
    }

    #[test]
    fn acyclic_dependencies_pass_clean() {
        let mut app = AppModel::new(loc());
        app.services = vec![
            ServiceRegistration::new("A", "A", Lifetime::Singleton, loc()),
            ServiceRegistration::new("B", "B", Lifetime::Singleton, loc()),
        ];
        let mut constructors = ConstructorIndex::default();
        constructors.insert("A".to_string(), vec!["B".to_string()]);
        let sink = DiagnosticSink::new();
        check_service_graph(&app, &constructors, &sink);
        assert!(!sink.has_errored());
    }
}
