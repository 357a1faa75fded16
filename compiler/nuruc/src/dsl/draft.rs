//! The mutable, in-progress state the DSL interpreter builds up while walking one
//! `AppBuilder::new()...build()` chain, before it's frozen into [`nuru_ir::AppModel`].

use nuru_ir::{
    AppModel, BehaviorDefinition, EntryPoint, EntryPointKind, HandlerDefinition, Location,
    MessageType, RouteDefinition, ServiceRegistration,
};

#[derive(Debug, Clone)]
pub struct RouteDraft {
    pub pattern: String,
    pub compiled: Option<crate::pattern::CompiledPattern>,
    pub handler: Option<HandlerDefinition>,
    pub message_type: MessageType,
    pub description: Option<String>,
    pub order: usize,
    pub location: Location,
}

#[derive(Debug, Clone)]
pub struct AppModelDraft {
    pub model: AppModel,
    /// A route currently between `.map(pattern)` and `.done()`.
    pub open_route: Option<RouteDraft>,
    pub route_order: usize,
    pub is_built: bool,
    /// `true` once at least one diagnostic-worthy event happened on this draft that
    /// should stop it from being silently dropped even if it ends up with zero
    /// routes (keeps "an app with zero routes still emits help", §7, honest about
    /// *why* there were zero routes).
    pub had_dsl_activity: bool,
}

impl AppModelDraft {
    pub fn new(build_location: Location) -> Self {
        Self {
            model: AppModel::new(build_location),
            open_route: None,
            route_order: 0,
            is_built: false,
            had_dsl_activity: true,
        }
    }

    pub fn open_route(&mut self, pattern: String, location: Location) {
        self.open_route = Some(RouteDraft {
            pattern,
            compiled: None,
            handler: None,
            message_type: MessageType::Unspecified,
            description: None,
            order: self.route_order,
            location,
        });
        self.route_order += 1;
    }

    pub fn close_route(&mut self) -> Option<RouteDefinition> {
        let draft = self.open_route.take()?;
        let compiled = draft.compiled?;
        Some(RouteDefinition {
            pattern: crate::pattern::canonical_display(&compiled.tree),
            segments: compiled.segments,
            handler: draft.handler,
            message_type: draft.message_type,
            description: draft.description,
            specificity: compiled.specificity,
            order: draft.order,
            group_prefix_chain: nuru_ir::GroupPrefixChain::default(),
            aliases: Vec::new(),
            is_help_route: false,
            is_from_attrs: false,
            location: draft.location,
        })
    }

    pub fn add_service(&mut self, service: ServiceRegistration) {
        self.model.services.push(service);
    }

    pub fn add_behavior(&mut self, behavior: BehaviorDefinition) {
        self.model.behaviors.behaviors.push(behavior);
    }

    pub fn record_entry_point(&mut self, kind: EntryPointKind, location: Location) {
        let key = match kind {
            EntryPointKind::RunAsync => "run",
            EntryPointKind::RunReplAsync => "run_repl",
        };
        let index = self
            .model
            .entry_points
            .values()
            .filter(|e| e.kind == kind)
            .count();
        self.model.entry_points.insert(
            format!("{key}_{index}"),
            EntryPoint {
                kind,
                location,
                index,
            },
        );
    }
}
