use indexmap::IndexMap;

use crate::location::Location;
use crate::route::RouteDefinition;
use crate::service::ServiceRegistration;

/// The method names that can sit at the end of a `CreateBuilder(...)....Build()` chain
/// and that `nuruc` records as an entry point worth intercepting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EntryPointKind {
    RunAsync,
    RunReplAsync,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EntryPoint {
    pub kind: EntryPointKind,
    pub location: Location,
    /// Monotonically increasing per `(AppModel, EntryPointKind)`; used to name the
    /// generated interceptor method (`RunAsync_Intercepted_<i>`).
    pub index: usize,
}

/// One `.AddBehavior<T>()` (optionally `.Implements<TFilter>()`) registration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BehaviorDefinition {
    pub behavior_type: String,
    /// Restricts this behavior to routes whose message type implements `filter_type`;
    /// `None` means it wraps every route's handler invocation.
    pub filter_type: Option<String>,
    pub order: usize,
    pub location: Location,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct PipelineDefinition {
    pub behaviors: Vec<BehaviorDefinition>,
}

/// One `CreateBuilder(...)....Build()` call site, fully assembled.
///
/// `BuildLocation` (here, [`AppModel::build_location`]) is the deduplication key: the
/// DSL interpreter produces one draft per syntactic `Build()` call, and the combiner
/// keys its per-app diagnostics and its emission pass off of it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AppModel {
    pub build_location: Location,
    pub entry_points: IndexMap<String, EntryPoint>,
    pub routes: Vec<RouteDefinition>,
    /// Routes sourced from attribute-annotated request classes rather than the fluent
    /// `Map(pattern)` chain; kept separate until the combiner merges both sets because
    /// subset-publishing filters (`DiscoverEndpoints(typeof(G))`) only apply here.
    pub attributed_routes: Vec<RouteDefinition>,
    pub services: Vec<ServiceRegistration>,
    pub behaviors: PipelineDefinition,
    pub has_configuration: bool,
    pub has_repl: bool,
    pub app_name: Option<String>,
    pub app_version: Option<String>,
    pub app_description: Option<String>,
    /// Built-in flags (`--help`, `--version`, `--capabilities`) the user explicitly
    /// disabled; still checked for user-route collisions but not auto-registered.
    pub disabled_builtin_flags: Vec<String>,
    /// Top-level `using`/`use` directives from the compilation unit that owns
    /// `build_location`, already rendered in global-qualified form.
    pub user_usings: Vec<String>,
    /// `true` once `UseMicrosoftDependencyInjection()` was seen: turns off the
    /// compile-time-only DI reachability checks (`NURU_D001`/`NURU051`).
    pub opted_into_runtime_di: bool,
    /// Set by `DiscoverEndpoints(typeof(T))`; restricts which attributed endpoints are
    /// published and drives subset-publishing prefix stripping.
    pub discover_root: Option<String>,
    pub discover_enabled: bool,
}

impl AppModel {
    pub fn new(build_location: Location) -> Self {
        Self {
            build_location,
            entry_points: IndexMap::new(),
            routes: Vec::new(),
            attributed_routes: Vec::new(),
            services: Vec::new(),
            behaviors: PipelineDefinition::default(),
            has_configuration: false,
            has_repl: false,
            app_name: None,
            app_version: None,
            app_description: None,
            disabled_builtin_flags: Vec::new(),
            user_usings: Vec::new(),
            opted_into_runtime_di: false,
            discover_root: None,
            discover_enabled: false,
        }
    }

    /// All routes this app will dispatch against once merged: fluent routes plus the
    /// (already filtered/prefix-stripped) attributed ones.
    pub fn all_routes(&self) -> impl Iterator<Item = &RouteDefinition> {
        self.routes.iter().chain(self.attributed_routes.iter())
    }
}
