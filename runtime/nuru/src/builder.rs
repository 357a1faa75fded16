//! The fluent DSL surface (§6.1) as it exists before `nuruc` ever looks at it.
//!
//! Every method name here must match a case in
//! `compiler/nuruc/src/dsl/interpreter.rs`'s `process_chain` — that match is how the
//! compiler recognizes what a user wrote, textually, from the unexpanded source. This
//! file's job is narrower: make the chain a real, runnable (if unoptimized) program
//! so a crate that forgets to wire up `nuruc` still compiles, and so `.map(...)`
//! chains can be unit-tested without a code generation step at all.

use std::marker::PhantomData;

use crate::app::App;

/// Entry point of the fluent DSL: `AppBuilder::new()`.
pub struct AppBuilder {
    name: Option<String>,
    version: Option<String>,
    description: Option<String>,
    has_configuration: bool,
    has_logging: bool,
    routes: Vec<CompiledRoute>,
}

/// A route recorded by the fallback (non-generated) builder path. Real dispatch comes
/// from `nuruc`'s emitted matcher; this is only enough to let `.build()` produce
/// something an `App` can be constructed from when the crate runs unintercepted.
struct CompiledRoute {
    pattern: String,
    description: Option<String>,
}

impl AppBuilder {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            name: None,
            version: None,
            description: None,
            has_configuration: false,
            has_logging: false,
            routes: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn add_configuration(mut self) -> Self {
        self.has_configuration = true;
        self
    }

    /// Walked textually by `nuruc`'s `dsl::services` stage; at runtime this just
    /// drives `services` against a [`ServiceRegistry`] real enough to compile
    /// ordinary registration code.
    pub fn configure_services(self, configure: impl FnOnce(&mut ServiceRegistry)) -> Self {
        let mut registry = ServiceRegistry {
            has_logging: self.has_logging,
        };
        configure(&mut registry);
        Self {
            has_logging: registry.has_logging,
            ..self
        }
    }

    /// Opts this app out of `nuruc`'s compile-time-only DI reachability checks
    /// (`NURU_D001`/`NURU051`, §4.3).
    pub fn use_runtime_service_resolution(self) -> Self {
        self
    }

    pub fn add_type_converter<T>(self) -> Self {
        self
    }

    pub fn add_behavior<B>(self) -> BehaviorBuilder {
        BehaviorBuilder {
            app: self,
            _behavior: PhantomData::<B>,
        }
    }

    /// Publishes every attributed endpoint reachable in this crate (or, with the
    /// turbofish form, the subset rooted at `G`'s `#[nuru_route_group]` chain, §4.4
    /// "Subset publishing").
    pub fn discover_endpoints<G>(self) -> Self {
        self
    }

    /// Publishes exactly one attributed endpoint type, regardless of whether
    /// `discover_endpoints` was also called.
    pub fn map_endpoint<E>(self) -> Self {
        self
    }

    /// Opens a route: `.map(pattern).with_handler(...)...​.done()`.
    pub fn map(self, pattern: impl Into<String>) -> RouteBuilder {
        RouteBuilder {
            app: self,
            pattern: pattern.into(),
            description: None,
        }
    }

    pub fn build(self) -> App {
        if self.has_configuration {
            // The real configuration figment is assembled by the emitted dispatcher,
            // which knows the app's name (for the `{appName}.settings.json` layer)
            // and the original argv; nothing to do here besides having recorded the
            // intent for `nuruc`.
        }
        App::new(self.name, self.version, self.description)
    }
}

/// The parameter handed to a `.configure_services(|services| ...)` closure.
///
/// `nuruc`'s `dsl::services` stage recognizes `add_singleton`/`add_scoped`/
/// `add_transient`/`add_http_client`/`add_logging`/`add_type_converter` calls against
/// this exact type's methods; anything else raises `NURU050`/`NURU052`.
pub struct ServiceRegistry {
    has_logging: bool,
}

impl ServiceRegistry {
    pub fn add_singleton<T>(&mut self) -> &mut Self {
        self
    }

    pub fn add_scoped<T>(&mut self) -> &mut Self {
        self
    }

    pub fn add_transient<T>(&mut self) -> &mut Self {
        self
    }

    pub fn add_http_client<T>(
        &mut self,
        _configure: impl FnOnce(reqwest::blocking::ClientBuilder) -> reqwest::blocking::ClientBuilder,
    ) -> &mut Self {
        self
    }

    pub fn add_logging(&mut self) -> &mut Self {
        self.has_logging = true;
        crate::logger::init_default_subscriber();
        self
    }
}

/// `.add_behavior::<B>()`, optionally narrowed with `.implements::<Filter>()`.
pub struct BehaviorBuilder {
    app: AppBuilder,
    _behavior: PhantomData<*const ()>,
}

impl BehaviorBuilder {
    pub fn implements<Filter>(self) -> AppBuilder {
        self.app
    }
}

// `BehaviorBuilder` is constructed with a phantom marker that isn't actually generic
// over `B` (avoiding an unconstrained type parameter); callers always chain straight
// into `.implements()` or rely on `Deref`-free method resolution back onto
// `AppBuilder` below.
impl std::ops::Deref for BehaviorBuilder {
    type Target = AppBuilder;

    fn deref(&self) -> &AppBuilder {
        &self.app
    }
}

impl From<BehaviorBuilder> for AppBuilder {
    fn from(b: BehaviorBuilder) -> Self {
        b.app
    }
}

/// One route between `.map(pattern)` and `.done()`.
pub struct RouteBuilder {
    app: AppBuilder,
    pattern: String,
    description: Option<String>,
}

impl RouteBuilder {
    /// Recognized shapes: a closure (`|args| ...` or `|args| { ... }`) or a path to a
    /// free function/associated method (§4.5). Both are accepted here as any zero-sized
    /// callable; `nuruc` is the one that cares which syntactic shape was actually
    /// written.
    pub fn with_handler<F>(self, _handler: F) -> Self
    where
        F: 'static,
    {
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn as_query(self) -> Self {
        self
    }

    pub fn as_command(self) -> Self {
        self
    }

    pub fn as_idempotent_command(self) -> Self {
        self
    }

    pub fn done(mut self) -> AppBuilder {
        self.app.routes.push(CompiledRoute {
            pattern: self.pattern,
            description: self.description,
        });
        self.app
    }
}
