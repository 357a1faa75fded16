//! `ILogger<T>`-equivalent binding (§4.7.6, §9 "runtime reflection").
//!
//! The host framework resolves `ILogger<T>` via `MakeGenericType` reflection at
//! runtime; §9 explicitly bans that here. [`LoggerFactory::create`] takes a type name
//! string instead, so the emitted dispatcher calls it with a string literal it already
//! knows at codegen time rather than reaching for `std::any::type_name` reflection.

use std::sync::Arc;

use tracing::Level;

/// A logger scoped to the type name it was created for, mirroring `ILogger<T>`'s
/// per-type scoping without any actual generic instantiation at the call site.
#[derive(Clone)]
pub struct Logger {
    target: Arc<str>,
}

impl Logger {
    pub fn new(target: impl Into<Arc<str>>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn trace(&self, message: &str) {
        tracing::event!(target: "nuru", Level::TRACE, target = %self.target, "{message}");
    }

    pub fn debug(&self, message: &str) {
        tracing::event!(target: "nuru", Level::DEBUG, target = %self.target, "{message}");
    }

    pub fn info(&self, message: &str) {
        tracing::event!(target: "nuru", Level::INFO, target = %self.target, "{message}");
    }

    pub fn warn(&self, message: &str) {
        tracing::event!(target: "nuru", Level::WARN, target = %self.target, "{message}");
    }

    pub fn error(&self, message: &str) {
        tracing::event!(target: "nuru", Level::ERROR, target = %self.target, "{message}");
    }
}

/// Created once per process by the emitted dispatcher when `.add_logging()` was seen
/// (§4.7's "static fields" list); every `ILogger<T>`-bound handler parameter is
/// produced by calling [`LoggerFactory::create`] with that handler's type name.
#[derive(Clone, Default)]
pub struct LoggerFactory;

impl LoggerFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn create(&self, type_name: &'static str) -> Logger {
        Logger::new(type_name)
    }
}

/// Installs `tracing_subscriber`'s default formatting layer, filtered by `RUST_LOG`
/// (falling back to `info`). Called once from the emitted dispatcher's entry point
/// when `.add_logging()` was registered.
pub fn init_default_subscriber() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();
}
