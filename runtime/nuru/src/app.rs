//! The running application handle (§3.1 `AppModel`'s runtime counterpart, §6.3).
//!
//! `App` is deliberately thin: every piece of behavior the emitted dispatcher needs —
//! route matching, help/version/capabilities, service resolution — lives in generated
//! code, not here. `App::run`/`App::run_repl` exist only as the "was not intercepted"
//! fallback (§4.7.1): if `nuruc` never ran (or a call site wasn't recognized), calling
//! them is a bug in the build, not a recoverable runtime condition.

use std::sync::Arc;

use crate::terminal::Terminal;

/// The finished, immutable application produced by [`crate::AppBuilder::build`].
///
/// Holds nothing route-related: by the time `.build()` is called in working code, the
/// emitted dispatcher has already taken over the call site that would have used this
/// value. It still carries the pieces a handler can legitimately ask for by parameter
/// type (`App`, `Terminal`) so those bindings have something concrete to resolve to
/// when this crate is used without `nuruc` in the loop (e.g. unit-testing a handler
/// function directly).
pub struct App {
    pub(crate) name: Option<String>,
    pub(crate) version: Option<String>,
    pub(crate) description: Option<String>,
    terminal: Arc<dyn Terminal>,
}

impl App {
    pub(crate) fn new(
        name: Option<String>,
        version: Option<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            name,
            version,
            description,
            terminal: crate::terminal::current(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn terminal(&self) -> &Arc<dyn Terminal> {
        &self.terminal
    }

    /// The fallback every `.run(args)` call compiles to when `nuruc` never replaced
    /// it with a call into the generated dispatcher (§4.7.1: "the ordinary method
    /// remains as a fallback that throws"). A correctly configured `build.rs` (see
    /// `nuruc_cli_client`) always intercepts this before it can run.
    pub fn run(&self, _args: &[String]) -> i32 {
        panic!(
            "`App::run` was not intercepted by `nuruc`. Add a `build.rs` that calls \
             `nuruc_cli_client::compile_and_emit()` (or run `nuruc` directly) before \
             building this crate."
        )
    }

    /// See [`App::run`]; the REPL entry point fails the same way for the same reason.
    pub fn run_repl(&self, _args: &[String]) -> i32 {
        panic!(
            "`App::run_repl` was not intercepted by `nuruc`. Add a `build.rs` that calls \
             `nuruc_cli_client::compile_and_emit()` (or run `nuruc` directly) before \
             building this crate."
        )
    }
}
