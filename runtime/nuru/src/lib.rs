//! The crate every Nuru CLI links against.
//!
//! Almost everything here exists to give the fluent DSL (§6.1) a real, compilable
//! surface: [`AppBuilder`]/[`RouteBuilder`] so a project builds and runs *before*
//! `nuruc` has ever looked at it, [`App::run`]/[`App::run_repl`] as the "was not
//! intercepted" fallback (§4.7.1) that a correctly wired build replaces, and the small
//! domain types (`Terminal`, `Config<T>`, `Logger<T>`, the message marker traits) that
//! handler signatures and `nuruc`'s binding resolver both need to agree on.
//!
//! `nuruc` never calls into this crate: it reads the same method names and attribute
//! tokens straight out of source. Keeping this crate's API shape and `nuruc`'s DSL
//! vocabulary (`compiler/nuruc/src/dsl/interpreter.rs`) in lockstep is a manual
//! invariant, the same way pavex's `Blueprint` builder and `pavexc`'s blueprint walker
//! are kept in lockstep by hand.

mod app;
mod builder;
pub mod config;
pub mod convert;
mod http_client;
mod logger;
mod message;
pub mod suggest;
mod terminal;

pub use app::App;
pub use builder::{AppBuilder, RouteBuilder};
pub use config::Config;
pub use convert::{NuruTypeConverter, ParseIgnoreCase};
pub use http_client::{HttpClient, StaticHttpClient};
pub use logger::{Logger, LoggerFactory};
pub use message::{Command, Idempotent, Query};
pub use terminal::{format_return_value, DefaultTerminal, TableOptions, TableRow, Terminal, TestTerminal};

/// Re-exported so downstream crates only need to depend on `nuru` to reach the
/// attribute macros (`#[nuru_route]` and friends).
pub use nuru_macros::*;

/// Converts an argument-parsing/dispatch failure into a process exit code.
///
/// The emitted dispatcher never panics on a routing miss (§7): a non-match prints a
/// "did you mean" suggestion to stderr and returns this exit code instead.
pub const EXIT_NO_MATCH: i32 = 1;
pub const EXIT_SUCCESS: i32 = 0;
