//! The intermediate representation produced by the front end of the Nuru compiler.
//!
//! There are no guarantees that this schema is stable across `nuru` versions: it is
//! an internal contract between the compiler's extraction stages and its emitter.
use std::fmt;
use std::fmt::Formatter;

mod app;
mod diagnostic_code;
mod handler;
mod location;
mod route;
mod segment;
mod service;

pub use app::{AppModel, BehaviorDefinition, EntryPoint, EntryPointKind, PipelineDefinition};
pub use diagnostic_code::codes;
pub use handler::{BindingSource, HandlerDefinition, HandlerKind, ParameterBinding};
pub use location::Location;
pub use route::{GroupPrefixChain, MessageType, RouteDefinition};
pub use segment::{
    EndOfOptionsSeparator, LiteralSegment, OptionSegment, ParameterSegment, SegmentDefinition,
};
pub use service::{Lifetime, ServiceRegistration};

/// The canonical short-form spelling for every type constraint the compiler understands
/// out of the box, keyed by every spelling it will accept (case-insensitively).
///
/// `nuruc`'s lexer consults this table to normalize a pattern's `{name:type}` annotations;
/// the emitter consults it again to decide which `FromStr`/`TryFrom` conversion to generate.
pub const BUILTIN_TYPE_ALIASES: &[(&str, &str)] = &[
    ("int", "int"),
    ("i32", "int"),
    ("integer", "int"),
    ("long", "long"),
    ("i64", "long"),
    ("short", "short"),
    ("i16", "short"),
    ("byte", "byte"),
    ("i8", "byte"),
    ("uint", "uint"),
    ("u32", "uint"),
    ("ulong", "ulong"),
    ("u64", "ulong"),
    ("ushort", "ushort"),
    ("u16", "ushort"),
    ("double", "double"),
    ("f64", "double"),
    ("float", "float"),
    ("f32", "float"),
    ("decimal", "decimal"),
    ("bool", "bool"),
    ("boolean", "bool"),
    ("string", "string"),
    ("str", "string"),
    ("guid", "guid"),
    ("uuid", "guid"),
    ("datetime", "datetime"),
    ("date", "date"),
    ("time", "time"),
    ("timespan", "timespan"),
    ("duration", "timespan"),
    ("uri", "uri"),
    ("url", "uri"),
    ("path", "path"),
    ("ipaddress", "ipaddress"),
    ("ip", "ipaddress"),
];

/// Resolve a user-written type annotation (any casing, any accepted alias) to its
/// canonical short form, or `None` if it isn't one of [`BUILTIN_TYPE_ALIASES`].
///
/// Unrecognized identifiers aren't necessarily invalid: they might name a
/// user-defined enum, which is resolved later once the attribute/DSL extractors
/// have seen the relevant type declaration.
pub fn canonical_type_name(raw: &str) -> Option<&'static str> {
    let lower = raw.to_ascii_lowercase();
    BUILTIN_TYPE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| *canonical)
}

/// A stable identifier for one of the diagnostics `nuruc` can raise, e.g. `NURU_R002`.
///
/// Kept as a thin wrapper (rather than a bare `&'static str`) so that the diagnostic
/// catalogue can be grepped for and so that `Display` always renders the `NURU_` prefix
/// consistently, regardless of which stage raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DiagnosticCode(pub &'static str);

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
