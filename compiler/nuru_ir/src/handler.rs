use crate::location::Location;

/// The syntactic shape `nuruc`'s handler extractor recognized for `.WithHandler(...)`
/// (or, for attributed endpoints, the sibling method the request class points at).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HandlerKind {
    /// `(args) => expr`
    Lambda,
    /// `(args) => { ... }`
    BlockLambda,
    /// A reference to a free function or associated method.
    MethodReference,
    /// Extraction failed; a stub that panics at runtime is emitted instead.
    None,
}

/// Where a handler parameter's value comes from at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BindingSource {
    /// Bound to a positional [`nuru_ir::segment::ParameterSegment`] by name, or by
    /// position when the names don't match.
    PositionalParameter,
    Option,
    CatchAll,
    /// Resolved from the service registry (`ConfigureServices`), either a lazy
    /// singleton/scoped field or a direct `new` for a transient.
    Service,
    /// The `ITerminal`-equivalent parameter.
    Terminal,
    /// The running app handle itself.
    App,
    /// An `IConfiguration`-equivalent parameter.
    Configuration,
    /// An `ILogger<T>`-equivalent parameter.
    Logger,
}

/// One parameter on the handler's signature, and how the dispatcher should supply it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ParameterBinding {
    pub handler_parameter_name: String,
    pub parameter_type_name: String,
    pub source: BindingSource,
    /// The route segment this binding draws from, when `source` is positional/option/
    /// catch-all and the names differ (matched by position instead).
    pub route_segment_name: Option<String>,
    pub is_nullable: bool,
    pub is_enum_type: bool,
    /// `true` if an `AddTypeConverter<T>()` registration covers this parameter's type.
    pub has_converter: bool,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct HandlerDefinition {
    pub kind: HandlerKind,
    pub parameters: Vec<ParameterBinding>,
    pub return_type: Option<String>,
    pub is_async: bool,
    /// Opaque source span of the handler body; carried through to the emitter
    /// verbatim rather than re-parsed.
    pub body_span: Option<String>,
    /// `true` when the closure-capture check in `nuruc`'s handler validator found a
    /// free identifier outside the handler's own scope (`NURU_H002`). Such handlers
    /// are still modeled (so diagnostics can point at them) but are emitted as a stub
    /// that panics at runtime.
    pub has_closure_capture: bool,
    pub location: Location,
}

impl HandlerDefinition {
    pub fn is_valid(&self) -> bool {
        self.kind != HandlerKind::None && !self.has_closure_capture
    }
}
