use crate::location::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Lifetime {
    Singleton,
    Scoped,
    Transient,
}

/// One `AddSingleton/Scoped/Transient[<T,TImpl>]` (or `AddHttpClient`/`AddLogging`)
/// call seen inside a `ConfigureServices(...)` lambda.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ServiceRegistration {
    pub service_type: String,
    pub implementation_type: String,
    pub lifetime: Lifetime,
    /// Resolved at registration time by walking the implementation's constructor;
    /// `nuruc`'s DI resolver recurses through these to build transients inline and to
    /// raise `NURU051` when one can't be resolved.
    pub constructor_dependency_types: Vec<String>,
    pub is_http_client: bool,
    /// Source of the optional `client => { ... }` configuration lambda passed to
    /// `AddHttpClient`, copied verbatim into the emitted static factory.
    pub http_client_configuration_body: Option<String>,
    pub is_logger: bool,
    pub location: Location,
}

impl ServiceRegistration {
    pub fn new(
        service_type: impl Into<String>,
        implementation_type: impl Into<String>,
        lifetime: Lifetime,
        location: Location,
    ) -> Self {
        Self {
            service_type: service_type.into(),
            implementation_type: implementation_type.into(),
            lifetime,
            constructor_dependency_types: Vec::new(),
            is_http_client: false,
            http_client_configuration_body: None,
            is_logger: false,
            location,
        }
    }
}
