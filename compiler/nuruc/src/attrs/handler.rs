//! Resolves an attributed endpoint's handler (§4.5): the inherent `fn handle(&self)`
//! method its request struct is expected to define to satisfy `Query`/`Command`.
//!
//! Unlike a fluent `.with_handler(closure)`, there's no parameter list to read
//! bindings off of — the struct's own `#[parameter]`/`#[option]` fields *are* the
//! parameter bindings, populated by the dispatcher before `handle` is called.

use std::collections::HashMap;

use nuru_ir::{BindingSource, HandlerDefinition, HandlerKind, ParameterBinding, ServiceRegistration};

use super::scan::{HandlerSite, RawField, RawFieldKind};

/// Crate-wide lookup from request-struct name to its `fn handle` sighting, built once
/// after every file has been scanned.
pub type HandlerIndex = HashMap<String, HandlerSite>;

pub fn build_index(sites: Vec<HandlerSite>) -> HandlerIndex {
    let mut index = HandlerIndex::new();
    for site in sites {
        // First sighting wins; a struct with two inherent `fn handle` methods across
        // partial `impl` blocks is already a compile error in the host crate itself.
        index.entry(site.struct_name.clone()).or_insert(site);
    }
    index
}

/// Build the [`HandlerDefinition`] for `struct_name`, or a [`HandlerKind::None`] stub
/// if no inherent `fn handle` was found for it (the combiner raises `NURU_H001` for
/// that case, same as an unrecognized fluent handler shape).
pub fn resolve_handler(
    struct_name: &str,
    fields: &[RawField],
    services: &[ServiceRegistration],
    index: &HandlerIndex,
) -> HandlerDefinition {
    let Some(site) = index.get(struct_name) else {
        return HandlerDefinition {
            kind: HandlerKind::None,
            parameters: Vec::new(),
            return_type: None,
            is_async: false,
            body_span: None,
            has_closure_capture: false,
            location: nuru_ir::Location::new(0, 0, 0, String::new()),
        };
    };

    let parameters = fields
        .iter()
        .filter(|f| !matches!(f.kind, RawFieldKind::Plain))
        .map(bind_field)
        .chain(
            fields
                .iter()
                .filter(|f| matches!(f.kind, RawFieldKind::Plain))
                .filter_map(|f| bind_plain_field(f, services)),
        )
        .collect();

    HandlerDefinition {
        kind: HandlerKind::MethodReference,
        parameters,
        return_type: site.return_type.clone(),
        is_async: site.is_async,
        body_span: Some(format!("{struct_name}::handle")),
        has_closure_capture: false,
        location: site.location.clone(),
    }
}

fn bind_field(field: &RawField) -> ParameterBinding {
    let source = match &field.kind {
        RawFieldKind::Parameter(attr) if attr.catch_all => BindingSource::CatchAll,
        RawFieldKind::Parameter(_) => BindingSource::PositionalParameter,
        RawFieldKind::Option(_) | RawFieldKind::GroupOption(_) => BindingSource::Option,
        RawFieldKind::Plain => unreachable!("filtered out by the caller"),
    };
    ParameterBinding {
        handler_parameter_name: field.name.clone(),
        parameter_type_name: field.rust_type.clone(),
        source,
        route_segment_name: Some(field.name.clone()),
        is_nullable: field.rust_type.starts_with("Option<"),
        is_enum_type: false,
        has_converter: false,
    }
}

/// A struct field with no `#[parameter]`/`#[option]` attribute is assumed to be a
/// service dependency, mirroring how a fluent closure parameter's type is matched
/// against `ConfigureServices` registrations (`crate::handler::bind_parameter`). Plain
/// fields that match none of the recognized binding sources are left out of the
/// handler's parameter list — they're the struct's own business, set by its own
/// `Default`/constructor rather than the dispatcher.
fn bind_plain_field(field: &RawField, services: &[ServiceRegistration]) -> Option<ParameterBinding> {
    let bare_type = field
        .rust_type
        .trim_start_matches('&')
        .trim_start_matches("dyn ")
        .to_string();

    let source = if bare_type.contains("Terminal") {
        BindingSource::Terminal
    } else if bare_type == "App" {
        BindingSource::App
    } else if bare_type.starts_with("Configuration") {
        BindingSource::Configuration
    } else if bare_type.starts_with("Logger") {
        BindingSource::Logger
    } else if services.iter().any(|s| s.service_type == bare_type) {
        BindingSource::Service
    } else {
        return None;
    };

    Some(ParameterBinding {
        handler_parameter_name: field.name.clone(),
        parameter_type_name: field.rust_type.clone(),
        source,
        route_segment_name: None,
        is_nullable: field.rust_type.starts_with("Option<"),
        is_enum_type: false,
        has_converter: false,
    })
}
