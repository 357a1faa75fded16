//! Stage 6 (§4.5): classifies a `.with_handler(...)` argument and builds the
//! [`nuru_ir::HandlerDefinition`] the emitter will call into.

mod capture;

use nuru_ir::{BindingSource, HandlerDefinition, HandlerKind, ParameterBinding, SegmentDefinition, ServiceRegistration};
use syn::Expr;

use crate::util;

/// Build a [`HandlerDefinition`] from whatever expression sat in `.with_handler(...)`.
///
/// `route_segments` and `services` are the route's already-compiled segments and the
/// app's service registrations seen so far in the same chain — enough to resolve each
/// closure parameter's [`BindingSource`] without a second cross-file pass.
pub fn extract_handler(
    expr: &Expr,
    route_segments: &[SegmentDefinition],
    services: &[ServiceRegistration],
    file_path: &str,
    source: &str,
) -> HandlerDefinition {
    let location = util::span_to_location(expr_span(expr), file_path, source);
    match unwrap(expr) {
        Expr::Closure(closure) => {
            let is_block = matches!(closure.body.as_ref(), Expr::Block(_));
            let kind = if is_block {
                HandlerKind::BlockLambda
            } else {
                HandlerKind::Lambda
            };
            let parameters = closure
                .inputs
                .iter()
                .map(|p| bind_parameter(p, route_segments, services))
                .collect();
            let has_closure_capture = capture::has_capture(closure);
            HandlerDefinition {
                kind,
                parameters,
                return_type: closure
                    .output
                    .clone()
                    .into_type()
                    .map(|ty| util::type_to_string(&ty)),
                is_async: closure.asyncness.is_some(),
                body_span: Some(quote::quote!(#closure).to_string()),
                has_closure_capture,
                location,
            }
        }
        Expr::Path(p) => HandlerDefinition {
            kind: HandlerKind::MethodReference,
            // A free-function/associated-method path carries its own signature;
            // resolving it requires the full parsed crate (not just this one chain),
            // which happens in the combiner once every file has been walked. Until
            // then we record the path itself so the combiner has something to resolve.
            parameters: Vec::new(),
            return_type: None,
            is_async: false,
            body_span: Some(util::path_to_string(&p.path)),
            has_closure_capture: false,
            location,
        },
        _ => HandlerDefinition {
            kind: HandlerKind::None,
            parameters: Vec::new(),
            return_type: None,
            is_async: false,
            body_span: None,
            has_closure_capture: false,
            location,
        },
    }
}

fn unwrap(expr: &Expr) -> &Expr {
    match expr {
        Expr::Reference(r) => unwrap(&r.expr),
        Expr::Paren(p) => unwrap(&p.expr),
        other => other,
    }
}

fn expr_span(expr: &Expr) -> proc_macro2::Span {
    use syn::spanned::Spanned;
    expr.span()
}

trait IntoReturnType {
    fn into_type(self) -> Option<syn::Type>;
}

impl IntoReturnType for syn::ReturnType {
    fn into_type(self) -> Option<syn::Type> {
        match self {
            syn::ReturnType::Type(_, ty) => Some(*ty),
            syn::ReturnType::Default => None,
        }
    }
}

fn bind_parameter(
    pat: &syn::Pat,
    route_segments: &[SegmentDefinition],
    services: &[ServiceRegistration],
) -> ParameterBinding {
    let (name, ty) = match pat {
        syn::Pat::Type(t) => (pat_ident(&t.pat), Some(util::type_to_string(&t.ty))),
        other => (pat_ident(other), None),
    };
    let name = name.unwrap_or_default();
    let type_name = ty.unwrap_or_else(|| "_".to_string());
    let bare_type = type_name
        .trim_start_matches('&')
        .trim_start_matches("dyn ")
        .to_string();
    let is_nullable = type_name.starts_with("Option<") || type_name.starts_with("&Option<");

    let matching_segment = route_segments.iter().find(|s| match s {
        SegmentDefinition::Parameter(p) => p.name == name,
        SegmentDefinition::Option(o) => o.parameter_name.as_deref() == Some(name.as_str()),
        _ => false,
    });

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
        match matching_segment {
            Some(SegmentDefinition::Parameter(p)) if p.is_catch_all => BindingSource::CatchAll,
            Some(SegmentDefinition::Option(_)) => BindingSource::Option,
            _ => BindingSource::PositionalParameter,
        }
    };

    let is_enum_type = matching_segment
        .map(|s| match s {
            SegmentDefinition::Parameter(p) => p.is_enum_type,
            SegmentDefinition::Option(o) => o.type_constraint.is_some() && o.rust_type_name.is_none(),
            _ => false,
        })
        .unwrap_or(false);

    ParameterBinding {
        handler_parameter_name: name.clone(),
        parameter_type_name: type_name,
        source,
        route_segment_name: matching_segment.map(|_| name),
        is_nullable,
        is_enum_type,
        has_converter: false,
    }
}

fn pat_ident(pat: &syn::Pat) -> Option<String> {
    match pat {
        syn::Pat::Ident(i) => Some(i.ident.to_string()),
        syn::Pat::Reference(r) => pat_ident(&r.pat),
        _ => None,
    }
}
