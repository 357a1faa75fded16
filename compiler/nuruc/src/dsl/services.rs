//! Interprets the `.configure_services(|services| { ... })` closure body (§4.3),
//! recognizing the small vocabulary of service-registration calls made against the
//! closure's own parameter.

use nuru_ir::{Lifetime, ServiceRegistration, codes};
use syn::Expr;

use crate::diagnostic::{DiagnosticSink, RawDiagnostic};
use crate::util;

use super::draft::AppModelDraft;

pub fn interpret(
    closure_expr: &Expr,
    draft: &mut AppModelDraft,
    file_path: &str,
    source: &str,
    sink: &DiagnosticSink,
) {
    let Expr::Closure(closure) = unwrap_ref(closure_expr) else {
        return;
    };
    let param_name = closure
        .inputs
        .first()
        .and_then(pat_ident)
        .unwrap_or_else(|| "services".to_string());

    let stmts: Vec<&Expr> = match closure.body.as_ref() {
        Expr::Block(b) => b
            .block
            .stmts
            .iter()
            .filter_map(|s| match s {
                syn::Stmt::Expr(e, _) => Some(e),
                _ => None,
            })
            .collect(),
        other => vec![other],
    };

    for stmt in stmts {
        interpret_call(stmt, &param_name, draft, file_path, source, sink);
    }
}

fn unwrap_ref(expr: &Expr) -> &Expr {
    match expr {
        Expr::Reference(r) => unwrap_ref(&r.expr),
        Expr::Paren(p) => unwrap_ref(&p.expr),
        other => other,
    }
}

fn pat_ident(pat: &syn::Pat) -> Option<String> {
    match pat {
        syn::Pat::Ident(i) => Some(i.ident.to_string()),
        syn::Pat::Type(t) => pat_ident(&t.pat),
        _ => None,
    }
}

fn interpret_call(
    expr: &Expr,
    param_name: &str,
    draft: &mut AppModelDraft,
    file_path: &str,
    source: &str,
    sink: &DiagnosticSink,
) {
    let Expr::MethodCall(mc) = expr else { return };
    let Expr::Path(recv) = mc.receiver.as_ref() else {
        return;
    };
    if recv.path.get_ident().map(|i| i.to_string()).as_deref() != Some(param_name) {
        return;
    }

    let method = mc.method.to_string();
    let loc = util::span_to_location(mc.method.span(), file_path, source);
    let generics: Vec<String> = mc
        .turbofish
        .as_ref()
        .map(|t| {
            t.args
                .iter()
                .filter_map(|a| match a {
                    syn::GenericArgument::Type(ty) => Some(util::type_to_string(ty)),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let lifetime = match method.as_str() {
        "add_singleton" => Some(Lifetime::Singleton),
        "add_scoped" => Some(Lifetime::Scoped),
        "add_transient" => Some(Lifetime::Transient),
        _ => None,
    };

    if let Some(lifetime) = lifetime {
        let service_type = generics.first().cloned().unwrap_or_default();
        let implementation_type = generics.get(1).cloned().unwrap_or_else(|| service_type.clone());
        draft.add_service(ServiceRegistration::new(
            service_type,
            implementation_type,
            lifetime,
            loc,
        ));
        return;
    }

    match method.as_str() {
        "add_http_client" => {
            let service_type = generics.first().cloned().unwrap_or_default();
            let mut service = ServiceRegistration::new(
                service_type.clone(),
                service_type,
                Lifetime::Singleton,
                loc,
            );
            service.is_http_client = true;
            service.http_client_configuration_body =
                mc.args.first().map(|e| quote::quote!(#e).to_string());
            draft.add_service(service);
        }
        "add_logging" => {
            let mut service = ServiceRegistration::new("Logger", "Logger", Lifetime::Singleton, loc);
            service.is_logger = true;
            draft.add_service(service);
        }
        "add_type_converter" => {
            // Structural effect lives at the binding level (§4.7.4); nothing to record
            // on `AppModel` itself beyond having seen the call (handled by the combiner
            // cross-checking parameter types against this closure's text, see combine).
        }
        other => sink.push(
            RawDiagnostic::warning(format!(
                "unknown service-registration call `.{other}(...)` on `configure_services`"
            ))
            .code(codes::NURU_050_UNKNOWN_SERVICE_CALL)
            .at(util::span_to_location(mc.method.span(), file_path, source)),
        ),
    }
}
