//! Service/logger/`HttpClient` resolution (§4.7.6): one `static` per singleton/scoped
//! registration and per `HttpClient`, a shared `LoggerFactory` when `.add_logging()`
//! was seen, and — for transients — a direct, compile-time-recursive constructor call
//! at the handler call site instead of a field at all.

use std::collections::HashMap;

use convert_case::{Case, Casing};
use nuru_ir::{Lifetime, ServiceRegistration};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::combine::deps::ConstructorIndex;

/// `static` field declarations for every singleton/scoped registration and every
/// `HttpClient`, plus the shared logger factory field when any registration is one.
pub fn render_static_fields(services: &[ServiceRegistration], has_logging: bool) -> TokenStream {
    let mut fields = Vec::new();
    for service in services {
        if service.is_http_client {
            let field = http_client_field_name(&service.implementation_type);
            fields.push(quote! {
                static #field: ::nuru::StaticHttpClient = ::nuru::StaticHttpClient::new();
            });
            continue;
        }
        if matches!(service.lifetime, Lifetime::Transient) {
            continue;
        }
        let field = singleton_field_name(&service.implementation_type);
        let ty = parse_type(&service.implementation_type);
        fields.push(quote! {
            static #field: ::std::sync::OnceLock<#ty> = ::std::sync::OnceLock::new();
        });
    }
    if has_logging {
        fields.push(quote! {
            static NURU_LOGGER_FACTORY: ::std::sync::OnceLock<::nuru::LoggerFactory> = ::std::sync::OnceLock::new();
        });
    }
    quote! { #(#fields)* }
}

/// Build the expression that resolves one service's value at a handler call site,
/// recursing through its own constructor dependencies for transients (`NURU051`
/// already guarantees this terminates and never needs a registration this pass can't
/// find).
pub fn resolve_expr(
    service_type: &str,
    services: &[ServiceRegistration],
    constructors: &ConstructorIndex,
) -> TokenStream {
    let Some(service) = services.iter().find(|s| s.service_type == service_type) else {
        // Reachability already raised `NURU_D001` for this; emit a stub that panics
        // rather than aborting emission for the whole app.
        let msg = format!("service `{service_type}` has no registration");
        return quote! { panic!(#msg) };
    };

    if service.is_http_client {
        let field = http_client_field_name(&service.implementation_type);
        let ty = parse_type(&service.implementation_type);
        let configure = service
            .http_client_configuration_body
            .as_deref()
            .and_then(|body| body.parse::<TokenStream>().ok())
            .unwrap_or_else(|| quote! { |b| b });
        return quote! {
            #ty::new(#field.get_or_init(#configure).clone())
        };
    }

    match service.lifetime {
        Lifetime::Transient => construct_transient(&service.implementation_type, services, constructors),
        Lifetime::Singleton | Lifetime::Scoped => {
            let field = singleton_field_name(&service.implementation_type);
            let init = construct_transient(&service.implementation_type, services, constructors);
            quote! { #field.get_or_init(|| #init).clone() }
        }
    }
}

fn construct_transient(
    implementation_type: &str,
    services: &[ServiceRegistration],
    constructors: &ConstructorIndex,
) -> TokenStream {
    let ty = parse_type(implementation_type);
    let args: Vec<TokenStream> = constructors
        .get(implementation_type)
        .into_iter()
        .flatten()
        .map(|dep_type| resolve_expr(dep_type, services, constructors))
        .collect();
    quote! { #ty::new(#(#args),*) }
}

fn singleton_field_name(implementation_type: &str) -> syn::Ident {
    format_ident!("NURU_SINGLETON_{}", implementation_type.to_case(Case::UpperSnake))
}

fn http_client_field_name(implementation_type: &str) -> syn::Ident {
    format_ident!("NURU_HTTP_CLIENT_{}", implementation_type.to_case(Case::UpperSnake))
}

fn parse_type(name: &str) -> syn::Type {
    syn::parse_str(name).unwrap_or_else(|_| syn::parse_str("()").expect("unit type always parses"))
}

/// `ILogger<T>` resolution (§4.7.6): `factory.CreateLogger(typeof(T))` without
/// reflection, translated to a string literal the factory matches on directly.
pub fn logger_expr(type_name: &str) -> TokenStream {
    quote! {
        NURU_LOGGER_FACTORY
            .get_or_init(::nuru::LoggerFactory::new)
            .create(#type_name)
    }
}

#[allow(dead_code)]
fn service_index(services: &[ServiceRegistration]) -> HashMap<&str, &ServiceRegistration> {
    services.iter().map(|s| (s.service_type.as_str(), s)).collect()
}
