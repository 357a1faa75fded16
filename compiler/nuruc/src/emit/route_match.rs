//! Per-route match block codegen (§4.7.3): one labeled block per route, in
//! specificity-descending / declaration-order-ascending order, each either falling
//! through to the next route (`break 'skip_i`) or returning from `dispatch` once its
//! handler has run.
//!
//! A labeled block expression (`'skip_i: { .. break 'skip_i; .. }`) is this crate's
//! idiomatic-Rust reading of the pseudocode's `goto skip` (§4.7.3): it gives every
//! route its own early-exit target without an actual `goto`, a real return value, or
//! a helper enum to thread failure back out through.

use nuru_ir::{BindingSource, RouteDefinition, SegmentDefinition};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::combine::deps::ConstructorIndex;

use super::{convert, services};

/// Render one route's `'skip_i: { ... }` block. `route_args` is assumed bound to
/// `&[String]` (the configuration-override-stripped argv) in the enclosing function.
pub fn render(
    route: &RouteDefinition,
    index: usize,
    services_list: &[nuru_ir::ServiceRegistration],
    constructors: &ConstructorIndex,
    has_logging: bool,
) -> TokenStream {
    let label = syn::Lifetime::new(&format!("'skip_{index}"), proc_macro2::Span::call_site());
    let pattern_lit = route.pattern.clone();

    let options: Vec<_> = route.segments.iter().filter_map(SegmentDefinition::as_option).collect();
    let positional_like: Vec<&SegmentDefinition> = route
        .segments
        .iter()
        .filter(|s| !matches!(s, SegmentDefinition::Option(_)))
        .collect();
    let min_positional = positional_like
        .iter()
        .filter(|s| matches!(s, SegmentDefinition::Literal(_) | SegmentDefinition::EndOfOptions(_)))
        .count()
        + route.min_positional_count();

    let literal_prefix_check = render_literal_prefix_check(&positional_like, &label);
    let help_check = render_help_check(route);
    let option_decls: Vec<TokenStream> = options.iter().map(|o| render_option_extraction(o, &label)).collect();
    let positional_checks = render_positional_checks(&positional_like, &label);

    let handler_call = match &route.handler {
        Some(h) if h.is_valid() => render_handler_call(h, services_list, constructors, has_logging),
        _ => quote! {
            app.terminal().write_error_line(&format!(
                "internal error: route `{}` has no usable handler",
                #pattern_lit
            ));
            return 1;
        },
    };

    quote! {
        #label: {
            if route_args.len() < #min_positional {
                break #label;
            }
            #literal_prefix_check
            #help_check
            let mut __consumed: ::fixedbitset::FixedBitSet =
                ::fixedbitset::FixedBitSet::with_capacity(route_args.len().max(1));
            #(#option_decls)*
            let __positional: Vec<&str> = route_args
                .iter()
                .enumerate()
                .filter(|(i, _)| !__consumed.contains(*i))
                .map(|(_, s)| s.as_str())
                .collect();
            let mut __cursor = 0usize;
            #(#positional_checks)*
            #handler_call
        }
    }
}

/// Literal-only prefix check (§4.7.3: "literal prefix check" runs before typed
/// positional extraction and option parsing), over raw `route_args` rather than the
/// option-filtered `__positional` list built further down — this is what lets the
/// per-route `--help`/`-h` check run before any `TryParse`-equivalent conversion can
/// fail and skip the route out from under it.
fn render_literal_prefix_check(segments: &[&SegmentDefinition], label: &syn::Lifetime) -> TokenStream {
    let mut checks = Vec::new();
    for seg in segments {
        match seg {
            SegmentDefinition::Literal(l) => {
                let value = &l.value;
                checks.push(quote! {
                    if route_args.get(__lit_cursor).map(|s| s.as_str()) != Some(#value) {
                        break #label;
                    }
                    __lit_cursor += 1;
                });
            }
            SegmentDefinition::EndOfOptions(_) => {
                checks.push(quote! {
                    if route_args.get(__lit_cursor).map(|s| s.as_str()) != Some("--") {
                        break #label;
                    }
                    __lit_cursor += 1;
                });
            }
            SegmentDefinition::Parameter(p) if p.is_catch_all => {}
            SegmentDefinition::Parameter(_) => {
                checks.push(quote! { __lit_cursor += 1; });
            }
            SegmentDefinition::Option(_) => {}
        }
    }
    quote! {
        let mut __lit_cursor = 0usize;
        #(#checks)*
    }
}

/// One option segment: scan `route_args` for its long (and optional short) form, not
/// yet consumed; required/repeated/value-carrying variants all fall out of the same
/// shape (§4.7.3's "bitset of consumed indices (no HashSet)").
fn render_option_extraction(option: &nuru_ir::OptionSegment, label: &syn::Lifetime) -> TokenStream {
    let long = option.long_form.clone().unwrap_or_default();
    let long_flag = format!("--{long}");
    let short_flag = option.short_form.map(|c| format!("-{c}"));
    let value_ident = option_ident(&long);
    let present_ident = format_ident!("{}_present", value_ident);

    let short_match = match &short_flag {
        Some(s) => quote! { || route_args[__i] == #s },
        None => quote! {},
    };

    if !option.expects_value {
        return quote! {
            let mut #present_ident = false;
            for __i in 0..route_args.len() {
                if __consumed.contains(__i) { continue; }
                if route_args[__i] == #long_flag #short_match {
                    __consumed.insert(__i);
                    #present_ident = true;
                }
            }
        };
    }

    let (rust_ty, parse) = convert::parse_expr(&quote! { __raw }, option.type_constraint.as_deref(), None);
    let missing_guard = if !option.is_optional {
        quote! {
            if #value_ident.is_none() {
                break #label;
            }
        }
    } else {
        quote! {}
    };

    if option.is_repeated {
        quote! {
            let mut #value_ident: Vec<#rust_ty> = Vec::new();
            {
                let mut __i = 0usize;
                while __i < route_args.len() {
                    if !__consumed.contains(__i) && (route_args[__i] == #long_flag #short_match) {
                        __consumed.insert(__i);
                        if __i + 1 < route_args.len() {
                            let __raw = route_args[__i + 1].as_str();
                            __consumed.insert(__i + 1);
                            if let Some(v) = #parse {
                                #value_ident.push(v);
                            }
                        }
                    }
                    __i += 1;
                }
            }
        }
    } else {
        quote! {
            let mut #value_ident: Option<#rust_ty> = None;
            {
                let mut __i = 0usize;
                while __i < route_args.len() {
                    if !__consumed.contains(__i) && (route_args[__i] == #long_flag #short_match) {
                        __consumed.insert(__i);
                        if __i + 1 < route_args.len() {
                            let __raw = route_args[__i + 1].as_str();
                            __consumed.insert(__i + 1);
                            #value_ident = #parse;
                        }
                        break;
                    }
                    __i += 1;
                }
            }
            #missing_guard
        }
    }
}

fn render_positional_checks(segments: &[&SegmentDefinition], label: &syn::Lifetime) -> Vec<TokenStream> {
    segments
        .iter()
        .map(|seg| match seg {
            SegmentDefinition::Literal(l) => {
                let value = &l.value;
                quote! {
                    if __positional.get(__cursor).copied() != Some(#value) {
                        break #label;
                    }
                    __cursor += 1;
                }
            }
            SegmentDefinition::EndOfOptions(_) => {
                quote! {
                    if __positional.get(__cursor).copied() != Some("--") {
                        break #label;
                    }
                    __cursor += 1;
                }
            }
            SegmentDefinition::Parameter(p) if p.is_catch_all => {
                let ident = positional_ident(&p.name);
                quote! {
                    let #ident: Vec<String> = __positional[__cursor.min(__positional.len())..]
                        .iter()
                        .map(|s| s.to_string())
                        .collect();
                    __cursor = __positional.len();
                }
            }
            SegmentDefinition::Parameter(p) => {
                let ident = positional_ident(&p.name);
                let (rust_ty, parse) =
                    convert::parse_expr(&quote! { __raw }, p.type_constraint.as_deref(), None);
                if p.is_optional {
                    quote! {
                        let #ident: Option<#rust_ty> = match __positional.get(__cursor) {
                            Some(__raw) => {
                                __cursor += 1;
                                #parse
                            }
                            None => None,
                        };
                    }
                } else {
                    quote! {
                        let #ident: #rust_ty = match __positional.get(__cursor) {
                            Some(__raw) => {
                                __cursor += 1;
                                match #parse {
                                    Some(v) => v,
                                    None => break #label,
                                }
                            }
                            None => break #label,
                        };
                    }
                }
            }
            SegmentDefinition::Option(_) => quote! {},
        })
        .collect()
}

/// Per-route `command --help`: checked after the literal-prefix-only check (so a
/// literal mismatch still falls through to the next route first) but before any
/// typed positional/option extraction, so a bad `--help` tail can't be shadowed by a
/// conversion failure on an unrelated parameter (§4.7.3, §4.7.5).
fn render_help_check(route: &RouteDefinition) -> TokenStream {
    let lines = super::help::render_route_help_lines(route);
    quote! {
        if route_args.last().map(|s| s.as_str()) == Some("--help")
            || route_args.last().map(|s| s.as_str()) == Some("-h")
        {
            #(app.terminal().write_line(#lines);)*
            return 0;
        }
    }
}

fn render_handler_call(
    handler: &nuru_ir::HandlerDefinition,
    services_list: &[nuru_ir::ServiceRegistration],
    constructors: &ConstructorIndex,
    has_logging: bool,
) -> TokenStream {
    let callee: TokenStream = handler
        .body_span
        .as_deref()
        .unwrap_or("||{}")
        .parse()
        .unwrap_or_else(|_| quote! { || {} });

    let args: Vec<TokenStream> = handler
        .parameters
        .iter()
        .map(|p| binding_expr(p, services_list, constructors, has_logging))
        .collect();

    quote! {
        let __result = (#callee)(#(#args),*);
        app.terminal().write_line(&::nuru::format_return_value(&__result));
        return 0;
    }
}

fn binding_expr(
    binding: &nuru_ir::ParameterBinding,
    services_list: &[nuru_ir::ServiceRegistration],
    constructors: &ConstructorIndex,
    has_logging: bool,
) -> TokenStream {
    match binding.source {
        BindingSource::Terminal => quote! { app.terminal().clone() },
        BindingSource::App => quote! { app },
        BindingSource::Configuration => quote! { &__configuration },
        BindingSource::Logger => {
            let type_name = &binding.parameter_type_name;
            if has_logging {
                services::logger_expr(type_name)
            } else {
                quote! { ::nuru::Logger::new(#type_name) }
            }
        }
        BindingSource::Service => services::resolve_expr(&binding.parameter_type_name, services_list, constructors),
        BindingSource::PositionalParameter | BindingSource::CatchAll => {
            let name = binding.route_segment_name.as_deref().unwrap_or(&binding.handler_parameter_name);
            let ident = positional_ident(name);
            quote! { #ident }
        }
        BindingSource::Option => {
            let name = binding.route_segment_name.as_deref().unwrap_or(&binding.handler_parameter_name);
            let ident = option_ident(name);
            quote! { #ident }
        }
    }
}

fn positional_ident(name: &str) -> syn::Ident {
    format_ident!("param_{}", sanitize(name))
}

fn option_ident(name: &str) -> syn::Ident {
    format_ident!("opt_{}", sanitize(name))
}

fn sanitize(name: &str) -> String {
    let cleaned: String = name.chars().map(|c| if c.is_alphanumeric() { c } else { '_' }).collect();
    if cleaned.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("_{cleaned}")
    } else {
        cleaned
    }
}
