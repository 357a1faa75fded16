//! Stage 8 (§4.7): turns every combined, validated [`AppModel`] into a single
//! generated Rust source file.
//!
//! One `pub mod` per `AppModel` (keyed by its position in the compilation's app list,
//! since a single crate can call `AppBuilder::new()....build()` more than once), each
//! exposing `dispatch`/`run`/`run_repl` plus the help/version/capabilities/completions
//! helpers the spec's pseudocode groups under one dispatcher class (§4.7's namespace
//! diagram) — a Rust module is the idiomatic stand-in for that file-scoped class.

mod capabilities;
pub mod convert;
mod help;
mod repl;
mod route_match;
mod services;
mod usings;

use nuru_ir::AppModel;
use proc_macro2::TokenStream;
use quote::quote;

use crate::combine::deps::ConstructorIndex;

const BUILTIN_FLAG_PATTERNS: &[(&str, &str)] = &[("--help", "-h"), ("--version", ""), ("--capabilities", "")];

/// Render every app in this compilation into one formatted Rust source file.
pub fn emit_file(apps: &[AppModel], constructors: &ConstructorIndex) -> String {
    let app_modules: Vec<TokenStream> = apps
        .iter()
        .enumerate()
        .map(|(index, app)| emit_app_module(app, index, constructors))
        .collect();

    let file_tokens = quote! {
        //! Generated by `nuruc`. Do not edit by hand; re-run the compiler instead.
        #![allow(dead_code, unused_variables, unused_mut, clippy::all)]

        #(#app_modules)*
    };

    match syn::parse2::<syn::File>(file_tokens.clone()) {
        Ok(file) => prettyplease::unparse(&file),
        Err(_) => file_tokens.to_string(),
    }
}

fn emit_app_module(app: &AppModel, index: usize, constructors: &ConstructorIndex) -> TokenStream {
    let module_ident = quote::format_ident!("app_{index}");
    let has_logging = app.services.iter().any(|s| s.is_logger);

    let mut routes: Vec<&nuru_ir::RouteDefinition> = app.all_routes().collect();
    routes.sort_by(|a, b| b.specificity.cmp(&a.specificity).then(a.order.cmp(&b.order)));

    let usings = usings::render(&app.user_usings);
    let static_fields = services::render_static_fields(&app.services, has_logging);

    let capabilities_json = capabilities::render(app, &routes);
    let help_fn = help::render_print_help(app, &routes, index);
    let version_fn = help::render_print_version(app, index);

    let route_blocks: Vec<TokenStream> = routes
        .iter()
        .enumerate()
        .map(|(i, route)| route_match::render(route, i, &app.services, constructors, has_logging))
        .collect();

    let builtin_checks = render_builtin_checks(app, &routes, index);

    let first_literals: Vec<&str> = routes
        .iter()
        .filter(|r| !r.is_help_route)
        .filter_map(|r| r.segments.first())
        .filter_map(|s| match s {
            nuru_ir::SegmentDefinition::Literal(l) => Some(l.value.as_str()),
            _ => None,
        })
        .collect();

    let configuration_setup = if app.has_configuration {
        let app_name_for_config: TokenStream = match &app.app_name {
            Some(name) => quote! { Some(#name.to_string()) },
            None => quote! { None },
        };
        quote! {
            let __configuration = {
                let sources = ::nuru::config::ConfigSources {
                    base_path: ::std::env::current_exe()
                        .ok()
                        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                        .unwrap_or_default(),
                    app_name: #app_name_for_config,
                };
                #[cfg(feature = "config")]
                { ::nuru::config::build_figment(&sources, args) }
                #[cfg(not(feature = "config"))]
                { () }
            };
        }
    } else {
        quote! { let __configuration = (); }
    };

    let repl_fn = if app.has_repl {
        repl::render(&routes, index)
    } else {
        quote! {}
    };

    quote! {
        pub mod #module_ident {
            #usings

            #static_fields

            pub const CAPABILITIES_JSON: &str = #capabilities_json;

            #help_fn
            #version_fn
            #repl_fn

            pub fn dispatch(app: &::nuru::App, args: &[String]) -> i32 {
                let route_args: Vec<String> = args
                    .iter()
                    .filter(|a| ::nuru::config::is_configuration_override(a).is_none())
                    .cloned()
                    .collect();
                let route_args: &[String] = &route_args;
                #configuration_setup

                #builtin_checks

                #(#route_blocks)*

                let __candidates: &[&str] = &[#(#first_literals),*];
                let __message = ::nuru::suggest::no_match_message(
                    route_args.first().map(|s| s.as_str()),
                    __candidates,
                );
                app.terminal().write_error_line(&__message);
                ::nuru::EXIT_NO_MATCH
            }

            pub fn run(app: &::nuru::App, args: &[String]) -> i32 {
                dispatch(app, args)
            }

            pub fn run_repl(app: &::nuru::App, args: &[String]) -> i32 {
                dispatch(app, args)
            }
        }
    }
}

fn render_builtin_checks(app: &AppModel, routes: &[&nuru_ir::RouteDefinition], index: usize) -> TokenStream {
    let help_fn = quote::format_ident!("print_help_{index}");
    let version_fn = quote::format_ident!("print_version_{index}");

    let user_patterns: std::collections::HashSet<&str> = routes.iter().map(|r| r.pattern.as_str()).collect();

    let mut checks = Vec::new();
    for (long, short) in BUILTIN_FLAG_PATTERNS {
        if app.disabled_builtin_flags.iter().any(|f| f == long) {
            continue;
        }
        if user_patterns.contains(long) || (!short.is_empty() && user_patterns.contains(short)) {
            // The user mapped the same literal pattern themselves; their route wins
            // and is matched in its ordinary specificity slot below (Open Question,
            // see DESIGN.md).
            continue;
        }
        let check = match *long {
            "--help" => quote! {
                if route_args.len() == 1 && (route_args[0] == "--help" || route_args[0] == "-h") {
                    #help_fn(app);
                    return ::nuru::EXIT_SUCCESS;
                }
            },
            "--version" => quote! {
                if route_args.len() == 1 && route_args[0] == "--version" {
                    #version_fn(app);
                    return ::nuru::EXIT_SUCCESS;
                }
            },
            "--capabilities" => quote! {
                if route_args.len() == 1 && route_args[0] == "--capabilities" {
                    app.terminal().write_line(CAPABILITIES_JSON);
                    return ::nuru::EXIT_SUCCESS;
                }
            },
            _ => quote! {},
        };
        checks.push(check);
    }
    quote! { #(#checks)* }
}
