//! `--help` and `--version` output (§4.7.5): the table contents are fully static
//! (known from the already-combined `AppModel`), so they're computed once here and
//! baked into the generated module as literal row arrays; only the actual coloring
//! and layout is left to [`nuru::Terminal`] at runtime, the same division of labor
//! `DefaultTerminal`/`TestTerminal` already draw for every other handler output.

use nuru_ir::{AppModel, RouteDefinition, SegmentDefinition};
use proc_macro2::TokenStream;
use quote::quote;

const BUILTIN_OPTIONS: &[[&str; 2]] = &[
    ["--help, -h", "Show help information"],
    ["--version", "Show version information"],
    ["--capabilities", "Print a machine-readable capabilities document"],
];

/// `print_help_<i>(app)`: name/version line, description, usage, an options table and
/// a commands table grouped by group-prefix chain header, options before commands
/// (§4.7.5).
pub fn render_print_help(app: &AppModel, routes: &[&RouteDefinition], index: usize) -> TokenStream {
    let fn_name = quote::format_ident!("print_help_{index}");
    let name = app.app_name.clone().unwrap_or_else(|| "app".to_string());
    let version = app.app_version.clone();
    let description = app.app_description.clone();

    let name_version_line = match &version {
        Some(v) => format!("{name} {v}"),
        None => name.clone(),
    };

    let option_rows: Vec<TokenStream> = BUILTIN_OPTIONS
        .iter()
        .map(|[flag, desc]| quote! { vec![#flag.to_string(), #desc.to_string()] })
        .collect();

    let mut groups: Vec<(String, Vec<TokenStream>)> = Vec::new();
    for route in routes {
        if route.is_help_route {
            continue;
        }
        let header = if route.group_prefix_chain.0.is_empty() {
            "COMMANDS".to_string()
        } else {
            route.group_prefix_chain.0.join(" ").to_uppercase()
        };
        let row = {
            let pattern = &route.pattern;
            let desc = route.description.clone().unwrap_or_default();
            quote! { vec![#pattern.to_string(), #desc.to_string()] }
        };
        match groups.iter_mut().find(|(h, _)| h == &header) {
            Some((_, rows)) => rows.push(row),
            None => groups.push((header, vec![row])),
        }
    }

    let group_blocks: Vec<TokenStream> = groups
        .into_iter()
        .map(|(header, rows)| {
            quote! {
                app.terminal().write_line("");
                app.terminal().write_line(#header);
                app.terminal().write_table(&[], &[#(#rows),*], ::nuru::TableOptions::default().hide_headers());
            }
        })
        .collect();

    let description_line = description
        .map(|d| textwrap::fill(&d, 100))
        .map(|d| quote! { app.terminal().write_line(#d); });

    quote! {
        pub fn #fn_name(app: &::nuru::App) {
            app.terminal().write_line(#name_version_line);
            #description_line
            app.terminal().write_line("");
            app.terminal().write_line("USAGE:");
            app.terminal().write_line(&format!("  {} <command> [options]", #name));
            app.terminal().write_line("");
            app.terminal().write_line("OPTIONS");
            app.terminal().write_table(&[], &[#(#option_rows),*], ::nuru::TableOptions::default().hide_headers());
            #(#group_blocks)*
        }
    }
}

pub fn render_print_version(app: &AppModel, index: usize) -> TokenStream {
    let fn_name = quote::format_ident!("print_version_{index}");
    let name = app.app_name.clone().unwrap_or_else(|| "app".to_string());
    let version = app.app_version.clone().unwrap_or_else(|| "0.0.0".to_string());
    let line = format!("{name} {version}");
    quote! {
        pub fn #fn_name(app: &::nuru::App) {
            app.terminal().write_line(#line);
        }
    }
}

/// Route-specific `command --help` block (§4.7.5's last bullet): pattern, description,
/// parameters section, options section.
pub fn render_route_help_lines(route: &RouteDefinition) -> Vec<String> {
    let mut lines = vec![route.pattern.clone()];
    if let Some(d) = &route.description {
        lines.push(d.clone());
    }
    let params: Vec<_> = route.segments.iter().filter_map(SegmentDefinition::as_parameter).collect();
    if !params.is_empty() {
        lines.push(String::new());
        lines.push("PARAMETERS".to_string());
        for p in params {
            let ty = p.type_constraint.as_deref().unwrap_or("string");
            lines.push(format!(
                "  {} ({ty}){}",
                p.name,
                p.description.as_deref().map(|d| format!(" - {d}")).unwrap_or_default()
            ));
        }
    }
    let options: Vec<_> = route.segments.iter().filter_map(SegmentDefinition::as_option).collect();
    if !options.is_empty() {
        lines.push(String::new());
        lines.push("OPTIONS".to_string());
        for o in options {
            let long = o.long_form.as_deref().unwrap_or("");
            let short = o.short_form.map(|c| format!(", -{c}")).unwrap_or_default();
            lines.push(format!(
                "  --{long}{short}{}",
                o.description.as_deref().map(|d| format!(" - {d}")).unwrap_or_default()
            ));
        }
    }
    lines
}
