//! REPL completion provider (§4.7.8), emitted only for apps that called `.run_repl()`
//! at least once (`app.has_repl`).

use nuru_ir::{RouteDefinition, SegmentDefinition};
use proc_macro2::TokenStream;
use quote::quote;

/// `get_completions_<i>(current_input, arg_index, has_trailing_space)`.
pub fn render(routes: &[&RouteDefinition], index: usize) -> TokenStream {
    let fn_name = quote::format_ident!("get_completions_{index}");

    let command_literals: Vec<String> = routes
        .iter()
        .filter(|r| !r.is_help_route)
        .filter_map(|r| match r.segments.first() {
            Some(SegmentDefinition::Literal(l)) => Some(l.value.clone()),
            _ => None,
        })
        .collect();

    let per_command_arms: Vec<TokenStream> = routes
        .iter()
        .filter(|r| !r.is_help_route)
        .map(|route| {
            let first_literal = route.segments.iter().find_map(|s| match s {
                SegmentDefinition::Literal(l) => Some(l.value.clone()),
                _ => None,
            });
            let Some(command) = first_literal else {
                return quote! {};
            };
            let mut suggestions: Vec<String> = route
                .segments
                .iter()
                .skip(1)
                .filter_map(|s| match s {
                    SegmentDefinition::Literal(l) => Some(l.value.clone()),
                    SegmentDefinition::Option(o) => o.long_form.clone().map(|l| format!("--{l}")),
                    _ => None,
                })
                .collect();
            suggestions.push("--help".to_string());
            quote! {
                if command == #command {
                    out.extend([#(#suggestions.to_string()),*]);
                }
            }
        })
        .collect();

    quote! {
        pub fn #fn_name(current_input: &str, _arg_index: usize, has_trailing_space: bool) -> Vec<String> {
            let mut out: Vec<String> = vec!["--help".to_string()];
            let tokens: Vec<&str> = current_input.split_whitespace().collect();
            if tokens.is_empty() || (!has_trailing_space && tokens.len() == 1) {
                let prefix = tokens.first().copied().unwrap_or("");
                out.extend(
                    [#(#command_literals.to_string()),*]
                        .into_iter()
                        .filter(|c| c.starts_with(prefix)),
                );
                return out;
            }
            if has_trailing_space {
                if let Some(command) = tokens.first() {
                    let command = *command;
                    #(#per_command_arms)*
                }
            }
            out
        }
    }
}
