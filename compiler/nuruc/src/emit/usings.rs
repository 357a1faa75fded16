//! User usings passthrough (§4.7.7): the top-level `use` items from the compilation
//! unit that owned the `.build()` call, carried into the generated module so a
//! handler body (re-emitted verbatim from its `body_span`) can still resolve whatever
//! names it relied on implicitly.

use proc_macro2::TokenStream;
use quote::quote;

/// Emitter defaults every generated module already brings into scope; a user `use`
/// that re-imports one of these is dropped rather than duplicated.
const DEFAULT_IMPORTS: &[&str] = &["nuru", "std", "core", "alloc"];

/// Render `app.user_usings` (already collected root-relative, e.g. `"foo::Bar"`) as
/// `use` items, skipping anything that only re-states a default import's root.
pub fn render(user_usings: &[String]) -> TokenStream {
    let mut seen = std::collections::HashSet::new();
    let items: Vec<TokenStream> = user_usings
        .iter()
        .filter(|path| {
            let root = path.split("::").next().unwrap_or(path);
            !DEFAULT_IMPORTS.contains(&root) && seen.insert(path.as_str())
        })
        .filter_map(|path| syn::parse_str::<syn::Path>(path).ok())
        .map(|path| quote! { use #path; })
        .collect();
    quote! { #(#items)* }
}
