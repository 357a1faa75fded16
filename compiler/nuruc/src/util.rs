//! Shared helpers used by more than one extraction stage.

use nuru_ir::Location;

/// Convert a `proc_macro2::Span` into a [`Location`], computing the byte offset by
/// scanning `source` up to the span's 1-indexed line/column (`proc_macro2` only gives
/// us line/column with the `span-locations` feature, never a byte offset directly).
pub fn span_to_location(span: proc_macro2::Span, file: &str, source: &str) -> Location {
    let start = span.start();
    let line = start.line as u32;
    let column = start.column as u32;
    let mut offset = 0usize;
    for (idx, l) in source.split_inclusive('\n').enumerate() {
        if idx + 1 == start.line {
            offset += (start.column).min(l.len());
            break;
        }
        offset += l.len();
    }
    Location::new(line, column, offset, file)
}

/// Render a `syn` path as a dotted string, ignoring generic arguments — good enough
/// for matching against the method tables in §4.3/§4.4 without pulling in a full
/// type-resolution pass.
pub fn path_to_string(path: &syn::Path) -> String {
    path.segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect::<Vec<_>>()
        .join("::")
}

/// The first (and, for our purposes, only) generic type argument on a method call's
/// turbofish, e.g. the `Foo` in `.add_singleton::<Foo>()`.
pub fn first_turbofish_type(segment: &syn::PathSegment) -> Option<String> {
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        syn::GenericArgument::Type(ty) => Some(type_to_string(ty)),
        _ => None,
    })
}

/// All generic type arguments on a turbofish, in order.
pub fn turbofish_types(segment: &syn::PathSegment) -> Vec<String> {
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return Vec::new();
    };
    args.args
        .iter()
        .filter_map(|arg| match arg {
            syn::GenericArgument::Type(ty) => Some(type_to_string(ty)),
            _ => None,
        })
        .collect()
}

pub fn type_to_string(ty: &syn::Type) -> String {
    quote::quote!(#ty).to_string().replace(' ', "")
}

/// Pull the `&str`/`String` literal out of a method-call argument, if it's one.
pub fn str_literal(expr: &syn::Expr) -> Option<String> {
    match expr {
        syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Str(s),
            ..
        }) => Some(s.value()),
        syn::Expr::Reference(r) => str_literal(&r.expr),
        _ => None,
    }
}
