//! Built-in type conversions (§4.7.4): for every canonical type key in
//! [`nuru_ir::BUILTIN_TYPE_ALIASES`], the exact parse expression the emitter must
//! generate bit-for-bit. A conversion failure always yields `None` — never a panic —
//! so the caller can `break` out of the route's match block instead (§7: type
//! mismatches are a route-skip, not an error).
//!
//! Unrecognized type names (user enums, or a type covered by `.add_type_converter::<T>()`)
//! fall through to [`enum_parse_expr`]/[`converter_parse_expr`].

use proc_macro2::TokenStream;
use quote::quote;

/// Build `let #binding: Option<#rust_ty> = #expr;` for one raw `&str` slot, given the
/// route segment's canonical type key (`None` means untyped/`string`) and, for a
/// parameter covered by `.add_type_converter::<T>()`, that converter's concrete type.
pub fn parse_expr(
    raw: &TokenStream,
    canonical_type: Option<&str>,
    converter_rust_type: Option<&str>,
) -> (TokenStream, TokenStream) {
    if let Some(rust_type) = converter_rust_type {
        let ty = syn::parse_str::<syn::Type>(rust_type).unwrap_or_else(|_| syn::parse_str("String").unwrap());
        return (quote!(#ty), converter_parse_expr(raw, &quote!(#ty)));
    }
    match canonical_type {
        None => (quote!(String), quote!(::std::option::Option::Some(#raw.to_string()))),
        Some(key) => {
            let rust_ty = rust_type_for(key);
            let expr = match key {
                "int" => simple_parse(raw, &rust_ty),
                "long" => simple_parse(raw, &rust_ty),
                "short" => simple_parse(raw, &rust_ty),
                "byte" => simple_parse(raw, &rust_ty),
                "uint" => simple_parse(raw, &rust_ty),
                "ulong" => simple_parse(raw, &rust_ty),
                "ushort" => simple_parse(raw, &rust_ty),
                "double" => simple_parse(raw, &rust_ty),
                "float" => simple_parse(raw, &rust_ty),
                "decimal" => simple_parse(raw, &rust_ty),
                "bool" => quote!(#raw.parse::<bool>().ok()),
                "string" => quote!(::std::option::Option::Some(#raw.to_string())),
                "guid" => quote!(#raw.parse::<::uuid::Uuid>().ok()),
                "datetime" => quote!(#raw.parse::<::std::time::SystemTime>().ok()),
                "date" => quote!(#raw.parse::<::std::string::String>().ok()),
                "time" => quote!(#raw.parse::<::std::string::String>().ok()),
                "timespan" => parse_duration(raw),
                "uri" => quote!(::reqwest::Url::parse(#raw).ok()),
                "path" => quote!(::std::option::Option::Some(::std::path::PathBuf::from(#raw))),
                "ipaddress" => quote!(#raw.parse::<::std::net::IpAddr>().ok()),
                _ => enum_parse_expr(raw, key),
            };
            (rust_ty, expr)
        }
    }
}

/// `FromStr`/`TryFrom` conversions that are all spelled the same way modulo the
/// target type name (§4.7.4's first two table rows).
fn simple_parse(raw: &TokenStream, rust_ty: &TokenStream) -> TokenStream {
    quote!(#raw.parse::<#rust_ty>().ok())
}

fn parse_duration(raw: &TokenStream) -> TokenStream {
    quote! {
        #raw.parse::<u64>().ok().map(::std::time::Duration::from_secs)
    }
}

/// `Enum::TryParse<T>(s, ignoreCase: true, out v)`, translated: a case-insensitive
/// match against the enum's variant names. `key` is the user's bare type identifier
/// (not one of the built-in aliases), assumed to be a `#[derive(Debug)]`-bearing enum
/// in scope with a generated `FromStr`-like inherent fn, `parse_ignore_case`, which the
/// host crate's own `#[derive(NuruMessage)]`-adjacent convention is expected to supply.
fn enum_parse_expr(raw: &TokenStream, key: &str) -> TokenStream {
    let ty = syn::parse_str::<syn::Type>(key).unwrap_or_else(|_| syn::parse_str("String").unwrap());
    quote! {
        <#ty as ::nuru::convert::ParseIgnoreCase>::parse_ignore_case(#raw)
    }
}

/// A parameter whose type matched an `.add_type_converter::<T>()` registration:
/// `instantiate the converter; call TryConvert(s, out object?); cast` (§4.7.4's last
/// row), translated to the `NuruTypeConverter` trait every registered converter must
/// implement.
fn converter_parse_expr(raw: &TokenStream, ty: &TokenStream) -> TokenStream {
    quote! {
        <#ty as ::nuru::convert::NuruTypeConverter>::try_convert(#raw)
    }
}

fn rust_type_for(canonical: &str) -> TokenStream {
    match canonical {
        "int" => quote!(i32),
        "long" => quote!(i64),
        "short" => quote!(i16),
        "byte" => quote!(u8),
        "uint" => quote!(u32),
        "ulong" => quote!(u64),
        "ushort" => quote!(u16),
        "double" => quote!(f64),
        "float" => quote!(f32),
        "decimal" => quote!(f64),
        "bool" => quote!(bool),
        "string" => quote!(String),
        "guid" => quote!(::uuid::Uuid),
        "datetime" | "date" | "time" => quote!(String),
        "timespan" => quote!(::std::time::Duration),
        "uri" => quote!(::reqwest::Url),
        "path" => quote!(::std::path::PathBuf),
        "ipaddress" => quote!(::std::net::IpAddr),
        other => syn::parse_str::<syn::Type>(other)
            .map(|t| quote!(#t))
            .unwrap_or_else(|_| quote!(String)),
    }
}
