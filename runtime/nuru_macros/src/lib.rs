//! Attribute macros for Nuru's attributed-route surface (§6.1, §4.4).
//!
//! None of these macros rewrite their input: `nuruc` reads the very same attribute
//! tokens straight out of unexpanded source with `syn`, so by the time `rustc` macro
//! expansion runs the compiler has already done its job. These macros exist purely so
//! the attributes are legal syntax — without them `#[nuru_route(...)]` on a plain
//! struct would be an "unknown attribute" error — and so they fail fast, at macro
//! expansion time, on the same malformed input `nuruc` would otherwise only catch
//! during a full build.
//!
//! Each macro re-parses its own attribute string through [`nuruc_attr_parser`] purely
//! for the diagnostic; the item itself always passes through unchanged.

use proc_macro::TokenStream;
use syn::parse_macro_input;

macro_rules! inert_attribute {
    ($name:ident, $kind:expr) => {
        #[proc_macro_attribute]
        pub fn $name(attr: TokenStream, item: TokenStream) -> TokenStream {
            validate(attr, $kind);
            item
        }
    };
}

inert_attribute!(nuru_route, nuruc_attr_parser::AttributeKind::Route);
inert_attribute!(nuru_route_group, nuruc_attr_parser::AttributeKind::RouteGroup);
inert_attribute!(nuru_route_alias, nuruc_attr_parser::AttributeKind::RouteAlias);
inert_attribute!(parameter, nuruc_attr_parser::AttributeKind::Parameter);
inert_attribute!(option, nuruc_attr_parser::AttributeKind::Option);
inert_attribute!(group_option, nuruc_attr_parser::AttributeKind::GroupOption);
inert_attribute!(
    configuration_key,
    nuruc_attr_parser::AttributeKind::ConfigurationKey
);

/// Re-parse the raw attribute tokens the same way `nuruc`'s attribute extractor will,
/// surfacing a compile error immediately if they're malformed rather than waiting for
/// the next `nuruc` invocation.
fn validate(attr: TokenStream, kind: nuruc_attr_parser::AttributeKind) {
    let attr_str = format!("#[{}({})]", kind.attribute_name(), attr);
    let Ok(parsed_attr) = syn::parse_str::<syn::Attribute>(&attr_str) else {
        return;
    };
    if let Err(e) = nuruc_attr_parser::parse(std::iter::once(attr_str.as_str())) {
        let _ = parsed_attr;
        proc_macro_error_stub(e.to_string());
    }
}

/// `proc-macro-error`-free fallback: panicking inside a proc macro body is rendered by
/// `rustc` as a compile error pointing at the macro invocation, which is good enough
/// here since these macros don't need span-precise diagnostics (`nuruc` itself does).
fn proc_macro_error_stub(message: String) {
    panic!("{message}");
}

/// `#[derive(NuruMessage)]` is unused by the compiler (message-type inference reads
/// `impl Query<_>`/`impl Command<_>`/`impl Idempotent` blocks textually, per §4.4 point
/// 5) but is kept so request structs can opt into a `Debug`-friendly marker without
/// hand-writing an empty `impl` block.
#[proc_macro_derive(NuruMessage)]
pub fn derive_nuru_message(input: TokenStream) -> TokenStream {
    let _ = parse_macro_input!(input as syn::DeriveInput);
    TokenStream::new()
}
