//! Walks one parsed source file collecting every `#[nuru_route_group]`/`#[nuru_route]`
//! struct and every `impl Query<_>`/`impl Command<_>`/`impl Idempotent` block, without
//! yet resolving group chains or message types across files (that's [`super::resolve`]'s
//! job, once every file in the crate has been scanned).

use std::collections::HashMap;

use nuru_ir::Location;
use nuruc_attr_parser::{AttributeProperties, GroupOptionAttr, OptionAttr, ParameterAttr};
use syn::{Fields, Item};

use crate::diagnostic::{DiagnosticSink, RawDiagnostic};
use crate::util;

#[derive(Debug, Clone)]
pub struct RawGroup {
    pub name: String,
    pub prefix: String,
    pub parent: Option<String>,
}

#[derive(Debug, Clone)]
pub enum RawFieldKind {
    Parameter(ParameterAttr),
    Option(OptionAttr),
    GroupOption(GroupOptionAttr),
    /// Not a parameter/option field: either a service dependency or plain state the
    /// emitter leaves for the struct's own `Default`/constructor to fill in.
    Plain,
}

#[derive(Debug, Clone)]
pub struct RawField {
    pub name: String,
    pub rust_type: String,
    pub kind: RawFieldKind,
}

#[derive(Debug, Clone)]
pub struct RawEndpoint {
    pub struct_name: String,
    pub pattern: String,
    pub description: Option<String>,
    pub group: Option<String>,
    pub aliases: Vec<String>,
    pub fields: Vec<RawField>,
    pub location: Location,
}

/// A sighting of `impl <Trait> for <StructName>`, recorded so message-type inference
/// (§4.4 step 5) can be done once across every file instead of requiring the `impl`
/// block to precede or follow its struct within the same file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraitSighting {
    Query,
    Command,
    Idempotent,
}

/// An inherent `impl StructName { fn handle(...) }` sighting — the handler every
/// `Query`/`Command` request struct is expected to provide (§4.5).
#[derive(Debug, Clone)]
pub struct HandlerSite {
    pub struct_name: String,
    pub is_async: bool,
    pub return_type: Option<String>,
    pub location: Location,
}

#[derive(Default)]
pub struct ScanResult {
    pub groups: Vec<RawGroup>,
    pub endpoints: Vec<RawEndpoint>,
    pub trait_sightings: Vec<(String, TraitSighting)>,
    pub handler_sites: Vec<HandlerSite>,
}

pub fn scan_file(file: &syn::File, file_path: &str, source: &str, sink: &DiagnosticSink) -> ScanResult {
    let mut result = ScanResult::default();
    visit_items(&file.items, file_path, source, sink, &mut result);
    result
}

fn visit_items(items: &[Item], file_path: &str, source: &str, sink: &DiagnosticSink, out: &mut ScanResult) {
    for item in items {
        match item {
            Item::Struct(s) => scan_struct(s, file_path, source, sink, out),
            Item::Impl(i) => scan_impl(i, file_path, source, out),
            Item::Mod(m) => {
                if let Some((_, items)) = &m.content {
                    visit_items(items, file_path, source, sink, out);
                }
            }
            _ => {}
        }
    }
}

/// Parse every Nuru attribute in `attrs`, one attribute at a time.
///
/// A struct item legitimately carries more than one *distinct* Nuru attribute — a
/// `#[nuru_route]` alongside a `#[nuru_route_alias]`, say — but
/// [`nuruc_attr_parser::parse`] only tolerates a single match per call (it exists to
/// validate one macro invocation's own attribute, not a whole item's attribute list).
/// Calling it once per attribute, each in its own singleton iterator, gets the same
/// validation without that restriction getting in the way.
fn parse_all(
    attrs: &[syn::Attribute],
    file_path: &str,
    source: &str,
    sink: &DiagnosticSink,
) -> Vec<AttributeProperties> {
    let mut found = Vec::new();
    for attr in attrs {
        let rendered = quote::quote!(#attr).to_string();
        match nuruc_attr_parser::parse(std::iter::once(rendered.as_str())) {
            Ok(Some(props)) => found.push(props),
            Ok(None) => {}
            Err(e) => {
                use syn::spanned::Spanned;
                let loc = util::span_to_location(attr.span(), file_path, source);
                sink.push(RawDiagnostic::error(e.to_string()).at(loc));
            }
        }
    }
    found
}

fn scan_struct(s: &syn::ItemStruct, file_path: &str, source: &str, sink: &DiagnosticSink, out: &mut ScanResult) {
    let props = parse_all(&s.attrs, file_path, source, sink);
    if props.is_empty() {
        return;
    }
    let loc = util::span_to_location(s.ident.span(), file_path, source);
    let struct_name = s.ident.to_string();

    let mut route = None;
    let mut group = None;
    let mut aliases: Vec<String> = Vec::new();
    for p in props {
        match p {
            AttributeProperties::Route(r) => route = Some(r),
            AttributeProperties::RouteGroup(g) => group = Some(g),
            AttributeProperties::RouteAlias(a) => aliases.extend(a.patterns),
            // Field-only attributes on a struct item itself are a misuse `nuruc`
            // silently ignores here; the field scan below is where they're expected.
            _ => {}
        }
    }

    if let Some(g) = group {
        out.groups.push(RawGroup {
            name: struct_name.clone(),
            prefix: g.prefix,
            parent: g.parent,
        });
    }

    let Some(route) = route else { return };
    let fields = scan_fields(&s.fields, file_path, source, sink);
    out.endpoints.push(RawEndpoint {
        struct_name,
        pattern: route.pattern,
        description: route.description,
        group: route.group,
        aliases,
        fields,
        location: loc,
    });
}

fn scan_fields(fields: &Fields, file_path: &str, source: &str, sink: &DiagnosticSink) -> Vec<RawField> {
    let Fields::Named(named) = fields else {
        return Vec::new();
    };
    named
        .named
        .iter()
        .map(|f| {
            let name = f.ident.as_ref().map(|i| i.to_string()).unwrap_or_default();
            let rust_type = util::type_to_string(&f.ty);
            let props = parse_all(&f.attrs, file_path, source, sink);
            let kind = props
                .into_iter()
                .find_map(|p| match p {
                    AttributeProperties::Parameter(a) => Some(RawFieldKind::Parameter(a)),
                    AttributeProperties::Option(a) => Some(RawFieldKind::Option(a)),
                    AttributeProperties::GroupOption(a) => Some(RawFieldKind::GroupOption(a)),
                    _ => None,
                })
                .unwrap_or(RawFieldKind::Plain);
            RawField { name, rust_type, kind }
        })
        .collect()
}

fn scan_impl(i: &syn::ItemImpl, file_path: &str, source: &str, out: &mut ScanResult) {
    let syn::Type::Path(self_ty) = i.self_ty.as_ref() else {
        return;
    };
    let Some(self_name) = self_ty.path.segments.last().map(|s| s.ident.to_string()) else {
        return;
    };

    match &i.trait_ {
        Some((_, path, _)) => {
            let Some(trait_name) = path.segments.last().map(|s| s.ident.to_string()) else {
                return;
            };
            let sighting = match trait_name.as_str() {
                "Query" => TraitSighting::Query,
                "Command" => TraitSighting::Command,
                "Idempotent" => TraitSighting::Idempotent,
                _ => return,
            };
            out.trait_sightings.push((self_name, sighting));
        }
        None => {
            let Some(handle_fn) = i.items.iter().find_map(|item| match item {
                syn::ImplItem::Fn(f) if f.sig.ident == "handle" => Some(f),
                _ => None,
            }) else {
                return;
            };
            let loc = util::span_to_location(handle_fn.sig.ident.span(), file_path, source);
            let return_type = match &handle_fn.sig.output {
                syn::ReturnType::Type(_, ty) => Some(util::type_to_string(ty)),
                syn::ReturnType::Default => None,
            };
            out.handler_sites.push(HandlerSite {
                struct_name: self_name,
                is_async: handle_fn.sig.asyncness.is_some(),
                return_type,
                location: loc,
            });
        }
    }
}

/// Merge every crate-wide sighting for `struct_name` (§4.4 step 5): `Query` wins
/// outright, `Command + Idempotent` together make `IdempotentCommand`, `Command` alone
/// stays `Command`, and a struct with neither is `Unspecified`.
pub fn merge_message_type(struct_name: &str, sightings: &[(String, TraitSighting)]) -> nuru_ir::MessageType {
    let mut has_query = false;
    let mut has_command = false;
    let mut has_idempotent = false;
    for (name, sighting) in sightings {
        if name != struct_name {
            continue;
        }
        match sighting {
            TraitSighting::Query => has_query = true,
            TraitSighting::Command => has_command = true,
            TraitSighting::Idempotent => has_idempotent = true,
        }
    }
    if has_query {
        nuru_ir::MessageType::Query
    } else if has_command && has_idempotent {
        nuru_ir::MessageType::IdempotentCommand
    } else if has_command {
        nuru_ir::MessageType::Command
    } else {
        nuru_ir::MessageType::Unspecified
    }
}

/// Build the name-keyed lookup [`super::resolve::group_chain`] walks.
pub fn group_index(groups: &[RawGroup]) -> HashMap<&str, &RawGroup> {
    groups.iter().map(|g| (g.name.as_str(), g)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> ScanResult {
        let file = syn::parse_file(source).expect("valid Rust source");
        let sink = DiagnosticSink::new();
        scan_file(&file, "test.rs", source, &sink)
    }

    #[test]
    fn finds_a_routed_struct_and_its_parameter_field() {
        let result = scan(
            r#"
            #[nuru_route("user create {name}", description = "create a user")]
            struct CreateUser {
                #[parameter]
                name: String,
            }
            "#,
        );
        assert_eq!(result.endpoints.len(), 1);
        let endpoint = &result.endpoints[0];
        assert_eq!(endpoint.struct_name, "CreateUser");
        assert_eq!(endpoint.pattern, "user create {name}");
        assert_eq!(endpoint.description.as_deref(), Some("create a user"));
        assert_eq!(endpoint.fields.len(), 1);
        assert!(matches!(endpoint.fields[0].kind, RawFieldKind::Parameter(_)));
    }

    #[test]
    fn finds_a_route_group_struct() {
        let result = scan(
            r#"
            #[nuru_route_group("repo", parent = "OuterGroup")]
            struct RepoBase;
            "#,
        );
        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].name, "RepoBase");
        assert_eq!(result.groups[0].prefix, "repo");
        assert_eq!(result.groups[0].parent.as_deref(), Some("OuterGroup"));
    }

    #[test]
    fn struct_with_no_nuru_attributes_is_ignored() {
        let result = scan(
            r#"
            struct PlainData {
                value: i32,
            }
            "#,
        );
        assert!(result.endpoints.is_empty());
        assert!(result.groups.is_empty());
    }

    #[test]
    fn records_trait_sightings_and_handler_sites() {
        let result = scan(
            r#"
            struct ListUsers;
            impl Query<Vec<String>> for ListUsers {}
            impl ListUsers {
                fn handle(&self) -> Vec<String> {
                    Vec::new()
                }
            }
            "#,
        );
        assert_eq!(result.trait_sightings, vec![("ListUsers".to_string(), TraitSighting::Query)]);
        assert_eq!(result.handler_sites.len(), 1);
        assert_eq!(result.handler_sites[0].struct_name, "ListUsers");
    }

    #[test]
    fn merge_message_type_prefers_query_over_command() {
        let sightings = vec![
            ("X".to_string(), TraitSighting::Command),
            ("X".to_string(), TraitSighting::Query),
        ];
        assert_eq!(merge_message_type("X", &sightings), nuru_ir::MessageType::Query);
    }

    #[test]
    fn merge_message_type_combines_command_and_idempotent() {
        let sightings = vec![
            ("X".to_string(), TraitSighting::Command),
            ("X".to_string(), TraitSighting::Idempotent),
        ];
        assert_eq!(
            merge_message_type("X", &sightings),
            nuru_ir::MessageType::IdempotentCommand
        );
    }

    #[test]
    fn merge_message_type_defaults_to_unspecified() {
        assert_eq!(merge_message_type("Y", &[]), nuru_ir::MessageType::Unspecified);
    }
}
