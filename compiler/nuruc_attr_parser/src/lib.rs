//! Parses the Nuru route-declaring attributes (`#[nuru_route]`, `#[nuru_route_group]`,
//! `#[nuru_route_alias]`, `#[parameter]`, `#[option]`, `#[group_option]`,
//! `#[configuration_key]`) out of a request struct's attribute list.
//!
//! `nuruc`'s attributed route extractor (§4.4) never touches `syn::Attribute` directly:
//! it calls [`parse`] once per item/field and pattern-matches on the returned
//! [`AttributeProperties`]. Keeping the darling/syn plumbing in its own crate mirrors
//! how the rest of the Nuru toolchain is laid out — `nuru_macros` depends on this same
//! crate so that the attribute macros it exposes and the compiler that reads them back
//! never drift out of sync on field names or defaults.

use darling::FromMeta;
use darling::ast::NestedMeta;

pub mod errors;

pub use errors::AttributeParserError;

/// Every route-declaring attribute `nuruc` recognizes, keyed the way
/// [`errors::UnknownNuruAttribute`] reports them.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AttributeKind {
    Route,
    RouteGroup,
    RouteAlias,
    Parameter,
    Option,
    GroupOption,
    ConfigurationKey,
}

impl AttributeKind {
    pub fn attribute_name(&self) -> &'static str {
        match self {
            AttributeKind::Route => "nuru_route",
            AttributeKind::RouteGroup => "nuru_route_group",
            AttributeKind::RouteAlias => "nuru_route_alias",
            AttributeKind::Parameter => "parameter",
            AttributeKind::Option => "option",
            AttributeKind::GroupOption => "group_option",
            AttributeKind::ConfigurationKey => "configuration_key",
        }
    }
}

/// `#[nuru_route("users list", description = "...", group = "UserGroup")]` on a
/// request struct. `group` names the `#[nuru_route_group]`-bearing marker struct this
/// route's pattern is prefixed with, resolved recursively through that group's own
/// `parent`.
#[derive(Debug, Clone, PartialEq, Eq, FromMeta)]
pub struct RouteAttr {
    #[darling(rename = "0")]
    pub pattern: String,
    #[darling(default)]
    pub description: Option<String>,
    #[darling(default)]
    pub group: Option<String>,
}

/// `#[nuru_route_group("repo", parent = "OuterGroup")]` on an abstract base request
/// struct. `parent` chains to another group marker, collected root-to-leaf.
#[derive(Debug, Clone, PartialEq, Eq, FromMeta)]
pub struct RouteGroupAttr {
    #[darling(rename = "0")]
    pub prefix: String,
    #[darling(default)]
    pub parent: Option<String>,
}

/// `#[nuru_route_alias("u list", "u ls")]`; every positional argument is an additional
/// pattern that dispatches to the same handler as the struct's primary `#[nuru_route]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteAliasAttr {
    pub patterns: Vec<String>,
}

impl FromMeta for RouteAliasAttr {
    fn from_list(items: &[NestedMeta]) -> darling::Result<Self> {
        let mut patterns = Vec::with_capacity(items.len());
        for item in items {
            match item {
                NestedMeta::Lit(syn::Lit::Str(s)) => patterns.push(s.value()),
                other => return Err(darling::Error::unsupported_shape("string literal").with_span(other)),
            }
        }
        Ok(RouteAliasAttr { patterns })
    }
}

/// `#[parameter(description = "...", catch_all = true)]` on a request struct field.
#[derive(Debug, Clone, PartialEq, Eq, Default, FromMeta)]
pub struct ParameterAttr {
    #[darling(default)]
    pub description: Option<String>,
    #[darling(default)]
    pub catch_all: bool,
}

/// `#[option(long = "force", short = "f", description = "...", repeated = true)]`.
#[derive(Debug, Clone, PartialEq, Eq, FromMeta)]
pub struct OptionAttr {
    pub long: String,
    #[darling(default)]
    pub short: Option<String>,
    #[darling(default)]
    pub description: Option<String>,
    #[darling(default)]
    pub repeated: bool,
}

/// `#[group_option(long = "verbose", short = "v")]`; re-declares an option inherited
/// from a `[NuruRouteGroup]` ancestor on a leaf request struct.
#[derive(Debug, Clone, PartialEq, Eq, FromMeta)]
pub struct GroupOptionAttr {
    pub long: String,
    #[darling(default)]
    pub short: Option<String>,
}

/// `#[configuration_key("Section")]` on an `IOptions<T>`-equivalent handler parameter.
#[derive(Debug, Clone, PartialEq, Eq, FromMeta)]
pub struct ConfigurationKeyAttr {
    #[darling(rename = "0")]
    pub section: String,
}

/// The parsed, strongly-typed form of whichever Nuru attribute [`parse`] found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeProperties {
    Route(RouteAttr),
    RouteGroup(RouteGroupAttr),
    RouteAlias(RouteAliasAttr),
    Parameter(ParameterAttr),
    Option(OptionAttr),
    GroupOption(GroupOptionAttr),
    ConfigurationKey(ConfigurationKeyAttr),
}

/// Parse the Nuru attribute (if any) out of a set of raw attribute token strings
/// attached to a single item or field.
///
/// Takes an iterator rather than a single string because an item can carry attributes
/// that aren't ours (`#[derive(Debug)]`, doc comments, ...) interleaved with the one we
/// care about; everything that isn't a recognized Nuru attribute path is silently
/// skipped rather than erroring, mirroring how the upstream attribute-parsing crate
/// this one was modeled on treats unrelated attributes.
pub fn parse<'a>(
    attrs: impl Iterator<Item = &'a str>,
) -> Result<Option<AttributeProperties>, AttributeParserError> {
    let mut found = None;
    for raw in attrs {
        let Ok(attr) = syn::parse_str::<syn::Attribute>(raw) else {
            continue;
        };
        let Some(parsed) = parse_one(&attr)? else {
            continue;
        };
        if found.is_some() {
            return Err(AttributeParserError::MultipleRouteAttributes);
        }
        found = Some(parsed);
    }
    Ok(found)
}

fn parse_one(attr: &syn::Attribute) -> Result<Option<AttributeProperties>, AttributeParserError> {
    let path = attr.path();
    let Some(last) = path.segments.last() else {
        return Ok(None);
    };
    let kind = match last.ident.to_string().as_str() {
        "nuru_route" => AttributeKind::Route,
        "nuru_route_group" => AttributeKind::RouteGroup,
        "nuru_route_alias" => AttributeKind::RouteAlias,
        "parameter" => AttributeKind::Parameter,
        "option" => AttributeKind::Option,
        "group_option" => AttributeKind::GroupOption,
        "configuration_key" => AttributeKind::ConfigurationKey,
        _ => return Ok(None),
    };

    let meta_list = match &attr.meta {
        syn::Meta::List(list) => NestedMeta::parse_meta_list(list.tokens.clone())
            .map_err(|e| InvalidAttributeParamsForKind(e, kind))?,
        syn::Meta::Path(_) => Vec::new(),
        syn::Meta::NameValue(_) => {
            return Err(errors::UnknownNuruAttribute::new(path).into());
        }
    };

    let props = match kind {
        AttributeKind::Route => AttributeProperties::Route(
            RouteAttr::from_list(&meta_list).map_err(|e| InvalidAttributeParamsForKind(e, kind))?,
        ),
        AttributeKind::RouteGroup => AttributeProperties::RouteGroup(
            RouteGroupAttr::from_list(&meta_list)
                .map_err(|e| InvalidAttributeParamsForKind(e, kind))?,
        ),
        AttributeKind::RouteAlias => AttributeProperties::RouteAlias(
            RouteAliasAttr::from_list(&meta_list)
                .map_err(|e| InvalidAttributeParamsForKind(e, kind))?,
        ),
        AttributeKind::Parameter => AttributeProperties::Parameter(
            ParameterAttr::from_list(&meta_list)
                .map_err(|e| InvalidAttributeParamsForKind(e, kind))?,
        ),
        AttributeKind::Option => AttributeProperties::Option(
            OptionAttr::from_list(&meta_list).map_err(|e| InvalidAttributeParamsForKind(e, kind))?,
        ),
        AttributeKind::GroupOption => AttributeProperties::GroupOption(
            GroupOptionAttr::from_list(&meta_list)
                .map_err(|e| InvalidAttributeParamsForKind(e, kind))?,
        ),
        AttributeKind::ConfigurationKey => AttributeProperties::ConfigurationKey(
            ConfigurationKeyAttr::from_list(&meta_list)
                .map_err(|e| InvalidAttributeParamsForKind(e, kind))?,
        ),
    };
    Ok(Some(props))
}

#[allow(non_snake_case)]
fn InvalidAttributeParamsForKind(e: darling::Error, kind: AttributeKind) -> AttributeParserError {
    errors::InvalidAttributeParams::new(e, kind).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one_str(s: &str) -> Result<Option<AttributeProperties>, AttributeParserError> {
        parse(std::iter::once(s))
    }

    #[test]
    fn parses_route() {
        let props = parse_one_str(r#"#[nuru_route("users list", description = "List users")]"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            props,
            AttributeProperties::Route(RouteAttr {
                pattern: "users list".into(),
                description: Some("List users".into()),
                group: None,
            })
        );
    }

    #[test]
    fn parses_route_alias() {
        let props = parse_one_str(r#"#[nuru_route_alias("u list", "u ls")]"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            props,
            AttributeProperties::RouteAlias(RouteAliasAttr {
                patterns: vec!["u list".into(), "u ls".into()],
            })
        );
    }

    #[test]
    fn unrelated_attribute_is_skipped() {
        assert_eq!(parse_one_str("#[derive(Debug)]").unwrap(), None);
    }

    #[test]
    fn parses_option() {
        let props = parse_one_str(r#"#[option(long = "force", short = "f", repeated = true)]"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            props,
            AttributeProperties::Option(OptionAttr {
                long: "force".into(),
                short: Some("f".into()),
                description: None,
                repeated: true,
            })
        );
    }
}
