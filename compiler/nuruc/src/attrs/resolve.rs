//! Turns the raw, per-file sightings from [`super::scan`] into [`nuru_ir::RouteDefinition`]s:
//! walks each endpoint's `#[nuru_route_group]` parent chain, combines it with the
//! route's own pattern and its `#[parameter]`/`#[option]` fields, and explodes
//! `#[nuru_route_alias]` patterns into one route per alias (§4.4 step 6).

use std::collections::{HashMap, HashSet};

use nuru_ir::{GroupPrefixChain, Location, MessageType, OptionSegment, ParameterSegment, RouteDefinition, SegmentDefinition};
use nuruc_attr_parser::ParameterAttr;

use crate::diagnostic::{DiagnosticSink, RawDiagnostic};

use super::scan::{RawEndpoint, RawField, RawFieldKind, RawGroup, TraitSighting};

/// One route-to-be, still carrying its *unstripped* group chain: whether
/// `discover_endpoints::<G>()` should strip the root prefix (§4.4 "Subset publishing")
/// is a per-app decision the combiner makes, so the chain is resolved here but not yet
/// applied to the final pattern text.
pub struct ResolvedEndpoint {
    pub struct_name: String,
    pub pattern_tail: String,
    pub fields: Vec<RawField>,
    pub description: Option<String>,
    pub message_type: MessageType,
    pub group_chain: GroupPrefixChain,
    /// Root-to-leaf group names this endpoint's chain passes through; used to test
    /// `discover_endpoints::<G>()` membership without restringifying the chain.
    pub group_chain_names: Vec<String>,
    pub location: Location,
}

/// Resolve every endpoint's group chain and explode its aliases.
///
/// `groups` and `endpoints` are expected to already be the crate-wide union across
/// every scanned file: group parents and trait `impl`s are routinely declared in a
/// different file than the endpoint struct that references them.
pub fn resolve(
    groups: &[RawGroup],
    endpoints: &[RawEndpoint],
    trait_sightings: &[(String, TraitSighting)],
    sink: &DiagnosticSink,
) -> Vec<ResolvedEndpoint> {
    let group_map = super::scan::group_index(groups);
    let mut resolved = Vec::new();

    for endpoint in endpoints {
        let (prefixes, names) = match &endpoint.group {
            Some(group_name) => group_chain(group_name, &group_map, sink, &endpoint.location),
            None => (Vec::new(), Vec::new()),
        };
        let chain = GroupPrefixChain(prefixes);
        let message_type = super::scan::merge_message_type(&endpoint.struct_name, trait_sightings);

        push_one(&mut resolved, endpoint, &chain, &names, message_type, endpoint.pattern.clone());
        for alias_pattern in &endpoint.aliases {
            push_one(&mut resolved, endpoint, &chain, &names, message_type, alias_pattern.clone());
        }
    }
    resolved
}

fn push_one(
    out: &mut Vec<ResolvedEndpoint>,
    endpoint: &RawEndpoint,
    chain: &GroupPrefixChain,
    names: &[String],
    message_type: MessageType,
    pattern_tail: String,
) {
    out.push(ResolvedEndpoint {
        struct_name: endpoint.struct_name.clone(),
        pattern_tail,
        fields: endpoint.fields.clone(),
        description: endpoint.description.clone(),
        message_type,
        group_chain: chain.clone(),
        group_chain_names: names.to_vec(),
        location: endpoint.location.clone(),
    });
}

/// Walk `start`'s `parent` references to the root, returning (group-literal-prefixes,
/// group-names), both in root-to-leaf order. A cycle or a dangling `group = "..."`
/// reference is reported once and the chain is truncated at that point rather than
/// aborting the whole endpoint.
fn group_chain(
    start: &str,
    groups: &HashMap<&str, &RawGroup>,
    sink: &DiagnosticSink,
    at: &Location,
) -> (Vec<String>, Vec<String>) {
    let mut prefixes = Vec::new();
    let mut names = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(start.to_string());

    while let Some(name) = current {
        if !seen.insert(name.clone()) {
            sink.push(
                RawDiagnostic::error(format!(
                    "cycle detected while resolving the `#[nuru_route_group]` chain at `{name}`"
                ))
                .at(at.clone()),
            );
            break;
        }
        let Some(group) = groups.get(name.as_str()) else {
            sink.push(
                RawDiagnostic::error(format!(
                    "`{name}` is referenced as a route group but has no `#[nuru_route_group]` attribute"
                ))
                .at(at.clone()),
            );
            break;
        };
        prefixes.push(group.prefix.clone());
        names.push(name);
        current = group.parent.clone();
    }

    prefixes.reverse();
    names.reverse();
    (prefixes, names)
}

/// Assemble the final [`RouteDefinition`] for one (possibly root-stripped) group chain
/// and pattern tail. Called by the combiner once per app, after it has decided whether
/// `discover_endpoints::<G>()` strips this endpoint's root prefix.
pub fn build_route(
    chain: &GroupPrefixChain,
    pattern_tail: &str,
    fields: &[RawField],
    message_type: MessageType,
    description: Option<String>,
    location: Location,
    order: usize,
    sink: &DiagnosticSink,
) -> RouteDefinition {
    let literal_pattern = chain.join_with(pattern_tail);
    let compiled = match crate::pattern::parse_pattern(&literal_pattern) {
        Ok(c) => c,
        Err(e) => {
            sink.push(RawDiagnostic::error(e.to_string()).code(e.code()).at(location.clone()));
            crate::pattern::parse_pattern("").expect("the empty pattern always parses")
        }
    };
    for issue in &compiled.issues {
        sink.push(
            RawDiagnostic {
                code: Some(issue.code),
                message: issue.message.clone(),
                location: Some(location.clone()),
                is_error: issue.is_error,
                help: None,
            },
        );
    }

    let mut segments = compiled.segments;
    let mut position = segments.len();
    for field in fields {
        match &field.kind {
            RawFieldKind::Parameter(attr) => {
                segments.push(SegmentDefinition::Parameter(parameter_segment(field, attr, position)));
                position += 1;
            }
            RawFieldKind::Option(attr) => {
                segments.push(SegmentDefinition::Option(option_segment(
                    field,
                    attr.long.clone(),
                    attr.short.clone(),
                    attr.description.clone(),
                    attr.repeated,
                    position,
                )));
                position += 1;
            }
            RawFieldKind::GroupOption(attr) => {
                segments.push(SegmentDefinition::Option(option_segment(
                    field,
                    attr.long.clone(),
                    attr.short.clone(),
                    None,
                    false,
                    position,
                )));
                position += 1;
            }
            RawFieldKind::Plain => {}
        }
    }

    let specificity = RouteDefinition::compute_specificity(&segments);
    RouteDefinition {
        pattern: crate::pattern::canonical_display(&compiled.tree),
        segments,
        // The combiner fills this in once it has resolved the struct's inherent
        // `fn handle(...)` method (§4.5); an attributed route never carries a handler
        // straight out of the attrs stage.
        handler: None,
        message_type,
        description,
        specificity,
        order,
        group_prefix_chain: chain.clone(),
        aliases: Vec::new(),
        is_help_route: false,
        is_from_attrs: true,
        location,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(name: &str, prefix: &str, parent: Option<&str>) -> RawGroup {
        RawGroup {
            name: name.to_string(),
            prefix: prefix.to_string(),
            parent: parent.map(str::to_string),
        }
    }

    fn endpoint(struct_name: &str, pattern: &str, group_name: Option<&str>) -> RawEndpoint {
        RawEndpoint {
            struct_name: struct_name.to_string(),
            pattern: pattern.to_string(),
            description: None,
            group: group_name.map(str::to_string),
            aliases: Vec::new(),
            fields: Vec::new(),
            location: Location::new(1, 1, 0, "test.rs"),
        }
    }

    /// S6: `[RouteGroup("repo")] RepoBase <- [RouteGroup("base")] RepoBaseBase <-
    /// [Route("sync")] SyncCmd`; the full (unstripped) chain is root-to-leaf
    /// `["repo", "base"]`.
    #[test]
    fn group_chain_walks_parent_links_root_to_leaf() {
        let groups = vec![
            group("RepoBase", "repo", None),
            group("RepoBaseBase", "base", Some("RepoBase")),
        ];
        let endpoints = vec![endpoint("SyncCmd", "sync", Some("RepoBaseBase"))];
        let sink = DiagnosticSink::new();
        let resolved = resolve(&groups, &endpoints, &[], &sink);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].group_chain.0, vec!["repo".to_string(), "base".to_string()]);
        assert_eq!(
            resolved[0].group_chain_names,
            vec!["RepoBase".to_string(), "RepoBaseBase".to_string()]
        );
        assert!(!sink.has_errored());
    }

    #[test]
    fn dangling_group_reference_is_reported_and_truncates_the_chain() {
        let endpoints = vec![endpoint("Orphan", "sync", Some("GhostGroup"))];
        let sink = DiagnosticSink::new();
        let resolved = resolve(&[], &endpoints, &[], &sink);
        assert_eq!(resolved.len(), 1);
        assert!(resolved[0].group_chain.0.is_empty());
        assert!(sink.has_errored());
    }

    #[test]
    fn a_cycle_is_reported_instead_of_looping_forever() {
        let groups = vec![group("A", "a", Some("B")), group("B", "b", Some("A"))];
        let endpoints = vec![endpoint("Leaf", "sync", Some("A"))];
        let sink = DiagnosticSink::new();
        let resolved = resolve(&groups, &endpoints, &[], &sink);
        assert_eq!(resolved.len(), 1);
        assert!(sink.has_errored());
    }

    #[test]
    fn aliases_explode_into_one_resolved_endpoint_per_pattern() {
        let mut ep = endpoint("ListUsers", "users list", None);
        ep.aliases = vec!["u list".to_string(), "u ls".to_string()];
        let sink = DiagnosticSink::new();
        let resolved = resolve(&[], &[ep], &[], &sink);
        let tails: Vec<&str> = resolved.iter().map(|r| r.pattern_tail.as_str()).collect();
        assert_eq!(tails, vec!["users list", "u list", "u ls"]);
    }

    #[test]
    fn build_route_strips_only_the_index_zero_root_when_asked() {
        let full_chain = GroupPrefixChain(vec!["repo".to_string(), "base".to_string()]);
        let sink = DiagnosticSink::new();
        let full = build_route(
            &full_chain,
            "sync",
            &[],
            MessageType::Command,
            None,
            Location::new(1, 1, 0, "test.rs"),
            0,
            &sink,
        );
        assert_eq!(full.pattern, "repo base sync");

        let stripped_chain = full_chain.without_root();
        let stripped = build_route(
            &stripped_chain,
            "sync",
            &[],
            MessageType::Command,
            None,
            Location::new(1, 1, 0, "test.rs"),
            0,
            &sink,
        );
        assert_eq!(stripped.pattern, "base sync");
    }
}

fn strip_option(rust_type: &str) -> (bool, String) {
    match rust_type
        .strip_prefix("Option<")
        .and_then(|s| s.strip_suffix('>'))
    {
        Some(inner) => (true, inner.to_string()),
        None => (false, rust_type.to_string()),
    }
}

/// `String`/`str`/`&str` stay untyped (canonical display falls back to "string"); any
/// other identifier not in [`nuru_ir::BUILTIN_TYPE_ALIASES`] is assumed to be a
/// user-defined enum, resolved against its actual variants later by the emitter.
fn classify_type(bare: &str) -> (Option<String>, bool) {
    if bare == "String" || bare == "str" || bare == "&str" {
        return (None, false);
    }
    match nuru_ir::canonical_type_name(bare) {
        Some(canon) => (Some(canon.to_string()), false),
        None => (Some(bare.to_string()), true),
    }
}

fn parameter_segment(field: &RawField, attr: &ParameterAttr, position: usize) -> ParameterSegment {
    let (is_optional, inner) = strip_option(&field.rust_type);
    let (type_constraint, is_enum_type) = classify_type(&inner);
    ParameterSegment {
        position,
        name: field.name.clone(),
        type_constraint,
        rust_type_name: Some(inner),
        is_optional,
        is_catch_all: attr.catch_all,
        is_enum_type,
        description: attr.description.clone(),
    }
}

/// Shared by `#[option]` and `#[group_option]` fields; the latter just never carries
/// its own `description`/`repeated` (it re-declares an inherited option, it doesn't
/// redefine it).
fn option_segment(
    field: &RawField,
    long: String,
    short: Option<String>,
    description: Option<String>,
    repeated: bool,
    position: usize,
) -> OptionSegment {
    let (is_optional_wrap, inner) = strip_option(&field.rust_type);
    let elem_type = if repeated {
        inner
            .strip_prefix("Vec<")
            .and_then(|s| s.strip_suffix('>'))
            .map(|s| s.to_string())
            .unwrap_or_else(|| inner.clone())
    } else {
        inner.clone()
    };
    let is_bool = elem_type == "bool";
    let type_constraint = if is_bool { None } else { classify_type(&elem_type).0 };
    let short_form = short.and_then(|s| s.chars().next());

    OptionSegment {
        position,
        long_form: Some(long),
        short_form,
        parameter_name: Some(field.name.clone()),
        type_constraint,
        rust_type_name: if is_bool { None } else { Some(elem_type) },
        expects_value: !is_bool,
        // A bare `bool` field is still an optional flag in practice (its absence just
        // means "false"); only value-carrying options inherit their required-ness from
        // the field's own `Option<T>` wrapping.
        is_optional: is_bool || is_optional_wrap,
        is_repeated: repeated,
        parameter_is_optional: false,
        description,
    }
}
