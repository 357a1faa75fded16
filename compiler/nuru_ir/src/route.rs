use crate::location::Location;
use crate::segment::SegmentDefinition;

/// How a route's message is dispatched once the handler returns.
///
/// `Unspecified` is the default for fluent routes that never called
/// `.AsQuery()`/`.AsCommand()`/`.AsIdempotentCommand()`. It behaves like [`Command`] at
/// runtime (confirmation prompts, non-cacheable) but is rendered as a blank cell in
/// help tables and as `null` — never a kebab-case string — in the capabilities JSON.
///
/// [`Command`]: MessageType::Command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum MessageType {
    Query,
    Command,
    IdempotentCommand,
    Unspecified,
}

impl MessageType {
    /// The kebab-case spelling used on the capabilities JSON wire, or `None` for
    /// [`MessageType::Unspecified`] (which is emitted as a JSON `null`).
    pub fn wire_name(&self) -> Option<&'static str> {
        match self {
            MessageType::Query => Some("query"),
            MessageType::Command => Some("command"),
            MessageType::IdempotentCommand => Some("idempotent-command"),
            MessageType::Unspecified => None,
        }
    }
}

/// The literals inherited from a chain of `[NuruRouteGroup]` attributes, root-to-leaf.
///
/// An empty chain means the route was declared at the top level (fluent `Map(...)`, or
/// an attributed endpoint with no group ancestor).
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GroupPrefixChain(pub Vec<String>);

impl GroupPrefixChain {
    pub fn join_with(&self, pattern_tail: &str) -> String {
        if self.0.is_empty() {
            return pattern_tail.to_string();
        }
        let prefix = self.0.join(" ");
        if pattern_tail.is_empty() {
            prefix
        } else {
            format!("{prefix} {pattern_tail}")
        }
    }

    /// Strip the root element (index 0), used by subset publishing when the
    /// `DiscoverEndpoints(typeof(G))` root `G` coincides with the chain's own root.
    pub fn without_root(&self) -> GroupPrefixChain {
        if self.0.is_empty() {
            GroupPrefixChain::default()
        } else {
            GroupPrefixChain(self.0[1..].to_vec())
        }
    }
}

/// One compiled route: a pattern, its handler binding, and the metadata the
/// combiner/emitter need to order, validate and codegen it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RouteDefinition {
    /// Canonical display form, e.g. `"deploy {env} --force"`.
    pub pattern: String,
    pub segments: Vec<SegmentDefinition>,
    /// `None` for attributed endpoints, whose handler lives on a sibling method of the
    /// request class rather than inline in the fluent chain.
    pub handler: Option<crate::handler::HandlerDefinition>,
    pub message_type: MessageType,
    pub description: Option<String>,
    /// Sum of each segment's `specificity_contribution()`.
    pub specificity: i32,
    /// Declaration order within its `AppModel`; the tie-breaker after specificity.
    pub order: usize,
    pub group_prefix_chain: GroupPrefixChain,
    /// Extra patterns (from `[NuruRouteAlias]`) that dispatch to the same handler.
    pub aliases: Vec<String>,
    pub is_help_route: bool,
    /// `true` for a route sourced from an attribute-annotated request class rather
    /// than the fluent `.Map(pattern)` chain; the combiner uses this to re-split the
    /// merged route list back into `AppModel::routes`/`AppModel::attributed_routes`.
    pub is_from_attrs: bool,
    pub location: Location,
}

impl RouteDefinition {
    pub fn is_from_attrs(&self) -> bool {
        self.is_from_attrs
    }
}

impl RouteDefinition {
    pub fn compute_specificity(segments: &[SegmentDefinition]) -> i32 {
        segments.iter().map(|s| s.specificity_contribution()).sum()
    }

    /// The "required signature": the pattern with optional positionals, catch-alls and
    /// non-required options erased. Two routes with the same required signature but
    /// different positional type constraints overlap (`NURU_R001`); a route whose
    /// required signature is a prefix of another, lower-or-equal-specificity route's,
    /// may shadow it (`NURU_R003`).
    pub fn required_signature(&self) -> Vec<String> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                SegmentDefinition::Literal(l) => Some(l.value.clone()),
                SegmentDefinition::Parameter(p) if !p.is_optional && !p.is_catch_all => {
                    Some(format!(
                        "{{:{}}}",
                        p.type_constraint.as_deref().unwrap_or("string")
                    ))
                }
                SegmentDefinition::Option(o) if !o.is_optional => {
                    Some(format!("opt:{}", o.long_form.as_deref().unwrap_or("")))
                }
                _ => None,
            })
            .collect()
    }

    pub fn min_positional_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, SegmentDefinition::Parameter(p) if !p.is_optional && !p.is_catch_all))
            .count()
    }
}
