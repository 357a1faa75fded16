//! Route-level validation (§4.6): duplicates, overlaps, and shadowing, all expressed
//! in terms of [`nuru_ir::RouteDefinition::required_signature`] so the three checks
//! share one notion of "these two routes are comparable".

use nuru_ir::{codes, RouteDefinition};

use crate::diagnostic::{DiagnosticSink, RawDiagnostic};

/// Run every pairwise route check for one app's already-merged route list.
///
/// Unreachable routes (`NURU_R003`) are dropped from the list that gets returned —
/// the emitter should never see a route that can't be reached — and reported at
/// error severity, same as duplicates (§7: "Structural | NURU_R001/R002/R003 | Error
/// (R002/R003) or warning (R001)"); only the overlap check (`NURU_R001`) stays a
/// warning.
pub fn validate(mut routes: Vec<RouteDefinition>, sink: &DiagnosticSink) -> Vec<RouteDefinition> {
    check_duplicates(&routes, sink);
    check_overlaps(&routes, sink);
    let shadowed = find_shadowed(&routes, sink);
    if !shadowed.is_empty() {
        // Highest indices first so removal doesn't shift the indices still pending.
        let mut shadowed: Vec<usize> = shadowed.into_iter().collect();
        shadowed.sort_unstable_by(|a, b| b.cmp(a));
        for index in shadowed {
            routes.remove(index);
        }
    }
    routes
}

fn check_duplicates(routes: &[RouteDefinition], sink: &DiagnosticSink) {
    for i in 0..routes.len() {
        for j in (i + 1)..routes.len() {
            if routes[i].pattern == routes[j].pattern {
                sink.push(
                    RawDiagnostic::error(format!(
                        "route `{}` is declared more than once",
                        routes[j].pattern
                    ))
                    .code(codes::NURU_R002_DUPLICATE_ROUTE)
                    .at(routes[j].location.clone()),
                );
            }
        }
    }
}

fn check_overlaps(routes: &[RouteDefinition], sink: &DiagnosticSink) {
    for i in 0..routes.len() {
        for j in (i + 1)..routes.len() {
            let a = &routes[i];
            let b = &routes[j];
            if a.pattern == b.pattern {
                // Already reported as a duplicate; an overlap warning on top would be
                // noise rather than a distinct diagnostic.
                continue;
            }
            if a.required_signature() == b.required_signature() && positional_types_differ(a, b) {
                sink.push(
                    RawDiagnostic::warning(format!(
                        "route `{}` overlaps with `{}`: the same required arguments are typed \
                         differently between the two routes",
                        b.pattern, a.pattern
                    ))
                    .code(codes::NURU_R001_OVERLAPPING_ROUTES)
                    .at(b.location.clone()),
                );
            }
        }
    }
}

fn positional_types_differ(a: &RouteDefinition, b: &RouteDefinition) -> bool {
    let a_types: Vec<_> = a
        .segments
        .iter()
        .filter_map(|s| s.as_parameter())
        .map(|p| p.type_constraint.clone())
        .collect();
    let b_types: Vec<_> = b
        .segments
        .iter()
        .filter_map(|s| s.as_parameter())
        .map(|p| p.type_constraint.clone())
        .collect();
    a_types != b_types
}

/// Indices (into `routes`) of routes that can never be reached because an
/// earlier-or-equal-specificity route with a prefix-or-equal required signature
/// always matches first (`NURU_R003`).
fn find_shadowed(routes: &[RouteDefinition], sink: &DiagnosticSink) -> ahash::HashSet<usize> {
    let mut shadowed = ahash::HashSet::default();
    for i in 0..routes.len() {
        for j in 0..routes.len() {
            if i == j || shadowed.contains(&j) {
                continue;
            }
            let a = &routes[i];
            let b = &routes[j];
            if a.pattern == b.pattern {
                continue;
            }
            if a.specificity < b.specificity {
                continue;
            }
            if !is_prefix_or_equal(&a.required_signature(), &b.required_signature()) {
                continue;
            }
            if !shadows(a, b) {
                continue;
            }
            shadowed.insert(j);
            sink.push(
                RawDiagnostic::error(format!(
                    "route `{}` is unreachable: every input it accepts is already matched by `{}`",
                    b.pattern, a.pattern
                ))
                .code(codes::NURU_R003_UNREACHABLE_ROUTE)
                .at(a.location.clone()),
            );
        }
    }
    shadowed
}

fn is_prefix_or_equal(a: &[String], b: &[String]) -> bool {
    a.len() <= b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
}

/// `a` shadows `b` when every token `b` requires, `a` also requires (so nothing `b`
/// matches could ever fail to match `a` first) and `a` doesn't demand something `b`
/// can't supply, i.e. `a`'s required signature is a prefix of (or equal to) `b`'s.
fn shadows(a: &RouteDefinition, b: &RouteDefinition) -> bool {
    let a_sig = a.required_signature();
    let b_sig = b.required_signature();
    is_prefix_or_equal(&a_sig, &b_sig) && a.min_positional_count() <= b.min_positional_count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nuru_ir::{Location, MessageType, SegmentDefinition};

    fn route(pattern: &str, segments: Vec<SegmentDefinition>, specificity: i32) -> RouteDefinition {
        RouteDefinition {
            pattern: pattern.to_string(),
            segments,
            handler: None,
            message_type: MessageType::Unspecified,
            description: None,
            specificity,
            order: 0,
            group_prefix_chain: Default::default(),
            aliases: Vec::new(),
            is_help_route: false,
            is_from_attrs: false,
            location: Location::new(1, 1, 0, "test.rs"),
        }
    }

    fn literal(value: &str, position: usize) -> SegmentDefinition {
        SegmentDefinition::Literal(nuru_ir::LiteralSegment {
            position,
            value: value.to_string(),
        })
    }

    #[test]
    fn flags_identical_patterns_as_duplicates() {
        let sink = DiagnosticSink::new();
        let routes = vec![
            route("users list", vec![literal("users", 0), literal("list", 1)], 2000),
            route("users list", vec![literal("users", 0), literal("list", 1)], 2000),
        ];
        let kept = validate(routes, &sink);
        assert_eq!(kept.len(), 2);
        assert!(sink.has_errored());
    }
}
