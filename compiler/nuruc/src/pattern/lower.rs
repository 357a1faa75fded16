//! Stage 3 (§4.3 heading in the component table, §3.1 data model): lowering a
//! [`SyntaxTree`] to the IR's [`SegmentDefinition`] sum type.

use nuru_ir::{EndOfOptionsSeparator, LiteralSegment, OptionSegment, ParameterSegment, SegmentDefinition};

use super::syntax::{ParameterSyntax, SyntaxSegment, SyntaxTree};

pub fn lower(tree: &SyntaxTree) -> Vec<SegmentDefinition> {
    tree.segments
        .iter()
        .enumerate()
        .map(|(position, seg)| lower_segment(seg, position))
        .collect()
}

fn lower_segment(seg: &SyntaxSegment, position: usize) -> SegmentDefinition {
    match seg {
        SyntaxSegment::Literal { value, .. } => {
            SegmentDefinition::Literal(LiteralSegment {
                position,
                value: value.clone(),
            })
        }
        SyntaxSegment::Parameter(p) => SegmentDefinition::Parameter(lower_parameter(p, position)),
        SyntaxSegment::EndOfOptions { .. } => {
            SegmentDefinition::EndOfOptions(EndOfOptionsSeparator { position })
        }
        SyntaxSegment::Option(o) => {
            let (type_constraint, is_enum_type, parameter_is_optional) = match &o.value {
                Some(v) => (
                    v.type_id
                        .as_deref()
                        .map(|t| nuru_ir::canonical_type_name(t).unwrap_or(t).to_string()),
                    v.type_id
                        .as_deref()
                        .is_some_and(|t| nuru_ir::canonical_type_name(t).is_none()),
                    v.is_optional,
                ),
                None => (None, false, false),
            };
            SegmentDefinition::Option(OptionSegment {
                position,
                long_form: Some(o.long.clone()),
                short_form: o.short,
                parameter_name: o.value.as_ref().map(|v| v.name.clone()),
                type_constraint,
                rust_type_name: None,
                expects_value: o.value.is_some(),
                is_optional: o.is_optional || o.value.is_none(),
                is_repeated: false,
                parameter_is_optional,
                description: o.description.clone(),
            })
        }
    }
}

fn lower_parameter(p: &ParameterSyntax, position: usize) -> ParameterSegment {
    let type_constraint = p
        .type_id
        .as_deref()
        .map(|t| nuru_ir::canonical_type_name(t).unwrap_or(t).to_string());
    let is_enum_type = p.type_id.as_deref().is_some_and(|t| nuru_ir::canonical_type_name(t).is_none());
    ParameterSegment {
        position,
        name: p.name.clone(),
        type_constraint,
        rust_type_name: None,
        is_optional: p.is_optional,
        is_catch_all: p.is_catch_all,
        is_enum_type,
        description: p.description.clone(),
    }
}
