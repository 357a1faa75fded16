//! Stage 1 (§4.1) and stage 2 (§4.2) of the pipeline: turn a route pattern string into
//! validated [`nuru_ir::SegmentDefinition`]s.
//!
//! `parse_pattern` is the single entry point the DSL interpreter and the attributed
//! route extractor both call; everything else in this module is plumbing for it.

mod lexer;
mod lower;
mod parser;
mod syntax;
mod validate;

pub use syntax::{ParameterSyntax, SyntaxSegment, SyntaxTree};
pub use validate::ValidationIssue;

use nuru_ir::SegmentDefinition;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    #[error("malformed brace expression at byte {offset}: {detail}")]
    MalformedBrace { offset: usize, detail: String },
    #[error("unknown modifier `{modifier}` at byte {offset}")]
    UnknownModifier { offset: usize, modifier: String },
    #[error("`{raw}` is not a recognized type constraint")]
    InvalidTypeId { offset: usize, raw: String },
}

impl ParseError {
    pub fn code(&self) -> nuru_ir::DiagnosticCode {
        use nuru_ir::codes::*;
        match self {
            ParseError::MalformedBrace { .. } => NURU_P001_MALFORMED_BRACE,
            ParseError::UnknownModifier { .. } => NURU_P002_UNKNOWN_MODIFIER,
            ParseError::InvalidTypeId { .. } => NURU_P003_INVALID_TYPE_ID,
        }
    }
}

/// The fully processed result of compiling a pattern string: the syntax tree (kept
/// around for diagnostics that want to point at a specific segment's span), any
/// semantic-validator warnings that don't block lowering, and the lowered IR segments
/// with their specificity contributions already computed.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub tree: SyntaxTree,
    pub issues: Vec<ValidationIssue>,
    pub segments: Vec<SegmentDefinition>,
    pub specificity: i32,
}

/// Parse, validate and lower a route pattern string in one shot.
///
/// Validation issues of [`miette::Severity::Error`] still return a best-effort
/// [`CompiledPattern`] — `nuruc`'s combiner is responsible for dropping the route
/// rather than this function, per §7's "no parse error aborts the whole app" rule.
pub fn parse_pattern(pattern: &str) -> Result<CompiledPattern, ParseError> {
    let tokens = lexer::tokenize(pattern)?;
    let tree = parser::parse(pattern, &tokens)?;
    let issues = validate::validate(&tree);
    let segments = lower::lower(&tree);
    let specificity = segments.iter().map(|s| s.specificity_contribution()).sum();
    Ok(CompiledPattern {
        tree,
        issues,
        segments,
        specificity,
    })
}

/// Re-render a [`SyntaxTree`] back to its canonical display string (§8.1 property 1:
/// `display(parse(p)) == canonical(p)`).
pub fn canonical_display(tree: &SyntaxTree) -> String {
    syntax::canonical_display(tree)
}
