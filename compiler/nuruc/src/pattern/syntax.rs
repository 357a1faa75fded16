//! The syntax tree `nuruc`'s pattern parser produces, one level above the lowered IR.
//!
//! Segments keep their original spans and un-canonicalized spelling so the semantic
//! validator and the diagnostic reporter can point at exactly the substring the user
//! wrote, even after [`crate::pattern::lower`] has normalized everything.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    pub segments: Vec<SyntaxSegment>,
    /// Byte offset of every bare `--` word found while lexing, in order. Exactly one
    /// (in final position) is legal; the semantic validator (§4.2 rule 6) is
    /// responsible for turning anything else into a diagnostic.
    pub end_of_options: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxSegment {
    Literal {
        offset: usize,
        value: String,
    },
    Parameter(ParameterSyntax),
    Option(OptionSyntax),
    EndOfOptions {
        offset: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSyntax {
    pub offset: usize,
    pub is_catch_all: bool,
    pub name: String,
    pub type_id: Option<String>,
    pub is_optional: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSyntax {
    pub offset: usize,
    pub long: String,
    pub short: Option<char>,
    /// Present only when the option carries an inline `?` right after its forms,
    /// meaning the flag itself is optional on the command line (every option already
    /// defaults to optional unless [`OptionSyntax::value`] marks it otherwise via
    /// `is_required`).
    pub is_optional: bool,
    pub value: Option<ParameterSyntax>,
    pub description: Option<String>,
}

/// Re-render a parsed pattern back into its canonical textual form.
///
/// Canonicalization normalizes whitespace to single spaces and type constraints to
/// their short-form spelling (via [`nuru_ir::canonical_type_name`]); it otherwise
/// preserves the user's ordering of segments and option forms.
pub fn canonical_display(tree: &SyntaxTree) -> String {
    let mut parts = Vec::new();
    for seg in &tree.segments {
        parts.push(display_segment(seg));
    }
    parts.join(" ")
}

fn display_segment(seg: &SyntaxSegment) -> String {
    match seg {
        SyntaxSegment::Literal { value, .. } => value.clone(),
        SyntaxSegment::Parameter(p) => display_parameter(p),
        SyntaxSegment::Option(o) => {
            let mut s = format!("--{}", o.long);
            if let Some(short) = o.short {
                s.push_str(&format!(",-{short}"));
            }
            if o.is_optional {
                s.push('?');
            }
            if let Some(desc) = &o.description {
                s.push_str(&format!("|{desc}"));
            }
            if let Some(value) = &o.value {
                s.push(' ');
                s.push_str(&display_parameter(value));
            }
            s
        }
        SyntaxSegment::EndOfOptions { .. } => "--".to_string(),
    }
}

fn display_parameter(p: &ParameterSyntax) -> String {
    let mut inner = String::new();
    if p.is_catch_all {
        inner.push('*');
    }
    inner.push_str(&p.name);
    if let Some(type_id) = &p.type_id {
        inner.push(':');
        inner.push_str(nuru_ir::canonical_type_name(type_id).unwrap_or(type_id.as_str()));
    }
    if p.is_optional {
        inner.push('?');
    }
    if let Some(desc) = &p.description {
        inner.push('|');
        inner.push_str(desc);
    }
    format!("{{{inner}}}")
}
