//! Segment-level IR: the tagged sum that a parsed route pattern lowers to.
//!
//! The four variants below are deliberately siblings under one enum rather than a
//! class hierarchy with downcasting — the emitter `match`es over [`SegmentDefinition`]
//! directly, so every new segment kind needs a match arm everywhere it matters and the
//! compiler enforces that for us.

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SegmentDefinition {
    Literal(LiteralSegment),
    Parameter(ParameterSegment),
    Option(OptionSegment),
    EndOfOptions(EndOfOptionsSeparator),
}

impl SegmentDefinition {
    pub fn position(&self) -> usize {
        match self {
            SegmentDefinition::Literal(s) => s.position,
            SegmentDefinition::Parameter(s) => s.position,
            SegmentDefinition::Option(s) => s.position,
            SegmentDefinition::EndOfOptions(s) => s.position,
        }
    }

    pub fn specificity_contribution(&self) -> i32 {
        match self {
            SegmentDefinition::Literal(_) => 1000,
            SegmentDefinition::Parameter(p) => p.specificity_contribution(),
            SegmentDefinition::Option(o) => o.specificity_contribution(),
            SegmentDefinition::EndOfOptions(_) => 0,
        }
    }

    pub fn as_parameter(&self) -> Option<&ParameterSegment> {
        match self {
            SegmentDefinition::Parameter(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_option(&self) -> Option<&OptionSegment> {
        match self {
            SegmentDefinition::Option(o) => Some(o),
            _ => None,
        }
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self, SegmentDefinition::Parameter(p) if p.is_catch_all)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LiteralSegment {
    pub position: usize,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParameterSegment {
    pub position: usize,
    pub name: String,
    /// Canonical, case-normalized type key (see [`crate::canonical_type_name`]), or
    /// `None` for an untyped (string) parameter.
    pub type_constraint: Option<String>,
    /// The concrete Rust type the emitter should bind this parameter to, resolved once
    /// the handler signature (or the attributed field) has been matched up with the
    /// route segment. `None` until that resolution has happened.
    pub rust_type_name: Option<String>,
    pub is_optional: bool,
    pub is_catch_all: bool,
    pub is_enum_type: bool,
    pub description: Option<String>,
}

impl ParameterSegment {
    pub fn specificity_contribution(&self) -> i32 {
        if self.is_catch_all {
            return 100;
        }
        match (self.type_constraint.is_some(), self.is_optional) {
            (true, true) => 550,
            (true, false) => 600,
            (false, _) => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OptionSegment {
    pub position: usize,
    pub long_form: Option<String>,
    pub short_form: Option<char>,
    pub parameter_name: Option<String>,
    pub type_constraint: Option<String>,
    pub rust_type_name: Option<String>,
    pub expects_value: bool,
    pub is_optional: bool,
    pub is_repeated: bool,
    pub parameter_is_optional: bool,
    pub description: Option<String>,
}

impl OptionSegment {
    pub fn specificity_contribution(&self) -> i32 {
        let base = match (self.expects_value, self.is_optional) {
            (false, false) => 300,
            (true, false) => 200,
            (true, true) => 150,
            (false, true) => 50,
        };
        let typed_boost = if self.expects_value && self.type_constraint.is_some() {
            10
        } else {
            0
        };
        base + typed_boost
    }

    /// The long-form spelling, with its leading `--` stripped, used as the canonical
    /// key when checking long/short uniqueness and when matching argv tokens.
    pub fn long_name(&self) -> Option<&str> {
        self.long_form.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EndOfOptionsSeparator {
    pub position: usize,
}
