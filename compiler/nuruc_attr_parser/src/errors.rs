use itertools::Itertools;

use crate::AttributeKind;

#[derive(Debug, thiserror::Error)]
/// Failure modes of [`parse`](crate::parse).
pub enum AttributeParserError {
    #[error(transparent)]
    UnknownNuruAttribute(#[from] UnknownNuruAttribute),
    #[error(transparent)]
    InvalidAttributeParams(#[from] InvalidAttributeParams),
    #[error(
        "Multiple route-defining attributes (`#[nuru_route]`/`#[nuru_route_group]`) on the same item"
    )]
    MultipleRouteAttributes,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown Nuru attribute: `#[{path}(...)]`")]
pub struct UnknownNuruAttribute {
    pub path: String,
}

impl UnknownNuruAttribute {
    pub fn new(path: &syn::Path) -> Self {
        let path = path
            .segments
            .iter()
            .map(|s| format!("{}", s.ident))
            .join("::");
        Self { path }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0} for `{1}` attribute")]
pub struct InvalidAttributeParams(darling::Error, &'static str);

impl InvalidAttributeParams {
    pub fn new(e: darling::Error, kind: AttributeKind) -> Self {
        Self(e, kind.attribute_name())
    }
}
