use nuruc_attr_parser::{AttributeProperties, ConfigurationKeyAttr, RouteGroupAttr, errors};

// Convenience function to parse a single attribute string.
fn parse(attrs: &str) -> Result<Option<AttributeProperties>, errors::AttributeParserError> {
    nuruc_attr_parser::parse(std::iter::once(attrs))
}

#[test]
fn test_inline() {
    assert_eq!(parse("#[inline]").unwrap(), None);
}

#[test]
fn test_not_an_attribute() {
    assert_eq!(parse("inline").unwrap(), None);
}

#[test]
fn test_unknown_nuru_attribute_is_ignored() {
    // Paths we don't recognize at all are simply not ours to parse.
    assert_eq!(parse("#[serde(rename = \"foo\")]").unwrap(), None);
}

#[test]
fn test_route_group() {
    let props = parse(r#"#[nuru_route_group("repo")]"#).unwrap().unwrap();
    assert_eq!(
        props,
        AttributeProperties::RouteGroup(RouteGroupAttr {
            prefix: "repo".into(),
            parent: None,
        })
    );
}

#[test]
fn test_configuration_key() {
    let props = parse(r#"#[configuration_key("Logging")]"#).unwrap().unwrap();
    assert_eq!(
        props,
        AttributeProperties::ConfigurationKey(ConfigurationKeyAttr {
            section: "Logging".into(),
        })
    );
}

#[test]
fn test_option_missing_required_long() {
    let err = parse(r#"#[option(short = "f")]"#).unwrap_err();
    insta::assert_snapshot!(err, @"Missing field: `long` for `option` attribute");
}

#[test]
fn test_multiple_route_attributes_on_same_item_errors() {
    let err = nuruc_attr_parser::parse(
        [
            r#"#[nuru_route("users list")]"#,
            r#"#[nuru_route_group("users")]"#,
        ]
        .into_iter(),
    )
    .unwrap_err();
    insta::assert_snapshot!(
        err,
        @"Multiple route-defining attributes (`#[nuru_route]`/`#[nuru_route_group]`) on the same item"
    );
}
