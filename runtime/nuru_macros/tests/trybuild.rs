#[test]
fn route_attributes() {
    let t = trybuild::TestCases::new();
    t.pass("tests/route/success/*.rs");
    t.compile_fail("tests/route/fail/*.rs");
}
