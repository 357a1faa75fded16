use crate::DiagnosticCode;

/// The full catalogue of diagnostics `nuruc` can raise, grouped the way §7 of the
/// design groups them (parse, semantic, structural, handler, DI, service
/// registration). Centralized here so `nuruc`'s stages and its test suite agree on
/// spelling without importing each other's private modules.
pub mod codes {
    use super::DiagnosticCode;

    pub const NURU_P001_MALFORMED_BRACE: DiagnosticCode = DiagnosticCode("NURU_P001");
    pub const NURU_P002_UNKNOWN_MODIFIER: DiagnosticCode = DiagnosticCode("NURU_P002");
    pub const NURU_P003_INVALID_TYPE_ID: DiagnosticCode = DiagnosticCode("NURU_P003");

    pub const NURU_S001_CONSECUTIVE_OPTIONAL: DiagnosticCode = DiagnosticCode("NURU_S001");
    pub const NURU_S002_REQUIRED_AFTER_CATCH_ALL: DiagnosticCode = DiagnosticCode("NURU_S002");
    pub const NURU_S003_REQUIRED_AFTER_OPTIONAL: DiagnosticCode = DiagnosticCode("NURU_S003");
    pub const NURU_S004_DUPLICATE_OPTION_FORM: DiagnosticCode = DiagnosticCode("NURU_S004");
    pub const NURU_S005_BAD_SHORT_FORM: DiagnosticCode = DiagnosticCode("NURU_S005");
    pub const NURU_S006_DUPLICATE_END_OF_OPTIONS: DiagnosticCode = DiagnosticCode("NURU_S006");
    pub const NURU_S007_CATCH_ALL_NOT_LAST: DiagnosticCode = DiagnosticCode("NURU_S007");

    pub const NURU_R001_OVERLAPPING_ROUTES: DiagnosticCode = DiagnosticCode("NURU_R001");
    pub const NURU_R002_DUPLICATE_ROUTE: DiagnosticCode = DiagnosticCode("NURU_R002");
    pub const NURU_R003_UNREACHABLE_ROUTE: DiagnosticCode = DiagnosticCode("NURU_R003");

    pub const NURU_H001_UNSUPPORTED_HANDLER_SHAPE: DiagnosticCode = DiagnosticCode("NURU_H001");
    pub const NURU_H002_CLOSURE_CAPTURE: DiagnosticCode = DiagnosticCode("NURU_H002");

    pub const NURU_D001_UNRESOLVED_SERVICE: DiagnosticCode = DiagnosticCode("NURU_D001");
    pub const NURU_D051_UNRESOLVABLE_DEPENDENCY: DiagnosticCode = DiagnosticCode("NURU051");

    pub const NURU_050_UNKNOWN_SERVICE_CALL: DiagnosticCode = DiagnosticCode("NURU050");
    pub const NURU_052_UNSUPPORTED_SERVICE_CALL: DiagnosticCode = DiagnosticCode("NURU052");
}
