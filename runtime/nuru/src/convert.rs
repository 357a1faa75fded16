//! Traits a handler parameter's type implements to opt into a typed conversion the
//! emitted dispatcher can call without reflection (§4.7.4, §9 "runtime reflection").
//!
//! Both traits are deliberately tiny: the generated dispatcher already knows, at
//! codegen time, exactly which concrete type a parameter binds to, so it can call
//! `<ConcreteType as NuruTypeConverter>::try_convert` (or `ParseIgnoreCase`) directly
//! instead of going through `TypeId`/`Any` downcasting.

/// Implemented by a user-defined enum so a `{name:MyEnum}` route segment can be parsed
/// case-insensitively, mirroring `Enum.TryParse<T>(s, ignoreCase: true, out v)`.
pub trait ParseIgnoreCase: Sized {
    fn parse_ignore_case(raw: &str) -> Option<Self>;
}

/// Implemented by the type a `.add_type_converter::<T>()` registration names.
///
/// `nuruc` never calls the registration closure itself (it isn't evaluated at compile
/// time) — it emits a direct call to this trait instead, which the registered type is
/// expected to implement. A blanket `impl<T: std::str::FromStr> NuruTypeConverter for T`
/// would shadow more specific hand-written impls, so none is provided; implement it
/// directly for whichever type `.add_type_converter::<T>()` names.
pub trait NuruTypeConverter: Sized {
    fn try_convert(raw: &str) -> Option<Self>;
}
