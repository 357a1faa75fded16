//! Message marker traits (§4.4 point 5, §6.4).
//!
//! An attributed request struct implements one of [`Query`]/[`Command`] (never both)
//! to declare its [`nuru_ir::MessageType`] for `nuruc`'s attribute extractor, which
//! scans the source text of `impl ... for RequestStruct` blocks for these trait names
//! rather than doing full type-checking — the same "read the syntax, don't type-check
//! it" posture the rest of the compiler takes.
//!
//! A fluent route (`.map(pattern).as_query()/.as_command()/.as_idempotent_command()`)
//! never needs these traits: the message type there comes from the builder call
//! itself, not from an `impl` block.

/// A read-only operation. Declaring a request struct as a query opts it out of the
/// confirmation-prompt behavior `Command`-ish handlers get and marks it cacheable in
/// the capabilities JSON (§6.4: wire value `"query"`).
pub trait Query<Output> {
    fn handle(&self) -> Output;
}

/// A state-changing operation. A plain `Command` is treated as non-idempotent unless
/// the struct additionally implements [`Idempotent`], in which case the capabilities
/// wire value becomes `"idempotent-command"` instead of `"command"`.
pub trait Command<Output> {
    fn handle(&self) -> Output;
}

/// Marker trait: a [`Command`] safe to retry without side effects piling up (deleting
/// an already-deleted resource, setting a value to what it already is).
pub trait Idempotent {}
