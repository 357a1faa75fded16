//! Stage 5 (§4.4): the attributed route extractor.
//!
//! Unlike the DSL interpreter, an attributed endpoint's declaration is scattered: the
//! `#[nuru_route]` struct, the `#[nuru_route_group]` ancestors it points at, and the
//! `impl Query<_>`/`impl Command<_>` block that gives it a message type can each live
//! in a different file. So this stage is split in two: [`scan_file`] walks one file at
//! a time collecting raw sightings, and [`resolve`] is called once over the union of
//! every file's sightings to do the cross-file linking.
//!
//! A third piece, [`resolve_handler`], isn't really part of route extraction — it
//! resolves the *handler* for an already-built route by finding the struct's inherent
//! `fn handle(&self, ...)` method, which needs the same whole-crate view `resolve`
//! does. It lives here anyway since it shares `scan`'s struct/impl bookkeeping.

mod handler;
pub(crate) mod resolve;
mod scan;

pub use handler::{build_index as build_handler_index, resolve_handler, HandlerIndex};
pub use resolve::{resolve, ResolvedEndpoint};
pub use scan::{
    merge_message_type, scan_file, HandlerSite, RawEndpoint, RawField, RawFieldKind, RawGroup, ScanResult,
    TraitSighting,
};
