//! Projection and reconciliation engine for remote services that expose
//! implementation-specific settings as a dynamic `{name, value}` field list.
//!
//! The remote REST API represents every configurable implementation (an
//! indexer, a notification channel, a metadata publisher) with the same
//! resource shape: a handful of first-class common attributes (identity,
//! name, tags, enable flags) plus an *ordered* list of dynamically typed
//! fields whose schema differs per implementation. This crate owns the one
//! conversion problem all of those implementations share:
//!
//! - [`schema`] describes each implementation's ordered field schema and the
//!   read-only [`Registry`](schema::Registry) over all of them.
//! - [`codec`] converts a single dynamic wire value to and from its declared
//!   [`FieldKind`](schema::FieldKind).
//! - [`projection`] converts whole [`Record`](record::Record)s to and from
//!   the wire payload.
//! - [`set`] handles collections that are transported as ordered sequences
//!   but compared as sets (tags, categories, recipients).
//! - [`reconcile`] merges a declared plan against the last known remote
//!   state so that values the user never specified are not clobbered.
//! - [`tag`] resolves user-facing tag labels into the integer references
//!   records carry.
//!
//! The engine performs no I/O and keeps no state between calls; every
//! operation is a pure transformation over plain values. Callers drive the
//! network cycle and hand payloads in and out.

pub mod codec;
pub mod projection;
pub mod reconcile;
pub mod record;
pub mod schema;
pub mod set;
pub mod tag;
pub mod value;
pub mod wire;
