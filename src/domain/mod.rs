//! Shared data model layer (structs only).
//!
//! ## Purpose
//! - Keep report/entry structs in one place.
//! - Make `--json` output schema changes explicit and reviewable.
//!
//! ## Rule of thumb
//! Domain types are data-only: no filesystem or process side effects.
//!
//! ## Compatibility note
//! Changes here affect `--json` outputs. Keep them in sync with `docs/contracts/*`.

pub mod models;
