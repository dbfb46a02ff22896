//! Shared data model layer (structs/enums only).
//!
//! ## Files
//! - `models.rs` — defines, build environment, report/output structs.
//! - `errors.rs` — typed generator failures.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/process side effects.
//!
//! ## Compatibility note
//! Report structs are the `--json` output schema. Build scripts parse it,
//! so keep field renames explicit.

pub mod errors;
pub mod models;
