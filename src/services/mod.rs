//! Service layer containing generation logic and side-effect helpers.
//!
//! ## Service map
//! - `flags.rs` — build flag tokenizing, define extraction, feature checks.
//! - `layout.rs` — fixed Berry library layout and the generator command line.
//! - `generator.rs` — generate dir cleanup, process runner, driver flow.
//! - `output.rs` — JSON/text output helper.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Never change the process working directory; pass it to the child.

pub mod flags;
pub mod generator;
pub mod layout;
pub mod output;
