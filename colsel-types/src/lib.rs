//! Identifiers shared across colsel crates.
//!
//! These types live in `colsel-types` so the error, schema, expression and
//! resolution crates can agree on how a column is addressed without depending
//! on each other.

pub mod kind;
pub mod path;

pub use kind::{ColumnKind, ColumnKindSet};
pub use path::ColumnPath;
