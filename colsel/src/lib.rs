//! colsel: column selectors for hierarchical schemas
//!
//! This crate is the primary entrypoint of the colsel toolkit. It re-exports
//! the schema model, the selector DSL and the resolver from the underlying
//! `colsel-*` crates, providing a unified API surface for users.
//!
//! # Quick Start
//!
//! Describe a schema, build a selector and resolve it:
//!
//! ```rust
//! use colsel::prelude::*;
//!
//! let schema = Schema::try_new(vec![
//!     ColumnNode::value("a", DataType::Int64),
//!     ColumnNode::group(
//!         "g",
//!         vec![
//!             ColumnNode::value("x", DataType::Int64),
//!             ColumnNode::value("y", DataType::Utf8),
//!         ],
//!     )?,
//! ])?;
//!
//! // Exclusion keeps the group, minus the excluded child.
//! let columns = resolve_in(&all().except(["g", "x"]), &schema)?;
//! assert_eq!(display_resolved(&columns), "a, g{y}");
//!
//! // Inside a group, references may be relative to the group or to its parent.
//! let columns = resolve_in(&group("g").all_cols_except("x"), &schema)?;
//! assert_eq!(display_resolved(&columns), "g.y");
//! # Ok::<(), colsel::Error>(())
//! ```
//!
//! # Architecture
//!
//! colsel is organized as a layered workspace:
//!
//! - **Types** (`colsel-types`): Column paths and column kinds.
//! - **Errors** (`colsel-result`): The workspace-wide `Error` and `Result`.
//! - **Schema** (`colsel-schema`): The immutable column tree and Arrow interop.
//! - **Selectors** (`colsel-expr`): The selector AST, predicates and builder DSL.
//! - **Resolution** (`colsel-resolve`): Scopes, evaluation and structural exclusion.

pub use colsel_expr::{
    BoundOp, ColumnPredicate, IntoSelector, Selector, SliceOp, TypeClass, TypeTarget, dsl,
};
pub use colsel_resolve::{
    ColumnsRenderer, PathListRenderer, Resolution, ResolutionContext, Scope, UnresolvedPolicy,
    resolve, resolve_detailed, resolve_in,
};
pub use colsel_result::{Cardinality, Error, Result};
pub use colsel_schema::{
    ColumnNode, Columns, DataType, FrameColumn, GroupColumn, ListLayout, ResolvedColumn, Schema,
    SchemaRef, ValueColumn, display_resolved, paths_of,
};
pub use colsel_types::{ColumnKind, ColumnKindSet, ColumnPath};

/// Everything needed to build and resolve selectors.
pub mod prelude {
    pub use crate::dsl::*;
    pub use crate::{
        ColumnKind, ColumnKindSet, ColumnNode, ColumnPath, ColumnPredicate, DataType,
        IntoSelector, ResolutionContext, ResolvedColumn, Schema, Selector, TypeTarget,
        UnresolvedPolicy, display_resolved, resolve, resolve_in,
    };
}
