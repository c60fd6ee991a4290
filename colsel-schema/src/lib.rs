//! Hierarchical column schema model.
//!
//! A schema is a tree of [`ColumnNode`]s:
//!
//! - **Value columns** are leaves holding values of a declared Arrow type.
//! - **Column groups** hold ordered, name-unique children.
//! - **Frame columns** are leaves whose cells are data frames of a nested
//!   schema; that nested schema is not part of the enclosing tree.
//!
//! The tree is acyclic by construction and immutable. Selector resolution only
//! reads it, producing [`ResolvedColumn`]s, and allocates fresh group nodes when
//! it has to rebuild structure.

pub mod column;
pub mod format;
pub mod resolved;
pub mod schema;

pub use column::{ColumnNode, Columns, FrameColumn, GroupColumn, ListLayout, ValueColumn};
pub use format::display_resolved;
pub use resolved::{ResolvedColumn, paths_of};
pub use schema::{Schema, SchemaRef};

// Declared column types are Arrow types.
pub use arrow::datatypes::DataType;
