//! Lightweight display helpers for schema trees.
//!
//! Groups render with their children in braces (`g{x, y}`) and frame columns
//! with their nested schema in brackets (`orders[amount]`). This is meant for
//! log lines and test assertions, not for end-user tables.

use std::fmt;

use crate::column::{ColumnNode, Columns};
use crate::resolved::ResolvedColumn;
use crate::schema::Schema;

fn write_columns(f: &mut fmt::Formatter<'_>, columns: &Columns) -> fmt::Result {
    for (i, node) in columns.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{node}")?;
    }
    Ok(())
}

fn write_shape(f: &mut fmt::Formatter<'_>, node: &ColumnNode) -> fmt::Result {
    match node {
        ColumnNode::Value(_) => Ok(()),
        ColumnNode::Group(group) => {
            f.write_str("{")?;
            write_columns(f, group.children())?;
            f.write_str("}")
        }
        ColumnNode::Frame(frame) => {
            f.write_str("[")?;
            write_columns(f, frame.schema().columns())?;
            f.write_str("]")
        }
    }
}

impl fmt::Display for ColumnNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        write_shape(f, self)
    }
}

impl fmt::Display for Columns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_columns(f, self)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_columns(f, self.columns())
    }
}

impl fmt::Display for ResolvedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        write_shape(f, &self.node)
    }
}

/// Render a list of resolved columns as `a, g{y}`.
pub fn display_resolved(columns: &[ResolvedColumn]) -> String {
    columns
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
