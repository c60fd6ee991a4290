use colsel_types::{ColumnKind, ColumnPath};

use crate::column::ColumnNode;

/// A schema node paired with its absolute path from the traversal root.
///
/// This is the unit of output of selector resolution. Identity is the path:
/// two resolved columns with equal paths are the same column for
/// deduplication and exclusion, whatever their nodes look like.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn {
    pub path: ColumnPath,
    pub node: ColumnNode,
}

impl ResolvedColumn {
    pub fn new(path: ColumnPath, node: ColumnNode) -> Self {
        debug_assert!(!path.is_root(), "resolved columns always have a name");
        Self { path, node }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.node.name()
    }

    #[inline]
    pub fn kind(&self) -> ColumnKind {
        self.node.kind()
    }

    #[inline]
    pub fn path(&self) -> &ColumnPath {
        &self.path
    }

    #[inline]
    pub fn node(&self) -> &ColumnNode {
        &self.node
    }

    /// Direct children of a group column, carrying their absolute paths.
    ///
    /// `None` when this column is not a group.
    pub fn group_children(&self) -> Option<impl Iterator<Item = ResolvedColumn> + '_> {
        let group = self.node.as_group()?;
        Some(
            group
                .children()
                .iter()
                .map(|child| ResolvedColumn::new(self.path.child(child.name()), child.clone())),
        )
    }
}

/// Paths of `columns`, in order.
pub fn paths_of(columns: &[ResolvedColumn]) -> Vec<ColumnPath> {
    columns.iter().map(|c| c.path.clone()).collect()
}
