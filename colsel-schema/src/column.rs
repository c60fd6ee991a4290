use std::fmt;
use std::sync::Arc;

use arrow::datatypes::DataType;
use colsel_result::{Error, Result};
use colsel_types::{ColumnKind, ColumnPath};
use rustc_hash::FxHashMap;

use crate::schema::{Schema, SchemaRef};

/// A node of the column schema tree.
///
/// Nodes are immutable once built. Cloning is cheap: group children and frame
/// schemas are shared behind `Arc`s, so resolution can hand out owned nodes
/// without copying subtrees.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnNode {
    Value(ValueColumn),
    Group(GroupColumn),
    Frame(FrameColumn),
}

/// Leaf column holding plain values of a declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueColumn {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

/// Column group: a named node with ordered, name-unique children.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupColumn {
    pub name: String,
    /// Nullability of the group as a whole (an Arrow `Struct` field).
    pub nullable: bool,
    children: Columns,
}

/// Column whose cells are data frames sharing one nested schema.
///
/// For tree traversal this is a leaf; the nested schema is not part of the
/// enclosing tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameColumn {
    pub name: String,
    pub schema: SchemaRef,
    pub nullable: bool,
    pub layout: ListLayout,
}

/// Arrow list encoding of a frame column.
///
/// Kept so that a schema read from Arrow writes back the same field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLayout {
    /// `LargeList` (64-bit offsets) instead of `List`.
    pub large: bool,
    pub item_name: String,
    pub item_nullable: bool,
}

impl Default for ListLayout {
    fn default() -> Self {
        Self {
            large: false,
            item_name: "item".to_string(),
            item_nullable: true,
        }
    }
}

impl ColumnNode {
    /// Non-nullable value column.
    pub fn value(name: impl Into<String>, data_type: DataType) -> Self {
        ColumnNode::Value(ValueColumn {
            name: name.into(),
            data_type,
            nullable: false,
        })
    }

    pub fn nullable_value(name: impl Into<String>, data_type: DataType) -> Self {
        ColumnNode::Value(ValueColumn {
            name: name.into(),
            data_type,
            nullable: true,
        })
    }

    /// Column group over `children`. Fails if two children share a name.
    pub fn group(name: impl Into<String>, children: Vec<ColumnNode>) -> Result<Self> {
        Ok(ColumnNode::Group(GroupColumn::new(
            name,
            Columns::try_new(children)?,
        )))
    }

    pub fn frame(name: impl Into<String>, schema: impl Into<SchemaRef>) -> Self {
        ColumnNode::Frame(FrameColumn::new(name, schema))
    }

    pub fn name(&self) -> &str {
        match self {
            ColumnNode::Value(col) => &col.name,
            ColumnNode::Group(col) => &col.name,
            ColumnNode::Frame(col) => &col.name,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnNode::Value(_) => ColumnKind::Value,
            ColumnNode::Group(_) => ColumnKind::Group,
            ColumnNode::Frame(_) => ColumnKind::Frame,
        }
    }

    #[inline]
    pub fn is_group(&self) -> bool {
        matches!(self, ColumnNode::Group(_))
    }

    pub fn as_value(&self) -> Option<&ValueColumn> {
        match self {
            ColumnNode::Value(col) => Some(col),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupColumn> {
        match self {
            ColumnNode::Group(col) => Some(col),
            _ => None,
        }
    }

    pub fn as_frame(&self) -> Option<&FrameColumn> {
        match self {
            ColumnNode::Frame(col) => Some(col),
            _ => None,
        }
    }

    /// Whether the column itself may be null.
    pub fn is_nullable(&self) -> bool {
        match self {
            ColumnNode::Value(col) => col.nullable,
            ColumnNode::Group(col) => col.nullable,
            ColumnNode::Frame(col) => col.nullable,
        }
    }

    /// Declared type of a value column. `None` for groups and frames.
    pub fn data_type(&self) -> Option<&DataType> {
        self.as_value().map(|col| &col.data_type)
    }

    /// Number of nodes in the subtree rooted here, this node included.
    ///
    /// Frame columns count as a single node.
    pub fn node_count(&self) -> usize {
        match self {
            ColumnNode::Group(group) => 1 + group.children.node_count(),
            _ => 1,
        }
    }
}

impl GroupColumn {
    /// Non-nullable group over `children`.
    pub fn new(name: impl Into<String>, children: Columns) -> Self {
        Self {
            name: name.into(),
            nullable: false,
            children,
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Same group (name and nullability) over a different set of children.
    pub fn with_children(&self, children: Columns) -> Self {
        Self {
            name: self.name.clone(),
            nullable: self.nullable,
            children,
        }
    }

    #[inline]
    pub fn children(&self) -> &Columns {
        &self.children
    }
}

impl ValueColumn {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}

impl FrameColumn {
    /// Non-nullable frame stored as a `List` of nullable `item` structs.
    pub fn new(name: impl Into<String>, schema: impl Into<SchemaRef>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            nullable: false,
            layout: ListLayout::default(),
        }
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_layout(mut self, layout: ListLayout) -> Self {
        self.layout = layout;
        self
    }

    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// Ordered list of sibling columns with unique names.
///
/// Used for the top level of a [`Schema`] and for the children of every
/// [`GroupColumn`]. Both the nodes and the name index are shared, so clones
/// are `O(1)`.
#[derive(Clone, Default)]
pub struct Columns {
    nodes: Arc<[ColumnNode]>,
    name_to_index: Arc<FxHashMap<String, usize>>,
}

impl Columns {
    /// Build a sibling list, rejecting duplicate names.
    pub fn try_new(nodes: Vec<ColumnNode>) -> Result<Self> {
        let mut name_to_index =
            FxHashMap::with_capacity_and_hasher(nodes.len(), Default::default());
        for (i, node) in nodes.iter().enumerate() {
            if name_to_index.insert(node.name().to_string(), i).is_some() {
                return Err(Error::DuplicateColumn {
                    name: node.name().to_string(),
                });
            }
        }
        Ok(Self {
            nodes: nodes.into(),
            name_to_index: Arc::new(name_to_index),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[ColumnNode] {
        &self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnNode> {
        self.nodes.iter()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&ColumnNode> {
        self.index_of(name).map(|i| &self.nodes[i])
    }

    /// Walk `path` downwards from these columns, descending through groups.
    ///
    /// Returns `None` for the root path, for a missing name, or when an
    /// intermediate segment names a value or frame column.
    pub fn get_path(&self, path: &ColumnPath) -> Option<&ColumnNode> {
        let (first, rest) = path.names().split_first()?;
        let mut node = self.get(first)?;
        for name in rest {
            node = node.as_group()?.children().get(name)?;
        }
        Some(node)
    }

    /// Total number of nodes below (and including) every column in this list.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(ColumnNode::node_count).sum()
    }
}

impl PartialEq for Columns {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}

impl fmt::Debug for Columns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.nodes.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Columns {
    type Item = &'a ColumnNode;
    type IntoIter = std::slice::Iter<'a, ColumnNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
