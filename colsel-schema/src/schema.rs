use std::sync::Arc;

use arrow::datatypes::{
    DataType, Field, Fields, Schema as ArrowSchema, SchemaRef as ArrowSchemaRef,
};
use colsel_result::Result;
use colsel_types::ColumnPath;

use crate::column::{ColumnNode, Columns, FrameColumn, GroupColumn, ListLayout, ValueColumn};

pub type SchemaRef = Arc<Schema>;

/// Hierarchical schema of a data frame: its ordered top-level columns.
///
/// The schema is the root scope of selector resolution. It is read-only; every
/// "modification" builds a new schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    columns: Columns,
}

impl Schema {
    pub fn try_new(columns: Vec<ColumnNode>) -> Result<Self> {
        Ok(Self {
            columns: Columns::try_new(columns)?,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_columns(columns: Columns) -> Self {
        Self { columns }
    }

    #[inline]
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnNode> {
        self.columns.get(name)
    }

    /// Node at `path`, descending through column groups.
    pub fn get(&self, path: &ColumnPath) -> Option<&ColumnNode> {
        self.columns.get_path(path)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnNode> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of nodes in the schema tree (groups and leaves alike).
    pub fn node_count(&self) -> usize {
        self.columns.node_count()
    }

    /// Build a schema from an Arrow schema.
    ///
    /// `Struct` fields become column groups, lists of structs become frame
    /// columns, and every other field becomes a value column that keeps its
    /// type and nullability. Group nullability and the list encoding of
    /// frames are kept so that [`Schema::to_arrow`] writes the same fields.
    pub fn from_arrow(schema: &ArrowSchema) -> Result<Self> {
        let columns = schema
            .fields()
            .iter()
            .map(|field| node_from_field(field))
            .collect::<Result<Vec<_>>>()?;
        Self::try_new(columns)
    }

    pub fn to_arrow(&self) -> ArrowSchemaRef {
        Arc::new(ArrowSchema::new(fields_for(&self.columns)))
    }
}

fn node_from_field(field: &Field) -> Result<ColumnNode> {
    match field.data_type() {
        DataType::Struct(fields) => {
            let children = fields
                .iter()
                .map(|child| node_from_field(child))
                .collect::<Result<Vec<_>>>()?;
            let group = GroupColumn::new(field.name(), Columns::try_new(children)?)
                .with_nullable(field.is_nullable());
            Ok(ColumnNode::Group(group))
        }
        DataType::List(item) | DataType::LargeList(item) => match item.data_type() {
            DataType::Struct(fields) => {
                let nested = fields
                    .iter()
                    .map(|child| node_from_field(child))
                    .collect::<Result<Vec<_>>>()?;
                let layout = ListLayout {
                    large: matches!(field.data_type(), DataType::LargeList(_)),
                    item_name: item.name().clone(),
                    item_nullable: item.is_nullable(),
                };
                let frame = FrameColumn::new(field.name(), Schema::try_new(nested)?)
                    .with_nullable(field.is_nullable())
                    .with_layout(layout);
                Ok(ColumnNode::Frame(frame))
            }
            _ => Ok(value_node(field)),
        },
        _ => Ok(value_node(field)),
    }
}

fn value_node(field: &Field) -> ColumnNode {
    ColumnNode::Value(ValueColumn::new(
        field.name(),
        field.data_type().clone(),
        field.is_nullable(),
    ))
}

fn fields_for(columns: &Columns) -> Vec<Field> {
    columns.iter().map(field_for).collect()
}

fn field_for(node: &ColumnNode) -> Field {
    match node {
        ColumnNode::Value(col) => Field::new(&col.name, col.data_type.clone(), col.nullable),
        ColumnNode::Group(group) => Field::new(
            &group.name,
            DataType::Struct(Fields::from(fields_for(group.children()))),
            group.nullable,
        ),
        ColumnNode::Frame(frame) => {
            let layout = &frame.layout;
            let item = Arc::new(Field::new(
                &layout.item_name,
                DataType::Struct(Fields::from(fields_for(frame.schema().columns()))),
                layout.item_nullable,
            ));
            let data_type = if layout.large {
                DataType::LargeList(item)
            } else {
                DataType::List(item)
            };
            Field::new(&frame.name, data_type, frame.nullable)
        }
    }
}
