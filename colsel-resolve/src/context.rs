//! Resolution context: scope, outer scope, policy and renderer.

use std::fmt;
use std::sync::Arc;

use colsel_result::{Error, Result};
use colsel_schema::{ColumnNode, Columns, ResolvedColumn, Schema};
use colsel_types::ColumnPath;

/// What to do with a column reference that names nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnresolvedPolicy {
    /// Abort resolution with [`Error::UnresolvedColumn`].
    #[default]
    Fail,
    /// Treat the reference as selecting nothing and record it as a miss.
    Skip,
}

/// Renders the columns available in a scope for unresolved-column errors.
pub trait ColumnsRenderer: Send + Sync {
    fn render(&self, scope: &ColumnPath, columns: &Columns) -> String;
}

/// Lists the absolute paths of a scope's direct children: `g.x, g.y`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathListRenderer;

impl ColumnsRenderer for PathListRenderer {
    fn render(&self, scope: &ColumnPath, columns: &Columns) -> String {
        if columns.is_empty() {
            return "<none>".to_string();
        }
        columns
            .iter()
            .map(|node| scope.child(node.name()).to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A column group (or the schema root) that relative references resolve
/// against.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    path: ColumnPath,
    node: Option<ColumnNode>,
    columns: Columns,
}

impl Scope {
    pub fn root(columns: Columns) -> Self {
        Self {
            path: ColumnPath::root(),
            node: None,
            columns,
        }
    }

    /// Scope rooted at a resolved group column.
    ///
    /// # Errors
    ///
    /// [`Error::NotAColumnGroup`] if `column` is a value or frame column.
    pub fn of_group(column: ResolvedColumn) -> Result<Self> {
        let columns = match column.node.as_group() {
            Some(group) => group.children().clone(),
            None => return Err(Error::NotAColumnGroup(column.path)),
        };
        Ok(Self {
            path: column.path,
            node: Some(column.node),
            columns,
        })
    }

    #[inline]
    pub fn path(&self) -> &ColumnPath {
        &self.path
    }

    #[inline]
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.node.is_none()
    }

    /// The scope's own group column. `None` for the root.
    pub fn as_column(&self) -> Option<ResolvedColumn> {
        self.node
            .as_ref()
            .map(|node| ResolvedColumn::new(self.path.clone(), node.clone()))
    }

    /// Direct children, carrying absolute paths.
    pub fn children(&self) -> impl Iterator<Item = ResolvedColumn> + '_ {
        self.columns
            .iter()
            .map(|node| ResolvedColumn::new(self.path.child(node.name()), node.clone()))
    }

    /// Look up `relative` below this scope.
    pub fn get(&self, relative: &ColumnPath) -> Option<ResolvedColumn> {
        self.columns
            .get_path(relative)
            .map(|node| ResolvedColumn::new(self.path.join(relative), node.clone()))
    }
}

/// Everything a selector needs to resolve: the current scope, the scope that
/// contains it, the policy for unknown references and an optional renderer
/// for error messages.
///
/// Contexts are cheap to clone; schema data is shared.
#[derive(Clone)]
pub struct ResolutionContext {
    policy: UnresolvedPolicy,
    scope: Scope,
    outer: Option<Scope>,
    renderer: Option<Arc<dyn ColumnsRenderer>>,
}

impl ResolutionContext {
    /// Root scope of `schema`, [`UnresolvedPolicy::Fail`], no renderer.
    pub fn new(schema: &Schema) -> Self {
        Self {
            policy: UnresolvedPolicy::default(),
            scope: Scope::root(schema.columns().clone()),
            outer: None,
            renderer: None,
        }
    }

    pub fn with_policy(mut self, policy: UnresolvedPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_renderer(mut self, renderer: impl ColumnsRenderer + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Descend into the group at `path` (relative to the current scope). The
    /// current scope becomes the outer scope.
    pub fn in_group(&self, path: impl Into<ColumnPath>) -> Result<Self> {
        let path = path.into();
        if path.is_root() {
            return Err(Error::invalid_argument("empty column path"));
        }
        let column = self
            .scope
            .get(&path)
            .ok_or_else(|| Error::unresolved(vec![path.clone()], self.render(&self.scope)))?;
        Ok(self.enter(Scope::of_group(column)?))
    }

    #[inline]
    pub fn policy(&self) -> UnresolvedPolicy {
        self.policy
    }

    #[inline]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    #[inline]
    pub fn outer(&self) -> Option<&Scope> {
        self.outer.as_ref()
    }

    /// Context for evaluating inside `scope`, with the current scope as outer.
    pub(crate) fn enter(&self, scope: Scope) -> Self {
        Self {
            policy: self.policy,
            outer: Some(self.scope.clone()),
            scope,
            renderer: self.renderer.clone(),
        }
    }

    /// Lenient context used to probe exclusion references in `scope`.
    pub(crate) fn probe(&self, scope: Scope) -> Self {
        Self {
            policy: UnresolvedPolicy::Skip,
            scope,
            outer: None,
            renderer: self.renderer.clone(),
        }
    }

    pub(crate) fn render(&self, scope: &Scope) -> Option<String> {
        self.renderer
            .as_ref()
            .map(|renderer| renderer.render(scope.path(), scope.columns()))
    }
}

impl fmt::Debug for ResolutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionContext")
            .field("policy", &self.policy)
            .field("scope", &self.scope.path)
            .field("outer", &self.outer.as_ref().map(|s| &s.path))
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::DataType;

    fn schema() -> Schema {
        Schema::try_new(vec![
            ColumnNode::value("a", DataType::Int64),
            ColumnNode::group(
                "g",
                vec![
                    ColumnNode::value("x", DataType::Int64),
                    ColumnNode::group("h", vec![ColumnNode::value("z", DataType::Utf8)]).unwrap(),
                ],
            )
            .unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn in_group_nests_scopes() {
        let schema = schema();
        let root = ResolutionContext::new(&schema);
        let g = root.in_group("g").unwrap();
        assert_eq!(g.scope().path(), &ColumnPath::from("g"));
        assert!(g.outer().unwrap().is_root());

        let h = g.in_group("h").unwrap();
        assert_eq!(h.scope().path(), &ColumnPath::from(["g", "h"]));
        assert_eq!(h.outer().unwrap().path(), &ColumnPath::from("g"));
        let children: Vec<String> = h.scope().children().map(|c| c.path.to_string()).collect();
        assert_eq!(children, vec!["g.h.z"]);

        let direct = root.in_group(["g", "h"]).unwrap();
        assert_eq!(direct.scope(), h.scope());
    }

    #[test]
    fn in_group_rejects_values_and_unknown_names() {
        let schema = schema();
        let root = ResolutionContext::new(&schema).with_renderer(PathListRenderer);
        assert_eq!(
            root.in_group("a").unwrap_err(),
            Error::NotAColumnGroup(ColumnPath::from("a"))
        );
        match root.in_group("nope").unwrap_err() {
            Error::UnresolvedColumn { paths, available } => {
                assert_eq!(paths, vec![ColumnPath::from("nope")]);
                assert_eq!(available.as_deref(), Some("a, g"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn path_list_renderer_uses_absolute_paths() {
        let schema = schema();
        let g = ResolutionContext::new(&schema).in_group("g").unwrap();
        let rendered = PathListRenderer.render(g.scope().path(), g.scope().columns());
        assert_eq!(rendered, "g.x, g.h");
    }
}
