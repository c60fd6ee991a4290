//! Selector evaluation.
//!
//! [`evaluate`] is a single exhaustive match over [`Selector`]: adding a
//! variant without teaching the evaluator about it does not compile. Every
//! arm returns an ordered, duplicate-free list of columns with absolute paths.
//!
//! Column references that cannot be found are handled according to the
//! context's [`UnresolvedPolicy`]. Under `Skip` the reference is recorded in
//! the `misses` sink as written, so that callers (the exclusion engine in
//! particular) can tell which references resolved nowhere.

use colsel_expr::Selector;
use colsel_result::{Error, Result};
use colsel_schema::{ResolvedColumn, Schema, display_resolved};
use colsel_types::ColumnPath;
use rustc_hash::FxHashSet;

use crate::context::{ResolutionContext, Scope, UnresolvedPolicy};
use crate::exclusion::{evaluate_except, evaluate_group_except};
use crate::guards::apply_guard;
use crate::traversal::{TraversalOptions, traverse_preorder};

/// Output of [`resolve_detailed`].
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub columns: Vec<ResolvedColumn>,
    /// References skipped under [`UnresolvedPolicy::Skip`], as written.
    pub unresolved: Vec<ColumnPath>,
}

/// Resolve `selector` in `ctx`.
pub fn resolve(selector: &Selector, ctx: &ResolutionContext) -> Result<Vec<ResolvedColumn>> {
    resolve_detailed(selector, ctx).map(|resolution| resolution.columns)
}

/// Resolve `selector` against the root of `schema`, failing on unknown
/// references.
pub fn resolve_in(selector: &Selector, schema: &Schema) -> Result<Vec<ResolvedColumn>> {
    resolve(selector, &ResolutionContext::new(schema))
}

/// Like [`resolve`], also reporting the references skipped along the way.
pub fn resolve_detailed(selector: &Selector, ctx: &ResolutionContext) -> Result<Resolution> {
    let mut misses = Vec::new();
    let columns = evaluate(selector, ctx, &mut misses)?;

    let mut seen = FxHashSet::default();
    misses.retain(|path| seen.insert(path.clone()));
    if !misses.is_empty() {
        tracing::debug!(
            "[RESOLVE] {} skipped {} unresolved reference(s) in scope '{}'",
            selector,
            misses.len(),
            ctx.scope().path()
        );
    }

    Ok(Resolution {
        columns,
        unresolved: misses,
    })
}

pub(crate) fn evaluate(
    selector: &Selector,
    ctx: &ResolutionContext,
    misses: &mut Vec<ColumnPath>,
) -> Result<Vec<ResolvedColumn>> {
    let columns = match selector {
        Selector::All => ctx.scope().children().collect(),
        Selector::Col(path) => resolve_col(path, ctx, misses)?,
        Selector::Filter { source, predicate } => {
            let mut columns = evaluate(source, ctx, misses)?;
            columns.retain(|c| predicate.matches(c));
            columns
        }
        Selector::ByType { source, target } => {
            let mut columns = evaluate(source, ctx, misses)?;
            columns.retain(|c| target.accepts(&c.node));
            columns
        }
        Selector::ByKind { source, kinds } => {
            let mut columns = evaluate(source, ctx, misses)?;
            columns.retain(|c| kinds.contains(c.kind()));
            columns
        }
        Selector::ChildrenOf(source) => {
            let mut children = Vec::new();
            for column in evaluate(source, ctx, misses)? {
                if let Some(group_children) = column.group_children() {
                    children.extend(group_children);
                }
            }
            children
        }
        Selector::AtAnyDepth {
            source,
            include_top_level,
            include_groups,
        } => {
            let options = TraversalOptions {
                include_top_level: *include_top_level,
                include_groups: *include_groups,
            };
            match source {
                Some(source) => traverse_preorder(evaluate(source, ctx, misses)?, options),
                None => traverse_scope(ctx.scope(), options),
            }
        }
        Selector::Union(branches) => {
            let mut columns = Vec::new();
            for branch in branches {
                columns.extend(evaluate(branch, ctx, misses)?);
            }
            dedup_by_path(columns)
        }
        Selector::Except { base, exclude } => evaluate_except(base, exclude, ctx, misses)?,
        Selector::GroupExcept { group, exclude } => {
            evaluate_group_except(group, exclude, ctx, misses)?
        }
        Selector::Within { group, selector } => {
            let mut columns = Vec::new();
            for column in evaluate(group, ctx, misses)? {
                let inner = ctx.enter(Scope::of_group(column)?);
                columns.extend(evaluate(selector, &inner, misses)?);
            }
            dedup_by_path(columns)
        }
        Selector::Slice { source, op, count } => op.apply(evaluate(source, ctx, misses)?, *count),
        Selector::SliceWhile {
            source,
            op,
            predicate,
        } => op.apply_while(evaluate(source, ctx, misses)?, |c| predicate.matches(c)),
        Selector::Bounded {
            source,
            bound,
            anchor,
        } => {
            let columns = evaluate(source, ctx, misses)?;
            let anchors: FxHashSet<ColumnPath> = evaluate(anchor, ctx, misses)?
                .into_iter()
                .map(|c| c.path)
                .collect();
            bound.apply(columns, |c| anchors.contains(&c.path))
        }
        Selector::Indexed { source, indices } => {
            pick_indices(evaluate(source, ctx, misses)?, indices)?
        }
        Selector::Simplify(source) => simplify(evaluate(source, ctx, misses)?),
        Selector::Guard {
            source,
            cardinality,
            predicate,
        } => apply_guard(
            evaluate(source, ctx, misses)?,
            *cardinality,
            predicate.as_ref(),
        )?,
    };

    tracing::trace!(
        "[RESOLVE] {} in scope '{}' -> [{}]",
        selector,
        ctx.scope().path(),
        display_resolved(&columns)
    );
    Ok(columns)
}

fn resolve_col(
    path: &ColumnPath,
    ctx: &ResolutionContext,
    misses: &mut Vec<ColumnPath>,
) -> Result<Vec<ResolvedColumn>> {
    if path.is_root() {
        return Err(Error::invalid_argument("empty column path"));
    }
    if path.iter().any(String::is_empty) {
        return Err(Error::invalid_argument(format!(
            "empty segment in column path '{path}'"
        )));
    }

    if let Some(column) = ctx.scope().get(path) {
        return Ok(vec![column]);
    }
    match ctx.policy() {
        UnresolvedPolicy::Fail => Err(Error::unresolved(
            vec![path.clone()],
            ctx.render(ctx.scope()),
        )),
        UnresolvedPolicy::Skip => {
            tracing::debug!(
                "[RESOLVE] column '{}' not found in scope '{}', skipping",
                path,
                ctx.scope().path()
            );
            misses.push(path.clone());
            Ok(Vec::new())
        }
    }
}

/// Traverse the current scope itself. The root is never emitted.
fn traverse_scope(scope: &Scope, options: TraversalOptions) -> Vec<ResolvedColumn> {
    match scope.as_column() {
        Some(column) => traverse_preorder([column], options),
        None => traverse_preorder(
            scope.children(),
            TraversalOptions {
                include_top_level: true,
                ..options
            },
        ),
    }
}

fn pick_indices(columns: Vec<ResolvedColumn>, indices: &[usize]) -> Result<Vec<ResolvedColumn>> {
    let picked = indices
        .iter()
        .map(|&i| {
            columns.get(i).cloned().ok_or_else(|| {
                Error::invalid_argument(format!(
                    "column index {i} out of bounds for {} column(s)",
                    columns.len()
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(dedup_by_path(picked))
}

/// Keep the first occurrence of each path, preserving order.
pub(crate) fn dedup_by_path(columns: Vec<ResolvedColumn>) -> Vec<ResolvedColumn> {
    let mut seen: FxHashSet<ColumnPath> = FxHashSet::default();
    columns
        .into_iter()
        .filter(|c| seen.insert(c.path.clone()))
        .collect()
}

/// Drop every column whose ancestor is also in the list.
fn simplify(columns: Vec<ResolvedColumn>) -> Vec<ResolvedColumn> {
    let paths: FxHashSet<ColumnPath> = columns.iter().map(|c| c.path.clone()).collect();
    columns
        .into_iter()
        .filter(|c| !has_ancestor_in(&c.path, &paths))
        .collect()
}

fn has_ancestor_in(path: &ColumnPath, paths: &FxHashSet<ColumnPath>) -> bool {
    let mut current = path.parent();
    while let Some(ancestor) = current {
        if ancestor.is_root() {
            return false;
        }
        if paths.contains(&ancestor) {
            return true;
        }
        current = ancestor.parent();
    }
    false
}
