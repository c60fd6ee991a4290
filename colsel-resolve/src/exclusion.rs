//! Structure-preserving exclusion.
//!
//! `base.except(exclude)` removes columns from `base` without flattening it:
//! excluding `g.x` from `[a, g{x, y}]` yields `[a, g{y}]`, where `g` is a
//! freshly built group holding only the surviving children. A group that
//! loses all of its children disappears.
//!
//! Inside a group scope `G` with enclosing scope `P`, the exclusion
//! references may be written relative to either one: `x` and `g.x` both
//! name `g.x` when `G = g`. The engine therefore resolves `exclude` twice,
//! leniently, once against each scope:
//!
//! - a reference is unresolved only if neither probe found it;
//! - paths found through `P` count only if they lie inside `G`;
//! - when both probes hit, both results are excluded.
//!
//! `col(g).except(exclude)` applies the same machinery to the group `g`
//! itself: `exclude` is read inside `g` and the result is `g` rebuilt.

use colsel_expr::Selector;
use colsel_result::{Error, Result};
use colsel_schema::{ColumnNode, Columns, GroupColumn, ResolvedColumn};
use colsel_types::ColumnPath;
use rustc_hash::FxHashSet;

use crate::context::{ResolutionContext, Scope, UnresolvedPolicy};
use crate::evaluator::evaluate;

pub(crate) fn evaluate_except(
    base: &Selector,
    exclude: &Selector,
    ctx: &ResolutionContext,
    misses: &mut Vec<ColumnPath>,
) -> Result<Vec<ResolvedColumn>> {
    let columns = evaluate(base, ctx, misses)?;
    let excluded = collect_exclusions(exclude, ctx, misses)?;
    if excluded.is_empty() {
        return Ok(columns);
    }

    tracing::debug!(
        "[EXCEPT] excluding {} path(s) from {} column(s) in scope '{}'",
        excluded.len(),
        columns.len(),
        ctx.scope().path()
    );
    rebuild(columns, &excluded)
}

/// Rebuild every group `group` resolves to without the children `exclude`
/// names, reading `exclude` inside that group.
pub(crate) fn evaluate_group_except(
    group: &Selector,
    exclude: &Selector,
    ctx: &ResolutionContext,
    misses: &mut Vec<ColumnPath>,
) -> Result<Vec<ResolvedColumn>> {
    let mut out = Vec::new();
    for column in evaluate(group, ctx, misses)? {
        let inner = ctx.enter(Scope::of_group(column.clone())?);
        let excluded = collect_exclusions(exclude, &inner, misses)?;
        tracing::debug!(
            "[EXCEPT] excluding {} path(s) inside group '{}'",
            excluded.len(),
            column.path
        );
        out.extend(rebuild(vec![column], &excluded)?);
    }
    Ok(out)
}

/// Absolute paths `exclude` names, relative to the current or the outer scope.
fn collect_exclusions(
    exclude: &Selector,
    ctx: &ResolutionContext,
    misses: &mut Vec<ColumnPath>,
) -> Result<FxHashSet<ColumnPath>> {
    let group_scope = ctx.scope();
    let mut group_misses = Vec::new();
    let group_probe = evaluate(exclude, &ctx.probe(group_scope.clone()), &mut group_misses);

    let Some(parent_scope) = ctx.outer() else {
        let hits = group_probe?;
        report_unresolved(group_misses, ctx, group_scope, misses)?;
        return Ok(hits.into_iter().map(|c| c.path).collect());
    };

    let mut parent_misses = Vec::new();
    let parent_probe = evaluate(exclude, &ctx.probe(parent_scope.clone()), &mut parent_misses);

    let (group_hits, parent_hits, unresolved) = match (group_probe, parent_probe) {
        (Ok(group_hits), Ok(parent_hits)) => {
            let unresolved = group_misses
                .into_iter()
                .filter(|path| parent_misses.contains(path))
                .collect();
            (group_hits, parent_hits, unresolved)
        }
        (Ok(group_hits), Err(err)) => {
            tracing::debug!(
                "[EXCEPT] ignoring outer scope '{}' for exclusion: {err}",
                parent_scope.path()
            );
            (group_hits, Vec::new(), group_misses)
        }
        (Err(err), Ok(parent_hits)) => {
            tracing::debug!(
                "[EXCEPT] ignoring group scope '{}' for exclusion: {err}",
                group_scope.path()
            );
            (Vec::new(), parent_hits, parent_misses)
        }
        (Err(err), Err(outer_err)) => {
            tracing::debug!(
                "[EXCEPT] exclusion failed in both scopes; dropping outer scope '{}' error: {outer_err}",
                parent_scope.path()
            );
            return Err(err);
        }
    };
    report_unresolved(unresolved, ctx, parent_scope, misses)?;

    let group_path = group_scope.path();
    let mut excluded: FxHashSet<ColumnPath> = group_hits.into_iter().map(|c| c.path).collect();
    for column in parent_hits {
        if column.path.starts_with(group_path) {
            excluded.insert(column.path);
        } else {
            tracing::trace!(
                "[EXCEPT] '{}' lies outside scope '{}', ignored",
                column.path,
                group_path
            );
        }
    }
    Ok(excluded)
}

fn report_unresolved(
    mut unresolved: Vec<ColumnPath>,
    ctx: &ResolutionContext,
    available: &Scope,
    misses: &mut Vec<ColumnPath>,
) -> Result<()> {
    if unresolved.is_empty() {
        return Ok(());
    }
    let mut seen = FxHashSet::default();
    unresolved.retain(|path| seen.insert(path.clone()));

    match ctx.policy() {
        UnresolvedPolicy::Fail => Err(Error::unresolved(unresolved, ctx.render(available))),
        UnresolvedPolicy::Skip => {
            tracing::debug!(
                "[EXCEPT] {} exclusion reference(s) not found in scope '{}', skipping",
                unresolved.len(),
                ctx.scope().path()
            );
            misses.extend(unresolved);
            Ok(())
        }
    }
}

/// Remove `excluded` paths from `columns`, rebuilding partially excluded
/// groups. Order is preserved and paths stay absolute.
fn rebuild(
    columns: Vec<ResolvedColumn>,
    excluded: &FxHashSet<ColumnPath>,
) -> Result<Vec<ResolvedColumn>> {
    let mut out = Vec::with_capacity(columns.len());
    for column in columns {
        if excluded.contains(&column.path) {
            tracing::trace!("[EXCEPT] dropping '{}'", column.path);
            continue;
        }

        let nested: FxHashSet<ColumnPath> = excluded
            .iter()
            .filter(|path| path.is_strict_descendant_of(&column.path))
            .cloned()
            .collect();
        let original = match column.node.as_group() {
            Some(group) if !nested.is_empty() => group,
            _ => {
                out.push(column);
                continue;
            }
        };

        let children: Vec<ResolvedColumn> = column.group_children().into_iter().flatten().collect();
        let kept = rebuild(children, &nested)?;
        if kept.is_empty() {
            tracing::debug!("[EXCEPT] group '{}' emptied, dropping it", column.path);
            continue;
        }

        let node = regroup(original, &column.path, kept)?;
        out.push(ResolvedColumn::new(column.path, node));
    }
    Ok(out)
}

/// `original` over the surviving children. They come from a single sibling
/// list, so a name clash here is a bug.
fn regroup(
    original: &GroupColumn,
    path: &ColumnPath,
    kept: Vec<ResolvedColumn>,
) -> Result<ColumnNode> {
    let nodes = kept.into_iter().map(|c| c.node).collect();
    let children = Columns::try_new(nodes).map_err(|err| {
        Error::Internal(format!("rebuilding group '{path}' after exclusion: {err}"))
    })?;
    Ok(ColumnNode::Group(original.with_children(children)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PathListRenderer;
    use crate::evaluator::{resolve, resolve_detailed, resolve_in};
    use arrow::datatypes::DataType;
    use colsel_expr::{all, all_except, col, cols, group, value_cols};
    use colsel_schema::{Schema, display_resolved};

    /// `a, g{x, y, h{z}}`
    fn schema() -> Schema {
        Schema::try_new(vec![
            ColumnNode::value("a", DataType::Int64),
            ColumnNode::group(
                "g",
                vec![
                    ColumnNode::value("x", DataType::Int64),
                    ColumnNode::value("y", DataType::Int64),
                    ColumnNode::group("h", vec![ColumnNode::value("z", DataType::Int64)]).unwrap(),
                ],
            )
            .unwrap(),
        ])
        .unwrap()
    }

    fn shown(selector: &Selector) -> String {
        display_resolved(&resolve_in(selector, &schema()).unwrap())
    }

    #[test]
    fn nested_exclusion_rebuilds_groups() {
        assert_eq!(shown(&all_except(["g", "x"])), "a, g{y, h{z}}");
        assert_eq!(shown(&all_except(["g", "h", "z"])), "a, g{x, y}");
        assert_eq!(shown(&all_except("g")), "a");
    }

    #[test]
    fn emptied_groups_are_dropped() {
        assert_eq!(
            shown(&all().except(cols([["g", "x"], ["g", "y"], ["g", "h"]]))),
            "a"
        );
        assert_eq!(shown(&all().except(col("g").at_any_depth_with(false, false))), "a");
    }

    #[test]
    fn untouched_groups_are_passed_through() {
        let schema = schema();
        let before = resolve_in(&all(), &schema).unwrap();
        let after = resolve_in(&all_except("a"), &schema).unwrap();
        assert_eq!(after.as_slice(), &before[1..]);
    }

    #[test]
    fn group_scope_accepts_both_spellings() {
        let schema = schema();
        let ctx = ResolutionContext::new(&schema).in_group("g").unwrap();
        for exclude in [col("x"), col(["g", "x"])] {
            let out = resolve(&all().except(exclude), &ctx).unwrap();
            assert_eq!(display_resolved(&out), "g.y, g.h{z}");
        }
        let out = resolve(&all().except(col(["h", "z"])), &ctx).unwrap();
        assert_eq!(display_resolved(&out), "g.x, g.y");
    }

    #[test]
    fn outer_references_outside_the_group_are_ignored() {
        let schema = schema();
        let ctx = ResolutionContext::new(&schema).in_group("g").unwrap();
        let out = resolve(&all().except("a"), &ctx).unwrap();
        assert_eq!(display_resolved(&out), "g.x, g.y, g.h{z}");
    }

    #[test]
    fn references_missing_from_both_scopes_fail() {
        let schema = schema();
        let ctx = ResolutionContext::new(&schema)
            .with_renderer(PathListRenderer)
            .in_group("g")
            .unwrap();
        let err = resolve(&all().except(cols(["x", "nope"])), &ctx).unwrap_err();
        assert_eq!(
            err,
            Error::UnresolvedColumn {
                paths: vec![ColumnPath::from("nope")],
                available: Some("a, g".to_string()),
            }
        );
    }

    #[test]
    fn skip_policy_reports_misses() {
        let schema = schema();
        let ctx = ResolutionContext::new(&schema).with_policy(UnresolvedPolicy::Skip);
        let resolution = resolve_detailed(&all_except(cols(["a", "zz"])), &ctx).unwrap();
        assert_eq!(display_resolved(&resolution.columns), "g{x, y, h{z}}");
        assert_eq!(resolution.unresolved, vec![ColumnPath::from("zz")]);
    }

    #[test]
    fn except_on_a_group_reference_rebuilds_that_group() {
        assert_eq!(shown(&col("g").except("x")), "g{y, h{z}}");
        assert_eq!(shown(&col("g").except(["h", "z"])), "g{x, y}");
        assert_eq!(shown(&col("g").except(["g", "y"])), "g{x, h{z}}");
        assert_eq!(shown(&col("g").except(cols(["x", "y", "h"]))), "");

        let err = resolve_in(&col("a").except("x"), &schema()).unwrap_err();
        assert_eq!(err, Error::NotAColumnGroup(ColumnPath::from("a")));
        let err = resolve_in(&col("g").except("nope"), &schema()).unwrap_err();
        assert_eq!(err.unresolved_paths(), &[ColumnPath::from("nope")]);
    }

    #[test]
    fn rebuilt_groups_keep_their_nullability() {
        let g = GroupColumn::new(
            "g",
            Columns::try_new(vec![
                ColumnNode::value("x", DataType::Int64),
                ColumnNode::value("y", DataType::Int64),
            ])
            .unwrap(),
        )
        .with_nullable(true);
        let schema = Schema::try_new(vec![ColumnNode::Group(g)]).unwrap();
        let out = resolve_in(&all_except(["g", "x"]), &schema).unwrap();
        assert_eq!(display_resolved(&out), "g{y}");
        assert!(out[0].node.is_nullable());
    }

    /// `x, g{x, y, g{x, y}}`
    fn repeated_names() -> Schema {
        let inner = || {
            vec![
                ColumnNode::value("x", DataType::Int64),
                ColumnNode::value("y", DataType::Int64),
            ]
        };
        let mut outer = inner();
        outer.push(ColumnNode::group("g", inner()).unwrap());
        Schema::try_new(vec![
            ColumnNode::value("x", DataType::Int64),
            ColumnNode::group("g", outer).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn hits_in_both_scopes_are_merged() {
        let schema = repeated_names();
        let ctx = ResolutionContext::new(&schema).in_group("g").unwrap();
        // Inside `g` this names `g.g.x`; from the root it names `g.x`.
        let out = resolve(&all().except(col(["g", "x"])), &ctx).unwrap();
        assert_eq!(display_resolved(&out), "g.y, g.g{y}");
        // From the root `x` is the top-level column, which lies outside `g`.
        let out = resolve(&all().except("x"), &ctx).unwrap();
        assert_eq!(display_resolved(&out), "g.y, g.g{x, y}");

        let columns = resolve_in(&group("g").all_cols_except(["g", "x"]), &schema).unwrap();
        assert_eq!(display_resolved(&columns), "g.y, g.g{y}");
    }

    #[test]
    fn hard_errors_in_both_scopes_report_the_group_error() {
        let schema = schema();
        let ctx = ResolutionContext::new(&schema).in_group("g").unwrap();
        // Three children in `g`, two at the root.
        let err = resolve(&all().except(all().single()), &ctx).unwrap_err();
        match err {
            Error::MultipleMatches { count, .. } => assert_eq!(count, 3),
            other => panic!("expected MultipleMatches, got {other:?}"),
        }
    }

    #[test]
    fn clashing_children_are_an_internal_error() {
        let original = GroupColumn::new("g", Columns::default());
        let path = ColumnPath::from("g");
        let twin = |name: &str| {
            ResolvedColumn::new(
                ColumnPath::from(["g", name]),
                ColumnNode::value(name, DataType::Int64),
            )
        };
        let err = regroup(&original, &path, vec![twin("x"), twin("x")]).unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
        let node = regroup(&original, &path, vec![twin("x")]).unwrap();
        assert_eq!(node.to_string(), "g{x}");
    }

    #[test]
    fn exclusion_by_filter_result() {
        assert_eq!(
            shown(&all().except(group("g").select(value_cols()))),
            "a, g{h{z}}"
        );
    }
}
