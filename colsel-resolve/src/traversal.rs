//! Iterative pre-order traversal of column trees.
//!
//! Group nesting has no depth limit, so traversal uses an explicit work stack
//! instead of recursion. Children are pushed in reverse so that they pop in
//! declared order, which yields the same sequence as a recursive pre-order
//! walk:
//!
//! ```text
//! a, g{x, h{z}}, b   ->   a, g, g.x, g.h, g.h.z, b
//! ```

use colsel_schema::ResolvedColumn;
use colsel_types::ColumnPath;
use rustc_hash::FxHashSet;

/// Options for [`traverse_preorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalOptions {
    /// Emit the starting columns themselves, not only their descendants.
    pub include_top_level: bool,
    /// Emit group columns. Groups are always descended into either way.
    pub include_groups: bool,
}

impl TraversalOptions {
    fn emits(&self, column: &ResolvedColumn, top_level: bool) -> bool {
        (!top_level || self.include_top_level) && (self.include_groups || !column.node.is_group())
    }
}

/// Walk `starts` and all of their descendants in pre-order.
///
/// The output is deduplicated by path, keeping the first visit, so
/// overlapping starting points (a group and one of its children) do not
/// produce the same column twice.
pub fn traverse_preorder<I>(starts: I, options: TraversalOptions) -> Vec<ResolvedColumn>
where
    I: IntoIterator<Item = ResolvedColumn>,
{
    // (column, is_top_level)
    let mut work_stack: Vec<(ResolvedColumn, bool)> =
        starts.into_iter().map(|c| (c, true)).collect();
    work_stack.reverse();

    let mut seen: FxHashSet<ColumnPath> = FxHashSet::default();
    let mut out = Vec::new();

    while let Some((column, top_level)) = work_stack.pop() {
        if let Some(children) = column.group_children() {
            let mut children: Vec<_> = children.map(|c| (c, false)).collect();
            children.reverse();
            work_stack.extend(children);
        }
        if options.emits(&column, top_level) && seen.insert(column.path.clone()) {
            out.push(column);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::DataType;
    use colsel_schema::{ColumnNode, Schema};

    fn sample() -> Schema {
        Schema::try_new(vec![
            ColumnNode::value("a", DataType::Int64),
            ColumnNode::group(
                "g",
                vec![
                    ColumnNode::value("x", DataType::Int64),
                    ColumnNode::group("h", vec![ColumnNode::value("z", DataType::Int64)]).unwrap(),
                ],
            )
            .unwrap(),
            ColumnNode::value("b", DataType::Int64),
        ])
        .unwrap()
    }

    fn top_level(schema: &Schema) -> Vec<ResolvedColumn> {
        schema
            .iter()
            .map(|n| ResolvedColumn::new(ColumnPath::from(n.name()), n.clone()))
            .collect()
    }

    fn paths(columns: &[ResolvedColumn]) -> Vec<String> {
        columns.iter().map(|c| c.path.to_string()).collect()
    }

    #[test]
    fn visits_in_declared_preorder() {
        let schema = sample();
        let out = traverse_preorder(
            top_level(&schema),
            TraversalOptions {
                include_top_level: true,
                include_groups: true,
            },
        );
        assert_eq!(paths(&out), vec!["a", "g", "g.x", "g.h", "g.h.z", "b"]);
        assert_eq!(out.len(), schema.node_count());
    }

    #[test]
    fn options_filter_emitted_columns() {
        let schema = sample();
        let no_groups = traverse_preorder(
            top_level(&schema),
            TraversalOptions {
                include_top_level: true,
                include_groups: false,
            },
        );
        assert_eq!(paths(&no_groups), vec!["a", "g.x", "g.h.z", "b"]);

        let no_top = traverse_preorder(
            top_level(&schema),
            TraversalOptions {
                include_top_level: false,
                include_groups: true,
            },
        );
        assert_eq!(paths(&no_top), vec!["g.x", "g.h", "g.h.z"]);
    }

    #[test]
    fn overlapping_starts_are_deduplicated() {
        let schema = sample();
        let g = ResolvedColumn::new(ColumnPath::from("g"), schema.column("g").unwrap().clone());
        let h = ResolvedColumn::new(
            ColumnPath::from(["g", "h"]),
            schema.get(&ColumnPath::from(["g", "h"])).unwrap().clone(),
        );
        let out = traverse_preorder(
            vec![g, h],
            TraversalOptions {
                include_top_level: true,
                include_groups: true,
            },
        );
        assert_eq!(paths(&out), vec!["g", "g.x", "g.h", "g.h.z"]);
    }

    #[test]
    fn deep_nesting_reaches_the_leaf() {
        let mut node = ColumnNode::value("leaf", DataType::Boolean);
        for depth in 0..1_000 {
            node = ColumnNode::group(format!("g{depth}"), vec![node]).unwrap();
        }
        let start = ResolvedColumn::new(ColumnPath::from(node.name()), node);
        let out = traverse_preorder(
            [start],
            TraversalOptions {
                include_top_level: true,
                include_groups: false,
            },
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name(), "leaf");
    }
}
