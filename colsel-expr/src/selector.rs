//! Selector AST.
#![forbid(unsafe_code)]

use colsel_result::Cardinality;
use colsel_types::{ColumnKindSet, ColumnPath};

use crate::dsl::IntoSelector;
use crate::predicate::{ColumnPredicate, TypeTarget};

/// Declarative description of which columns to pick.
///
/// A selector is built before any schema is consulted and is never evaluated
/// on its own: resolution happens later, against a concrete schema and scope.
/// Values are immutable and can be resolved any number of times.
///
/// Combinators compose left to right: most variants hold a `source` selector
/// whose resolved list they transform.
#[derive(Clone, Debug)]
pub enum Selector {
    /// Direct children of the current scope, in declared order.
    All,
    /// The column at a path relative to the current scope.
    Col(ColumnPath),
    /// Keep columns satisfying a predicate.
    Filter {
        source: Box<Selector>,
        predicate: ColumnPredicate,
    },
    /// Keep value and frame columns whose declared type is a subtype of `target`.
    ByType {
        source: Box<Selector>,
        target: TypeTarget,
    },
    /// Keep columns whose kind is in `kinds`.
    ByKind {
        source: Box<Selector>,
        kinds: ColumnKindSet,
    },
    /// Direct children of every group in the source, flattened one level.
    ChildrenOf(Box<Selector>),
    /// Pre-order traversal of the source columns and all their descendants.
    ///
    /// Without a source, the current scope itself is traversed.
    AtAnyDepth {
        source: Option<Box<Selector>>,
        include_top_level: bool,
        include_groups: bool,
    },
    /// Concatenation of every branch, deduplicated by path (first wins).
    Union(Vec<Selector>),
    /// `base` with the columns of `exclude` removed, keeping group structure.
    Except {
        base: Box<Selector>,
        exclude: Box<Selector>,
    },
    /// Each group of `group`, rebuilt without the children `exclude` names.
    ///
    /// `exclude` is resolved relative to the group (or to the enclosing
    /// scope). The result is the group itself, not its children.
    GroupExcept {
        group: Box<Selector>,
        exclude: Box<Selector>,
    },
    /// Evaluate `selector` with each column of `group` as the current scope.
    Within {
        group: Box<Selector>,
        selector: Box<Selector>,
    },
    /// Keep or drop a number of columns from either end.
    Slice {
        source: Box<Selector>,
        op: SliceOp,
        count: usize,
    },
    /// Keep or drop the run of columns at either end that satisfies `predicate`.
    SliceWhile {
        source: Box<Selector>,
        op: SliceOp,
        predicate: ColumnPredicate,
    },
    /// Columns around the first source column that `anchor` also resolves to.
    Bounded {
        source: Box<Selector>,
        bound: BoundOp,
        anchor: Box<Selector>,
    },
    /// Columns at the given positions of the source list, in the given order.
    Indexed {
        source: Box<Selector>,
        indices: Vec<usize>,
    },
    /// Keep only columns that have no ancestor in the same list.
    Simplify(Box<Selector>),
    /// Reduce the (optionally filtered) source to exactly one column.
    Guard {
        source: Box<Selector>,
        cardinality: Cardinality,
        predicate: Option<ColumnPredicate>,
    },
}

/// Which end of a list [`Selector::Slice`] works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceOp {
    Take,
    TakeLast,
    Drop,
    DropLast,
}

impl SliceOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            SliceOp::Take => "take",
            SliceOp::TakeLast => "take_last",
            SliceOp::Drop => "drop",
            SliceOp::DropLast => "drop_last",
        }
    }

    /// Apply this slice to a list, clamping `count` to its length.
    pub fn apply<T>(&self, mut items: Vec<T>, count: usize) -> Vec<T> {
        let n = count.min(items.len());
        match self {
            SliceOp::Take => {
                items.truncate(n);
                items
            }
            SliceOp::TakeLast => items.split_off(items.len() - n),
            SliceOp::Drop => items.split_off(n),
            SliceOp::DropLast => {
                items.truncate(items.len() - n);
                items
            }
        }
    }
}

impl SliceOp {
    /// Apply this slice to the leading (or trailing) run of `items` that
    /// satisfies `keep_going`.
    pub fn apply_while<T>(&self, mut items: Vec<T>, keep_going: impl Fn(&T) -> bool) -> Vec<T> {
        let head = items.iter().take_while(|item| keep_going(item)).count();
        let tail = items.iter().rev().take_while(|item| keep_going(item)).count();
        match self {
            SliceOp::Take => {
                items.truncate(head);
                items
            }
            SliceOp::TakeLast => items.split_off(items.len() - tail),
            SliceOp::Drop => items.split_off(head),
            SliceOp::DropLast => {
                items.truncate(items.len() - tail);
                items
            }
        }
    }

    pub fn while_str(&self) -> &'static str {
        match self {
            SliceOp::Take => "take_while",
            SliceOp::TakeLast => "take_last_while",
            SliceOp::Drop => "drop_while",
            SliceOp::DropLast => "drop_last_while",
        }
    }
}

/// Which side of the anchor column [`Selector::Bounded`] keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundOp {
    /// Strictly after the anchor.
    After,
    /// The anchor and everything after it.
    From,
    /// Strictly before the anchor.
    Before,
    /// Everything before the anchor, and the anchor.
    UpTo,
}

impl BoundOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundOp::After => "all_after",
            BoundOp::From => "all_from",
            BoundOp::Before => "all_before",
            BoundOp::UpTo => "all_up_to",
        }
    }

    /// Split `items` at the first element for which `is_anchor` holds.
    ///
    /// Without an anchor, `After` and `From` keep nothing while `Before` and
    /// `UpTo` keep everything.
    pub fn apply<T>(&self, mut items: Vec<T>, is_anchor: impl Fn(&T) -> bool) -> Vec<T> {
        let Some(at) = items.iter().position(is_anchor) else {
            return match self {
                BoundOp::After | BoundOp::From => Vec::new(),
                BoundOp::Before | BoundOp::UpTo => items,
            };
        };
        match self {
            BoundOp::After => items.split_off(at + 1),
            BoundOp::From => items.split_off(at),
            BoundOp::Before => {
                items.truncate(at);
                items
            }
            BoundOp::UpTo => {
                items.truncate(at + 1);
                items
            }
        }
    }
}

impl Selector {
    pub fn filter(self, predicate: impl Into<ColumnPredicate>) -> Self {
        Selector::Filter {
            source: Box::new(self),
            predicate: predicate.into(),
        }
    }

    pub fn of_type(self, target: TypeTarget) -> Self {
        Selector::ByType {
            source: Box::new(self),
            target,
        }
    }

    pub fn of_kind(self, kinds: impl Into<ColumnKindSet>) -> Self {
        Selector::ByKind {
            source: Box::new(self),
            kinds: kinds.into(),
        }
    }

    pub fn value_cols(self) -> Self {
        self.of_kind(ColumnKindSet::VALUE)
    }

    pub fn col_groups(self) -> Self {
        self.of_kind(ColumnKindSet::GROUP)
    }

    pub fn frame_cols(self) -> Self {
        self.of_kind(ColumnKindSet::FRAME)
    }

    pub fn cols_in_groups(self) -> Self {
        Selector::ChildrenOf(Box::new(self))
    }

    /// These columns and everything below them, groups included.
    pub fn at_any_depth(self) -> Self {
        self.at_any_depth_with(true, true)
    }

    pub fn at_any_depth_with(self, include_top_level: bool, include_groups: bool) -> Self {
        Selector::AtAnyDepth {
            source: Some(Box::new(self)),
            include_top_level,
            include_groups,
        }
    }

    /// Union with `other`. Nested unions are flattened.
    pub fn and(self, other: impl IntoSelector) -> Self {
        let mut branches = match self {
            Selector::Union(branches) => branches,
            other => vec![other],
        };
        match other.into_selector() {
            Selector::Union(more) => branches.extend(more),
            single => branches.push(single),
        }
        Selector::Union(branches)
    }

    /// Remove the columns of `exclude`, keeping group structure.
    ///
    /// On a single column reference the column must be a group, and the
    /// result is that group rebuilt without the excluded children:
    /// `col("g").except("x")` yields `g{y}` for `g{x, y}`.
    pub fn except(self, exclude: impl IntoSelector) -> Self {
        let exclude = Box::new(exclude.into_selector());
        match self {
            Selector::Col(_) => Selector::GroupExcept {
                group: Box::new(self),
                exclude,
            },
            base => Selector::Except {
                base: Box::new(base),
                exclude,
            },
        }
    }

    /// Resolve `selector` inside the group(s) this selector resolves to.
    pub fn select(self, selector: impl IntoSelector) -> Self {
        Selector::Within {
            group: Box::new(self),
            selector: Box::new(selector.into_selector()),
        }
    }

    /// All children of this group except `exclude`, which may be phrased
    /// relative to the group or to the enclosing scope.
    pub fn all_cols_except(self, exclude: impl IntoSelector) -> Self {
        self.select(Selector::All.except(exclude))
    }

    pub fn take(self, count: usize) -> Self {
        self.slice(SliceOp::Take, count)
    }

    pub fn take_last(self, count: usize) -> Self {
        self.slice(SliceOp::TakeLast, count)
    }

    pub fn drop(self, count: usize) -> Self {
        self.slice(SliceOp::Drop, count)
    }

    pub fn drop_last(self, count: usize) -> Self {
        self.slice(SliceOp::DropLast, count)
    }

    fn slice(self, op: SliceOp, count: usize) -> Self {
        Selector::Slice {
            source: Box::new(self),
            op,
            count,
        }
    }

    pub fn take_while(self, predicate: impl Into<ColumnPredicate>) -> Self {
        self.slice_while(SliceOp::Take, predicate.into())
    }

    pub fn take_last_while(self, predicate: impl Into<ColumnPredicate>) -> Self {
        self.slice_while(SliceOp::TakeLast, predicate.into())
    }

    pub fn drop_while(self, predicate: impl Into<ColumnPredicate>) -> Self {
        self.slice_while(SliceOp::Drop, predicate.into())
    }

    pub fn drop_last_while(self, predicate: impl Into<ColumnPredicate>) -> Self {
        self.slice_while(SliceOp::DropLast, predicate.into())
    }

    fn slice_while(self, op: SliceOp, predicate: ColumnPredicate) -> Self {
        Selector::SliceWhile {
            source: Box::new(self),
            op,
            predicate,
        }
    }

    /// Columns after `anchor`, which resolves in the current scope.
    pub fn all_after(self, anchor: impl IntoSelector) -> Self {
        self.bounded(BoundOp::After, anchor)
    }

    pub fn all_from(self, anchor: impl IntoSelector) -> Self {
        self.bounded(BoundOp::From, anchor)
    }

    pub fn all_before(self, anchor: impl IntoSelector) -> Self {
        self.bounded(BoundOp::Before, anchor)
    }

    pub fn all_up_to(self, anchor: impl IntoSelector) -> Self {
        self.bounded(BoundOp::UpTo, anchor)
    }

    fn bounded(self, bound: BoundOp, anchor: impl IntoSelector) -> Self {
        Selector::Bounded {
            source: Box::new(self),
            bound,
            anchor: Box::new(anchor.into_selector()),
        }
    }

    /// Columns at `indices` of this selector's result. Resolution fails on
    /// an index past the end.
    pub fn cols_at(self, indices: impl IntoIterator<Item = usize>) -> Self {
        Selector::Indexed {
            source: Box::new(self),
            indices: indices.into_iter().collect(),
        }
    }

    pub fn cols_in_range(self, range: std::ops::Range<usize>) -> Self {
        self.cols_at(range)
    }

    pub fn simplify(self) -> Self {
        Selector::Simplify(Box::new(self))
    }

    pub fn first(self) -> Self {
        self.guard(Cardinality::First, None)
    }

    pub fn first_matching(self, predicate: impl Into<ColumnPredicate>) -> Self {
        self.guard(Cardinality::First, Some(predicate.into()))
    }

    pub fn last(self) -> Self {
        self.guard(Cardinality::Last, None)
    }

    pub fn last_matching(self, predicate: impl Into<ColumnPredicate>) -> Self {
        self.guard(Cardinality::Last, Some(predicate.into()))
    }

    pub fn single(self) -> Self {
        self.guard(Cardinality::Single, None)
    }

    pub fn single_matching(self, predicate: impl Into<ColumnPredicate>) -> Self {
        self.guard(Cardinality::Single, Some(predicate.into()))
    }

    fn guard(self, cardinality: Cardinality, predicate: Option<ColumnPredicate>) -> Self {
        Selector::Guard {
            source: Box::new(self),
            cardinality,
            predicate,
        }
    }
}
