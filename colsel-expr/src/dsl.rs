//! Entry points for building selectors.
//!
//! Anything that names a column (string slices, owned strings, path arrays,
//! [`ColumnPath`]s) converts into a [`Selector::Col`] through [`IntoSelector`],
//! so `col("g").select(["x", "y"])` and `col("g").select(col(["x", "y"]))`
//! mean the same thing.

use colsel_types::{ColumnKindSet, ColumnPath};

use crate::predicate::{ColumnPredicate, TypeTarget};
use crate::selector::Selector;

/// Conversion into a [`Selector`].
pub trait IntoSelector {
    fn into_selector(self) -> Selector;
}

impl IntoSelector for Selector {
    fn into_selector(self) -> Selector {
        self
    }
}

impl IntoSelector for &Selector {
    fn into_selector(self) -> Selector {
        self.clone()
    }
}

impl IntoSelector for ColumnPath {
    fn into_selector(self) -> Selector {
        Selector::Col(self)
    }
}

impl IntoSelector for &ColumnPath {
    fn into_selector(self) -> Selector {
        Selector::Col(self.clone())
    }
}

impl IntoSelector for &str {
    fn into_selector(self) -> Selector {
        Selector::Col(ColumnPath::from(self))
    }
}

impl IntoSelector for String {
    fn into_selector(self) -> Selector {
        Selector::Col(ColumnPath::from(self))
    }
}

impl IntoSelector for &String {
    fn into_selector(self) -> Selector {
        Selector::Col(ColumnPath::from(self))
    }
}

impl IntoSelector for &[&str] {
    fn into_selector(self) -> Selector {
        Selector::Col(ColumnPath::from(self))
    }
}

/// A path given segment by segment, e.g. `["g", "x"]`.
impl<const N: usize> IntoSelector for [&str; N] {
    fn into_selector(self) -> Selector {
        Selector::Col(ColumnPath::from(self))
    }
}

/// Direct children of the current scope.
pub fn all() -> Selector {
    Selector::All
}

/// The column at `path`, relative to the current scope.
pub fn col(path: impl Into<ColumnPath>) -> Selector {
    Selector::Col(path.into())
}

/// Alias of [`col`] that reads better as the left side of
/// [`Selector::select`] and [`Selector::all_cols_except`].
pub fn group(path: impl Into<ColumnPath>) -> Selector {
    col(path)
}

/// Union of the given columns, in order. An empty list selects nothing.
pub fn cols<I, P>(paths: I) -> Selector
where
    I: IntoIterator<Item = P>,
    P: Into<ColumnPath>,
{
    Selector::Union(paths.into_iter().map(|p| Selector::Col(p.into())).collect())
}

/// A selector that resolves to no columns.
pub fn none() -> Selector {
    Selector::Union(Vec::new())
}

pub fn value_cols() -> Selector {
    all().value_cols()
}

pub fn col_groups() -> Selector {
    all().col_groups()
}

pub fn frame_cols() -> Selector {
    all().frame_cols()
}

pub fn cols_of_kind(kinds: impl Into<ColumnKindSet>) -> Selector {
    all().of_kind(kinds)
}

/// Direct children of the current scope whose type matches `target`.
pub fn cols_of(target: TypeTarget) -> Selector {
    all().of_type(target)
}

/// Direct children of the current scope that satisfy `predicate`.
pub fn cols_where(predicate: impl Into<ColumnPredicate>) -> Selector {
    all().filter(predicate)
}

/// Children of every group directly under the current scope.
pub fn cols_in_groups() -> Selector {
    all().cols_in_groups()
}

/// Every column below the current scope, at any depth, groups included.
pub fn cols_at_any_depth() -> Selector {
    at_any_depth(false, true)
}

/// Traverse the current scope itself.
///
/// `include_top_level` only has an effect inside a group scope, where it
/// adds the group to the output; the schema root is never emitted.
pub fn at_any_depth(include_top_level: bool, include_groups: bool) -> Selector {
    Selector::AtAnyDepth {
        source: None,
        include_top_level,
        include_groups,
    }
}

/// All direct children of the current scope except `exclude`.
pub fn all_except(exclude: impl IntoSelector) -> Selector {
    all().except(exclude)
}

/// Direct children of the current scope after `anchor`.
pub fn all_after(anchor: impl IntoSelector) -> Selector {
    all().all_after(anchor)
}

/// Direct children of the current scope from `anchor` onwards.
pub fn all_from(anchor: impl IntoSelector) -> Selector {
    all().all_from(anchor)
}

pub fn all_before(anchor: impl IntoSelector) -> Selector {
    all().all_before(anchor)
}

pub fn all_up_to(anchor: impl IntoSelector) -> Selector {
    all().all_up_to(anchor)
}

/// Direct children of the current scope at `indices`.
pub fn cols_at(indices: impl IntoIterator<Item = usize>) -> Selector {
    all().cols_at(indices)
}

pub fn cols_in_range(range: std::ops::Range<usize>) -> Selector {
    all().cols_in_range(range)
}

pub fn first() -> Selector {
    all().first()
}

pub fn last() -> Selector {
    all().last()
}

pub fn single() -> Selector {
    all().single()
}
