//! Lightweight formatting helpers for selectors.
//!
//! Selectors print back as the builder calls that produce them, e.g.
//! `col(g).select(all().except(col(x)))`. Used in log lines and error context.

use std::fmt;

use colsel_types::ColumnKindSet;

use crate::selector::Selector;

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => f.write_str("all()"),
            Selector::Col(path) => write!(f, "col({path})"),
            Selector::Filter { source, predicate } => {
                write!(f, "{source}.filter({predicate})")
            }
            Selector::ByType { source, target } => write!(f, "{source}.of_type({target})"),
            Selector::ByKind { source, kinds } => match *kinds {
                ColumnKindSet::VALUE => write!(f, "{source}.value_cols()"),
                ColumnKindSet::GROUP => write!(f, "{source}.col_groups()"),
                ColumnKindSet::FRAME => write!(f, "{source}.frame_cols()"),
                _ => write!(f, "{source}.of_kind({kinds})"),
            },
            Selector::ChildrenOf(source) => write!(f, "{source}.cols_in_groups()"),
            Selector::AtAnyDepth {
                source,
                include_top_level,
                include_groups,
            } => {
                if let Some(source) = source {
                    write!(f, "{source}.")?;
                }
                write!(
                    f,
                    "at_any_depth(top_level={include_top_level}, groups={include_groups})"
                )
            }
            Selector::Union(branches) => {
                if branches.is_empty() {
                    return f.write_str("none()");
                }
                f.write_str("(")?;
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" and ")?;
                    }
                    write!(f, "{branch}")?;
                }
                f.write_str(")")
            }
            Selector::Except { base, exclude } => write!(f, "{base}.except({exclude})"),
            Selector::GroupExcept { group, exclude } => write!(f, "{group}.except({exclude})"),
            Selector::Within { group, selector } => write!(f, "{group}.select({selector})"),
            Selector::Slice { source, op, count } => {
                write!(f, "{source}.{}({count})", op.as_str())
            }
            Selector::SliceWhile {
                source,
                op,
                predicate,
            } => write!(f, "{source}.{}({predicate})", op.while_str()),
            Selector::Bounded {
                source,
                bound,
                anchor,
            } => write!(f, "{source}.{}({anchor})", bound.as_str()),
            Selector::Indexed { source, indices } => write!(f, "{source}.cols_at({indices:?})"),
            Selector::Simplify(source) => write!(f, "{source}.simplify()"),
            Selector::Guard {
                source,
                cardinality,
                predicate,
            } => match predicate {
                Some(predicate) => write!(f, "{source}.{cardinality}({predicate})"),
                None => write!(f, "{source}.{cardinality}()"),
            },
        }
    }
}
