use std::fmt;

use colsel_types::ColumnPath;
use thiserror::Error;

/// Which cardinality guard raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// Take the first match.
    First,
    /// Take the last match.
    Last,
    /// Require exactly one match.
    Single,
}

impl Cardinality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cardinality::First => "first",
            Cardinality::Last => "last",
            Cardinality::Single => "single",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for all colsel operations.
///
/// This enum encompasses every failure mode of selector resolution, from
/// schema construction to cardinality guards. Each variant includes the
/// context needed to report the problem to an end user.
///
/// # Error Handling Strategy
///
/// Errors are raised at the point of evaluation and propagate upward with the
/// `?` operator. The engine never catches or retries: either a full ordered
/// list of columns is returned or an error is. Recovery (for example choosing
/// the skip policy so that missing references resolve to nothing) is up to the
/// calling operation.
///
/// Selecting columns by type never fails; a type mismatch simply filters the
/// column out.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A selector referenced columns that exist in no scope it was allowed to
    /// resolve them in.
    ///
    /// `paths` lists the references as written by the caller. `available`
    /// carries a rendering of the columns that were in scope, produced by the
    /// renderer injected into the resolution context (if any).
    ///
    /// # Recovery
    ///
    /// Not recoverable for the enclosing operation. Present a "column not
    /// found" message, ideally including `available`.
    #[error("{}", render_unresolved(.paths, .available.as_deref()))]
    UnresolvedColumn {
        paths: Vec<ColumnPath>,
        available: Option<String>,
    },

    /// A `first`, `last` or `single` guard found no matching column.
    #[error("{cardinality}: no column matched the selection")]
    EmptySelection { cardinality: Cardinality },

    /// A `single` guard found more than one matching column.
    #[error("{cardinality}: expected exactly one column, found {count}: {}", join_paths(.paths))]
    MultipleMatches {
        cardinality: Cardinality,
        count: usize,
        paths: Vec<ColumnPath>,
    },

    /// A selector that needs a column group as its scope resolved to a value
    /// or frame column.
    #[error("column '{0}' is not a column group")]
    NotAColumnGroup(ColumnPath),

    /// Two siblings in one group (or two top-level columns) share a name.
    #[error("duplicate column name '{name}'")]
    DuplicateColumn { name: String },

    /// Invalid user input or API parameter.
    ///
    /// Examples: an invalid name pattern or an empty path segment.
    ///
    /// # Recovery
    ///
    /// Fix the input and retry the operation.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// Internal error indicating a bug or unexpected state.
    ///
    /// This error should never occur during normal operation. If you encounter
    /// it, it indicates a violated engine invariant.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create an unresolved-column error for the given references.
    #[inline]
    pub fn unresolved(paths: Vec<ColumnPath>, available: Option<String>) -> Self {
        Error::UnresolvedColumn { paths, available }
    }

    /// Create an invalid argument error from any displayable error.
    ///
    /// # Examples
    ///
    /// ```
    /// use colsel_result::Error;
    ///
    /// fn parse_count(input: &str) -> Result<usize, Error> {
    ///     input.parse::<usize>().map_err(Error::invalid_argument)
    /// }
    ///
    /// assert_eq!(parse_count("3").unwrap(), 3);
    /// assert!(matches!(parse_count("x"), Err(Error::InvalidArgumentError(_))));
    /// ```
    #[inline]
    pub fn invalid_argument<E: fmt::Display>(err: E) -> Self {
        Error::InvalidArgumentError(err.to_string())
    }

    /// Paths named by an unresolved-column error, empty for other variants.
    pub fn unresolved_paths(&self) -> &[ColumnPath] {
        match self {
            Error::UnresolvedColumn { paths, .. } => paths,
            _ => &[],
        }
    }
}

fn join_paths(paths: &[ColumnPath]) -> String {
    paths
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_unresolved(paths: &[ColumnPath], available: Option<&str>) -> String {
    let noun = if paths.len() == 1 { "column" } else { "columns" };
    match available {
        Some(available) => format!(
            "{noun} not found: {}; available columns: {available}",
            join_paths(paths)
        ),
        None => format!("{noun} not found: {}", join_paths(paths)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_message_names_paths_and_available_columns() {
        let err = Error::unresolved(
            vec![ColumnPath::from(["g", "z"])],
            Some("a, g, g.x, g.y".into()),
        );
        assert_eq!(
            err.to_string(),
            "column not found: g.z; available columns: a, g, g.x, g.y"
        );
        assert_eq!(err.unresolved_paths(), &[ColumnPath::from(["g", "z"])]);

        let bare = Error::unresolved(vec!["a".into(), "b".into()], None);
        assert_eq!(bare.to_string(), "columns not found: a, b");
    }

    #[test]
    fn guard_messages() {
        let empty = Error::EmptySelection {
            cardinality: Cardinality::First,
        };
        assert_eq!(empty.to_string(), "first: no column matched the selection");

        let many = Error::MultipleMatches {
            cardinality: Cardinality::Single,
            count: 2,
            paths: vec!["a".into(), ColumnPath::from(["g", "x"])],
        };
        assert_eq!(
            many.to_string(),
            "single: expected exactly one column, found 2: a, g.x"
        );
        assert!(many.unresolved_paths().is_empty());
    }
}
