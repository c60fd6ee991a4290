use colsel_expr::ColumnPredicate;
use colsel_result::{Cardinality, Error, Result};
use colsel_schema::{ResolvedColumn, paths_of};

/// Reduce `columns` to the one column `cardinality` asks for.
///
/// Guards raise regardless of the unresolved-column policy: an empty or
/// ambiguous selection is not a missing reference.
pub(crate) fn apply_guard(
    columns: Vec<ResolvedColumn>,
    cardinality: Cardinality,
    predicate: Option<&ColumnPredicate>,
) -> Result<Vec<ResolvedColumn>> {
    let mut matching: Vec<ResolvedColumn> = match predicate {
        Some(predicate) => columns.into_iter().filter(|c| predicate.matches(c)).collect(),
        None => columns,
    };

    let picked = match cardinality {
        Cardinality::First => {
            matching.truncate(1);
            matching.pop()
        }
        Cardinality::Last => matching.pop(),
        Cardinality::Single => match matching.len() {
            0 | 1 => matching.pop(),
            count => {
                return Err(Error::MultipleMatches {
                    cardinality,
                    count,
                    paths: paths_of(&matching),
                });
            }
        },
    };

    picked
        .map(|column| vec![column])
        .ok_or(Error::EmptySelection { cardinality })
}
