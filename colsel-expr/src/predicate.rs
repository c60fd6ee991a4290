//! Column predicates and type targets used by filtering selectors.

use std::fmt;
use std::sync::Arc;

use arrow::datatypes::DataType;
use colsel_result::{Error, Result};
use colsel_schema::{ColumnNode, ResolvedColumn};
use colsel_types::ColumnKindSet;
use regex::Regex;

type PredicateFn = dyn Fn(&ResolvedColumn) -> bool + Send + Sync;

/// A user-supplied test applied to resolved columns.
///
/// Predicates are opaque closures with a label used when selectors are
/// printed. They are cheap to clone and must be pure: resolution may call
/// them in any order and any number of times.
#[derive(Clone)]
pub struct ColumnPredicate {
    label: Arc<str>,
    test: Arc<PredicateFn>,
}

impl ColumnPredicate {
    pub fn new<F>(label: impl Into<String>, test: F) -> Self
    where
        F: Fn(&ResolvedColumn) -> bool + Send + Sync + 'static,
    {
        Self {
            label: Arc::from(label.into()),
            test: Arc::new(test),
        }
    }

    #[inline]
    pub fn matches(&self, column: &ResolvedColumn) -> bool {
        (self.test)(column)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn name_equals(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(format!("name == {name:?}"), move |c| c.name() == name)
    }

    pub fn name_contains(needle: impl Into<String>) -> Self {
        let needle = needle.into();
        Self::new(format!("name contains {needle:?}"), move |c| {
            c.name().contains(needle.as_str())
        })
    }

    pub fn name_starts_with(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self::new(format!("name starts_with {prefix:?}"), move |c| {
            c.name().starts_with(prefix.as_str())
        })
    }

    pub fn name_ends_with(suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        Self::new(format!("name ends_with {suffix:?}"), move |c| {
            c.name().ends_with(suffix.as_str())
        })
    }

    /// Match column names against a regular expression.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgumentError`] if `pattern` does not compile.
    pub fn name_matches(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(Error::invalid_argument)?;
        Ok(Self::name_regex(regex))
    }

    pub fn name_regex(regex: Regex) -> Self {
        Self::new(format!("name ~ /{}/", regex.as_str()), move |c| {
            regex.is_match(c.name())
        })
    }

    pub fn kind_is(kinds: impl Into<ColumnKindSet>) -> Self {
        let kinds = kinds.into();
        Self::new(format!("kind in {kinds}"), move |c| kinds.contains(c.kind()))
    }

    pub fn not(self) -> Self {
        let label = format!("!({})", self.label);
        Self::new(label, move |c| !self.matches(c))
    }

    pub fn and(self, other: ColumnPredicate) -> Self {
        let label = format!("({} && {})", self.label, other.label);
        Self::new(label, move |c| self.matches(c) && other.matches(c))
    }

    pub fn or(self, other: ColumnPredicate) -> Self {
        let label = format!("({} || {})", self.label, other.label);
        Self::new(label, move |c| self.matches(c) || other.matches(c))
    }
}

impl<F> From<F> for ColumnPredicate
where
    F: Fn(&ResolvedColumn) -> bool + Send + Sync + 'static,
{
    fn from(test: F) -> Self {
        ColumnPredicate::new("<fn>", test)
    }
}

impl fmt::Debug for ColumnPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ColumnPredicate").field(&self.label).finish()
    }
}

impl fmt::Display for ColumnPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Family of declared types a [`TypeTarget`] accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeClass {
    /// Every value and frame column.
    Any,
    /// Exactly this Arrow type.
    Exact(DataType),
    /// Integers, floats and decimals.
    Numeric,
    Integer,
    Floating,
    /// UTF-8 strings of any offset width.
    Text,
    /// Dates, times, timestamps, durations and intervals.
    Temporal,
    Boolean,
    /// Frame columns only.
    Frame,
}

/// Type requested by `cols_of`.
///
/// Type filtering follows subtype semantics: a value column matches when its
/// declared type belongs to `class`, and when its nullability is allowed. A
/// non-nullable target rejects nullable columns, while a nullable target
/// accepts both. Column groups never match a type target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTarget {
    pub class: TypeClass,
    pub nullable: bool,
}

impl TypeTarget {
    pub const fn new(class: TypeClass, nullable: bool) -> Self {
        Self { class, nullable }
    }

    /// The top type: every value and frame column.
    pub const fn any() -> Self {
        Self::new(TypeClass::Any, true)
    }

    pub fn exact(data_type: DataType) -> Self {
        Self::new(TypeClass::Exact(data_type), false)
    }

    pub const fn numeric() -> Self {
        Self::new(TypeClass::Numeric, false)
    }

    pub const fn integer() -> Self {
        Self::new(TypeClass::Integer, false)
    }

    pub const fn floating() -> Self {
        Self::new(TypeClass::Floating, false)
    }

    pub const fn text() -> Self {
        Self::new(TypeClass::Text, false)
    }

    pub const fn temporal() -> Self {
        Self::new(TypeClass::Temporal, false)
    }

    pub const fn boolean() -> Self {
        Self::new(TypeClass::Boolean, false)
    }

    pub const fn frame() -> Self {
        Self::new(TypeClass::Frame, false)
    }

    /// Widen this target to accept nullable columns as well.
    pub fn nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }

    pub fn accepts(&self, node: &ColumnNode) -> bool {
        match node {
            ColumnNode::Group(_) => false,
            ColumnNode::Frame(_) => matches!(self.class, TypeClass::Any | TypeClass::Frame),
            ColumnNode::Value(value) => {
                (self.nullable || !value.nullable) && self.class.accepts(&value.data_type)
            }
        }
    }
}

impl TypeClass {
    fn accepts(&self, data_type: &DataType) -> bool {
        match self {
            TypeClass::Any => true,
            TypeClass::Exact(expected) => expected == data_type,
            TypeClass::Numeric => data_type.is_numeric(),
            TypeClass::Integer => data_type.is_integer(),
            TypeClass::Floating => data_type.is_floating(),
            TypeClass::Text => matches!(
                data_type,
                DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
            ),
            TypeClass::Temporal => data_type.is_temporal(),
            TypeClass::Boolean => matches!(data_type, DataType::Boolean),
            TypeClass::Frame => false,
        }
    }

    pub fn label(&self) -> String {
        match self {
            TypeClass::Any => "any".into(),
            TypeClass::Exact(data_type) => data_type.to_string(),
            TypeClass::Numeric => "numeric".into(),
            TypeClass::Integer => "integer".into(),
            TypeClass::Floating => "floating".into(),
            TypeClass::Text => "text".into(),
            TypeClass::Temporal => "temporal".into(),
            TypeClass::Boolean => "boolean".into(),
            TypeClass::Frame => "frame".into(),
        }
    }
}

impl From<DataType> for TypeTarget {
    fn from(data_type: DataType) -> Self {
        TypeTarget::exact(data_type)
    }
}

impl fmt::Display for TypeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.class.label())?;
        if self.nullable && self.class != TypeClass::Any {
            f.write_str("?")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colsel_schema::Schema;
    use colsel_types::{ColumnKind, ColumnPath};

    fn resolved(name: &str, node: ColumnNode) -> ResolvedColumn {
        ResolvedColumn::new(ColumnPath::from(name), node)
    }

    #[test]
    fn name_predicates() {
        let col = resolved("price_usd", ColumnNode::value("price_usd", DataType::Float64));
        assert!(ColumnPredicate::name_contains("ice").matches(&col));
        assert!(ColumnPredicate::name_starts_with("price").matches(&col));
        assert!(ColumnPredicate::name_ends_with("_usd").matches(&col));
        assert!(!ColumnPredicate::name_equals("price").matches(&col));
        assert!(ColumnPredicate::name_matches("^p.*d$").unwrap().matches(&col));
        assert!(
            ColumnPredicate::name_starts_with("x")
                .not()
                .and(ColumnPredicate::name_contains("_"))
                .matches(&col)
        );
    }

    #[test]
    fn invalid_regex_is_an_invalid_argument() {
        let err = ColumnPredicate::name_matches("(").unwrap_err();
        assert!(matches!(err, Error::InvalidArgumentError(_)));
    }

    #[test]
    fn kind_predicate_and_closure_conversion() {
        let group = resolved(
            "g",
            ColumnNode::group("g", vec![ColumnNode::value("x", DataType::Int32)]).unwrap(),
        );
        assert!(ColumnPredicate::kind_is(ColumnKind::Group).matches(&group));
        assert!(!ColumnPredicate::kind_is(ColumnKind::Value).matches(&group));

        let pred: ColumnPredicate = (|c: &ResolvedColumn| c.name().len() == 1).into();
        assert!(pred.matches(&group));
        assert_eq!(pred.label(), "<fn>");
    }

    #[test]
    fn type_targets_follow_subtyping_and_nullability() {
        let int = ColumnNode::value("i", DataType::Int64);
        let maybe_int = ColumnNode::nullable_value("j", DataType::Int64);
        let text = ColumnNode::value("s", DataType::Utf8);
        let frame = ColumnNode::frame("f", Schema::empty());
        let group = ColumnNode::group("g", vec![]).unwrap();

        assert!(TypeTarget::numeric().accepts(&int));
        assert!(TypeTarget::integer().accepts(&int));
        assert!(!TypeTarget::floating().accepts(&int));
        assert!(!TypeTarget::numeric().accepts(&maybe_int));
        assert!(TypeTarget::numeric().nullable().accepts(&maybe_int));
        assert!(TypeTarget::text().accepts(&text));
        assert!(TypeTarget::from(DataType::Utf8).accepts(&text));
        assert!(!TypeTarget::exact(DataType::LargeUtf8).accepts(&text));

        assert!(TypeTarget::any().accepts(&maybe_int));
        assert!(TypeTarget::any().accepts(&frame));
        assert!(TypeTarget::frame().accepts(&frame));
        assert!(!TypeTarget::numeric().accepts(&frame));
        assert!(!TypeTarget::any().accepts(&group));
    }

    #[test]
    fn display() {
        assert_eq!(TypeTarget::numeric().to_string(), "numeric");
        assert_eq!(TypeTarget::numeric().nullable().to_string(), "numeric?");
        assert_eq!(TypeTarget::exact(DataType::Int64).to_string(), "Int64");
        assert_eq!(TypeTarget::any().to_string(), "any");
        assert_eq!(
            ColumnPredicate::name_contains("a").to_string(),
            "name contains \"a\""
        );
    }
}
