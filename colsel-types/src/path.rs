//! Column paths.

use std::fmt;

/// Ordered sequence of column names identifying a node from some root.
///
/// Two paths are equal iff their name sequences are equal element-wise. Paths
/// are the only identity used for deduplication and exclusion matching, so
/// everything that compares columns compares paths.
///
/// # Root
///
/// The empty path designates the root scope of a schema. It is never attached
/// to a resolved column: every column produced by resolution has at least one
/// segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnPath(Vec<String>);

impl ColumnPath {
    /// Build a path from its segments.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// The empty path, addressing the root scope.
    #[inline]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Segments of this path, outermost first.
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Last segment, i.e. the column's own name. `None` for the root path.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Path of the enclosing node. `None` for the root path.
    pub fn parent(&self) -> Option<ColumnPath> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    /// Extend this path by one segment.
    pub fn child(&self, name: impl Into<String>) -> ColumnPath {
        let mut names = Vec::with_capacity(self.0.len() + 1);
        names.extend(self.0.iter().cloned());
        names.push(name.into());
        Self(names)
    }

    /// Append every segment of `other` to this path.
    pub fn join(&self, other: &ColumnPath) -> ColumnPath {
        let mut names = Vec::with_capacity(self.0.len() + other.0.len());
        names.extend(self.0.iter().cloned());
        names.extend(other.0.iter().cloned());
        Self(names)
    }

    /// Returns `true` when `prefix` is equal to, or an ancestor of, this path.
    ///
    /// The root path is a prefix of every path.
    #[inline]
    pub fn starts_with(&self, prefix: &ColumnPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Returns `true` when this path lies strictly below `ancestor`.
    #[inline]
    pub fn is_strict_descendant_of(&self, ancestor: &ColumnPath) -> bool {
        self.0.len() > ancestor.0.len() && self.starts_with(ancestor)
    }

    /// Remove `prefix` from the front of this path, re-basing it onto `prefix`.
    pub fn strip_prefix(&self, prefix: &ColumnPath) -> Option<ColumnPath> {
        self.0
            .strip_prefix(prefix.0.as_slice())
            .map(|rest| Self(rest.to_vec()))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl fmt::Display for ColumnPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

impl From<&str> for ColumnPath {
    fn from(name: &str) -> Self {
        Self(vec![name.to_string()])
    }
}

impl From<String> for ColumnPath {
    fn from(name: String) -> Self {
        Self(vec![name])
    }
}

impl From<&String> for ColumnPath {
    fn from(name: &String) -> Self {
        Self(vec![name.clone()])
    }
}

impl From<Vec<String>> for ColumnPath {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<&[&str]> for ColumnPath {
    fn from(names: &[&str]) -> Self {
        Self::new(names.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for ColumnPath {
    fn from(names: [&str; N]) -> Self {
        Self::new(names)
    }
}

impl From<&ColumnPath> for ColumnPath {
    fn from(path: &ColumnPath) -> Self {
        path.clone()
    }
}

impl<'a> IntoIterator for &'a ColumnPath {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_segments_with_dots() {
        assert_eq!(ColumnPath::from(["g", "x"]).to_string(), "g.x");
        assert_eq!(ColumnPath::from("a").to_string(), "a");
        assert_eq!(ColumnPath::root().to_string(), "<root>");
    }

    #[test]
    fn child_and_parent_are_inverse() {
        let g = ColumnPath::from("g");
        let gx = g.child("x");
        assert_eq!(gx, ColumnPath::from(["g", "x"]));
        assert_eq!(gx.parent(), Some(g.clone()));
        assert_eq!(g.parent(), Some(ColumnPath::root()));
        assert_eq!(ColumnPath::root().parent(), None);
        assert_eq!(gx.name(), Some("x"));
    }

    #[test]
    fn prefix_relations() {
        let g = ColumnPath::from("g");
        let gx = ColumnPath::from(["g", "x"]);
        let gxy = ColumnPath::from(["g", "x", "y"]);

        assert!(gx.starts_with(&g));
        assert!(gx.starts_with(&gx));
        assert!(gx.starts_with(&ColumnPath::root()));
        assert!(!g.starts_with(&gx));

        assert!(gxy.is_strict_descendant_of(&g));
        assert!(!gx.is_strict_descendant_of(&gx));
        assert!(!ColumnPath::from("gg").is_strict_descendant_of(&g));

        assert_eq!(gxy.strip_prefix(&g), Some(ColumnPath::from(["x", "y"])));
        assert_eq!(gx.strip_prefix(&gx), Some(ColumnPath::root()));
        assert_eq!(g.strip_prefix(&gx), None);
        assert_eq!(g.join(&ColumnPath::from(["x", "y"])), gxy);
    }

    #[test]
    fn equality_is_element_wise() {
        assert_eq!(
            ColumnPath::new(vec!["a".to_string(), "b".to_string()]),
            ColumnPath::from(["a", "b"])
        );
        // A dotted name is a single segment, not two.
        assert_ne!(ColumnPath::from("a.b"), ColumnPath::from(["a", "b"]));
    }
}
