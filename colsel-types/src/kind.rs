//! Column kinds.

use std::fmt;
use std::ops::BitOr;

/// Structural category of a schema node.
///
/// This is a simple, C-like enum that is cheap to store and copy. Its only
/// purpose is to label which variant of a column node is being talked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Leaf holding plain values.
    Value,
    /// Named node with ordered children.
    Group,
    /// Leaf holding a nested data frame per row.
    Frame,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Value => "value",
            ColumnKind::Group => "group",
            ColumnKind::Frame => "frame",
        }
    }

    #[inline]
    fn bit(self) -> u8 {
        match self {
            ColumnKind::Value => 0b001,
            ColumnKind::Group => 0b010,
            ColumnKind::Frame => 0b100,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of [`ColumnKind`]s, stored as a bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ColumnKindSet(u8);

impl ColumnKindSet {
    pub const EMPTY: ColumnKindSet = ColumnKindSet(0);
    pub const VALUE: ColumnKindSet = ColumnKindSet(0b001);
    pub const GROUP: ColumnKindSet = ColumnKindSet(0b010);
    pub const FRAME: ColumnKindSet = ColumnKindSet(0b100);
    pub const ALL: ColumnKindSet = ColumnKindSet(0b111);

    #[inline]
    pub fn contains(&self, kind: ColumnKind) -> bool {
        self.0 & kind.bit() != 0
    }

    #[inline]
    pub fn with(self, kind: ColumnKind) -> Self {
        Self(self.0 | kind.bit())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Kinds in this set, in `Value`, `Group`, `Frame` order.
    pub fn kinds(&self) -> impl Iterator<Item = ColumnKind> + '_ {
        [ColumnKind::Value, ColumnKind::Group, ColumnKind::Frame]
            .into_iter()
            .filter(|k| self.contains(*k))
    }
}

impl From<ColumnKind> for ColumnKindSet {
    fn from(kind: ColumnKind) -> Self {
        Self(kind.bit())
    }
}

impl FromIterator<ColumnKind> for ColumnKindSet {
    fn from_iter<T: IntoIterator<Item = ColumnKind>>(iter: T) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl BitOr for ColumnKindSet {
    type Output = ColumnKindSet;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<ColumnKind> for ColumnKindSet {
    type Output = ColumnKindSet;

    fn bitor(self, rhs: ColumnKind) -> Self::Output {
        self.with(rhs)
    }
}

impl fmt::Display for ColumnKindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, kind) in self.kinds().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(kind.as_str())?;
        }
        f.write_str("}")
    }
}
