pub mod dsl;
pub mod format;
pub mod predicate;
pub mod selector;

pub use selector::*;

// Note: For API simplicity the builder entry points are also exported here.
pub use dsl::*;
pub use predicate::{ColumnPredicate, TypeClass, TypeTarget};
