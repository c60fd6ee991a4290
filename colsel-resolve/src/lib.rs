//! Selector resolution.
//!
//! Turns a [`Selector`](colsel_expr::Selector) into an ordered list of
//! [`ResolvedColumn`](colsel_schema::ResolvedColumn)s against a schema and a
//! [`ResolutionContext`]. Resolution is pure: the same selector, schema and
//! context always produce the same result.

pub mod context;
pub mod evaluator;
mod exclusion;
mod guards;
pub mod traversal;

pub use context::{ColumnsRenderer, PathListRenderer, ResolutionContext, Scope, UnresolvedPolicy};
pub use evaluator::{Resolution, resolve, resolve_detailed, resolve_in};
pub use traversal::{TraversalOptions, traverse_preorder};
