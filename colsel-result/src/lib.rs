//! Error types and result definitions for colsel.
//!
//! This crate provides the unified error type ([`Error`]) and result type
//! alias ([`Result<T>`]) used throughout all colsel crates. All operations that
//! could fail return `Result<T>`, where the error variant describes what went
//! wrong.
//!
//! # Error Categories
//!
//! - **Lookup failures** ([`Error::UnresolvedColumn`]): references to columns
//!   that do not exist in any legal scope
//! - **Cardinality guards** ([`Error::EmptySelection`], [`Error::MultipleMatches`])
//! - **Shape errors** ([`Error::NotAColumnGroup`], [`Error::DuplicateColumn`])
//! - **User input errors** ([`Error::InvalidArgumentError`])
//! - **Internal errors** ([`Error::Internal`]): bugs or unexpected states

pub mod error;
pub mod result;

pub use error::{Cardinality, Error};
pub use result::Result;
