//! Shared foundational types used across the ferrule linter.
//!
//! Currently this is the identifier interner: variable names, method names,
//! and class names in the expression model are interned once and compared
//! as plain integers afterwards.

#![warn(missing_docs)]

pub mod ident;

pub use ident::{Ident, Interner};
