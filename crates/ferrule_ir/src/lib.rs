//! Expression model consumed by the ferrule folding engine.
//!
//! This crate defines the typed expression tree ([`Expr`]), the Java-like type
//! system it is typed in ([`Type`]), constant [`Value`]s, variable
//! [`Declaration`]s, and the [`SemanticModel`] interface through which folds
//! query declarations. Parsing and symbol resolution happen elsewhere; the
//! caller builds expressions and a [`DeclarationTable`] and hands them over.

#![warn(missing_docs)]

pub mod decl;
pub mod expr;
pub mod ids;
pub mod java_fmt;
pub mod print;
pub mod types;
pub mod value;

pub use decl::{DeclKind, Declaration, DeclarationTable, SemanticModel};
pub use expr::{BinaryOp, Expr, ExprKind, NodeKind, TypeCast, UnaryOp};
pub use ids::VarId;
pub use print::{DisplayExpr, DisplayType};
pub use types::{PrimitiveType, Type};
pub use value::Value;
