//! Expression normalization and constant folding for Java expressions.
//!
//! A [`Fold`] is one rewrite strategy; an [`Evaluator`] walks an expression
//! tree and runs a fold at every node, children first. Folds compose with
//! [`Chain`], and [`build_evaluator`] assembles the chain described by a
//! `ferrule.toml`.
//!
//! Folding never changes the value an expression computes, only its form:
//!
//! - literal operands are promoted and evaluated with Java's wrap-around,
//!   rounding, and shift semantics
//! - algebraic identities remove operators where they hold for every value
//! - repeated boolean operands are absorbed, if configured
//! - constant variables are inlined
//! - redundant casts are dropped
//!
//! A fold that does not apply returns its input. The only error is
//! [`FoldError::Unevaluable`], raised for constant expressions without a
//! value such as `1 / 0`.
//!
//! # Usage
//!
//! ```ignore
//! let evaluator = default_evaluator(&declarations);
//! let simplified = evaluator.evaluate_or_keep(&expr);
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod casts;
pub mod chain;
pub mod errors;
pub mod evaluator;
pub mod fold;
pub mod folds;
pub mod numeric;

pub use builder::{build_evaluator, default_chain, default_evaluator, resolve_constant};
pub use casts::{apply_casts, cast_expression, cast_literal, remove_redundant_casts};
pub use chain::{chain, Chain, PromoteOperands};
pub use errors::{FoldError, FoldResult};
pub use evaluator::Evaluator;
pub use fold::Fold;
pub use folds::{
    any_operand, literal_operand, swap_operands, ApplyAbsorptionLaw, ApplyCasts,
    ApplyOperatorPromotion,
    DeduplicateOperatorApplication, EvaluateLiteralOperations, EvaluatePartialLiteralOperations,
    InferOperatorTypes, InlineVariableRead, LiteralPredicate, OperandPredicate,
    RemoveRedundantCasts,
};
pub use numeric::infer_type;
