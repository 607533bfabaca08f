//! The individual rewrite strategies.

mod absorption;
mod apply_casts;
mod deduplicate;
mod evaluate_literals;
mod evaluate_partial;
mod infer_types;
mod inline_variable;
mod operator_promotion;
mod redundant_casts;

pub use absorption::ApplyAbsorptionLaw;
pub use apply_casts::{ApplyCasts, LiteralPredicate};
pub use deduplicate::DeduplicateOperatorApplication;
pub use evaluate_literals::EvaluateLiteralOperations;
pub use evaluate_partial::{swap_operands, EvaluatePartialLiteralOperations};
pub use infer_types::InferOperatorTypes;
pub use inline_variable::InlineVariableRead;
pub use operator_promotion::{
    any_operand, literal_operand, ApplyOperatorPromotion, OperandPredicate,
};
pub use redundant_casts::RemoveRedundantCasts;
