//! Error type of the folding engine.

use ferrule_ir::Expr;

/// The result of running a fold hook on a node.
pub type FoldResult = Result<Expr, FoldError>;

/// A failure that aborts evaluation of an expression.
///
/// A fold whose precondition does not hold is not an error; it returns the
/// node unchanged. This type is reserved for constant expressions that are
/// well-formed but have no value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FoldError {
    /// A fully literal expression cannot be evaluated, e.g. integral division by zero.
    #[error("constant expression `{expression}` cannot be evaluated: {reason}")]
    Unevaluable {
        /// The evaluated operation, with operand values substituted.
        expression: String,
        /// Why evaluation failed.
        reason: String,
    },
}

impl FoldError {
    /// Creates an [`FoldError::Unevaluable`] error.
    pub fn unevaluable(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        FoldError::Unevaluable {
            expression: expression.into(),
            reason: reason.into(),
        }
    }
}
