//! Cancellation of `-(-x)` and `!!x`.

use super::operator_promotion::ApplyOperatorPromotion;
use crate::errors::FoldResult;
use crate::fold::Fold;
use ferrule_ir::{Expr, ExprKind, UnaryOp};

/// Cancels a negation or logical not applied twice: `-(-x)` and `!!x` become `x`.
///
/// The remaining operand is cast to the promoted type of the inner operator,
/// so `-(-s)` with a `short` `s` becomes `(int) s`. Casts on the outer
/// operator move to the result. An inner operator that carries casts of its
/// own is left alone, since `-(int) -x` is not `x` for every `x`.
pub struct DeduplicateOperatorApplication {
    promotion: ApplyOperatorPromotion,
}

impl DeduplicateOperatorApplication {
    /// Creates the fold.
    pub fn new() -> Self {
        Self {
            promotion: ApplyOperatorPromotion::on_all_operands(),
        }
    }
}

impl Default for DeduplicateOperatorApplication {
    fn default() -> Self {
        Self::new()
    }
}

fn is_double_application(expr: &Expr) -> bool {
    let ExprKind::Unary { op, operand } = &expr.kind else {
        return false;
    };
    if !matches!(op, UnaryOp::Neg | UnaryOp::Not) || !operand.casts.is_empty() {
        return false;
    }
    matches!(&operand.kind, ExprKind::Unary { op: inner, .. } if inner == op)
}

impl Fold for DeduplicateOperatorApplication {
    fn fold_unary(&self, expr: Expr) -> FoldResult {
        if !is_double_application(&expr) {
            return Ok(expr);
        }
        let Expr { kind, ty, casts } = expr;
        let inner = match kind {
            ExprKind::Unary { operand, .. } => *operand,
            kind => return Ok(Expr { kind, ty, casts }),
        };
        let promoted = self.promotion.fold_unary(inner)?;
        let ExprKind::Unary { op, operand } = promoted.kind else {
            return Ok(promoted);
        };
        tracing::trace!(%op, "cancelled double operator");
        let mut result = *operand;
        result.casts.extend(casts);
        Ok(result)
    }
}
