//! Explicit numeric promotion of operands.

use crate::casts::cast_expression;
use crate::errors::FoldResult;
use crate::fold::Fold;
use crate::numeric::{binary_promoted_type, operand_type, shift_operand_types, unary_promoted_type};
use ferrule_ir::{BinaryOp, Expr, ExprKind, Type, Value};

/// Decides whether an operand of an operator node gets a promotion cast.
/// Called with the operator node and the operand.
pub type OperandPredicate = Box<dyn Fn(&Expr, &Expr) -> bool + Send + Sync>;

/// Promotes literal operands only.
pub fn literal_operand() -> OperandPredicate {
    Box::new(|_, operand| operand.is_literal())
}

/// Promotes every operand.
pub fn any_operand() -> OperandPredicate {
    Box::new(|_, _| true)
}

/// Makes numeric promotion explicit by casting operands to their promoted type.
///
/// `'b' + 1L` becomes `(long) 'b' + 1L`. Shift operands are promoted on their
/// own; `instanceof`, increments, and decrements are left alone, as are
/// operators whose promoted type is not primitive (string concatenation,
/// reference equality).
///
/// Promotion happens in [`enter`](Fold::enter), before the operands are
/// visited, so that a following [`ApplyCasts`](super::ApplyCasts) in the same
/// traversal converts the cast literal operands.
pub struct ApplyOperatorPromotion {
    binary: OperandPredicate,
    unary: OperandPredicate,
}

impl ApplyOperatorPromotion {
    /// Creates the fold with the predicates for binary and unary operands.
    pub fn new(binary: OperandPredicate, unary: OperandPredicate) -> Self {
        Self { binary, unary }
    }

    /// Promotes literal operands of every operator.
    pub fn on_literal_operands() -> Self {
        Self::new(literal_operand(), literal_operand())
    }

    /// Promotes every operand of every operator.
    pub fn on_all_operands() -> Self {
        Self::new(any_operand(), any_operand())
    }
}

impl Default for ApplyOperatorPromotion {
    fn default() -> Self {
        Self::on_literal_operands()
    }
}

fn promote(slot: &mut Expr, ty: &Type) {
    let operand = std::mem::replace(slot, Expr::literal(Value::Null));
    *slot = cast_expression(ty, operand);
}

fn binary_targets(op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Option<(Type, Type)> {
    let left = operand_type(lhs)?;
    let right = operand_type(rhs)?;
    if op.is_shift() {
        return shift_operand_types(&left, &right);
    }
    let promoted = binary_promoted_type(op, &left, &right).filter(Type::is_primitive)?;
    Some((promoted.clone(), promoted))
}

impl Fold for ApplyOperatorPromotion {
    fn enter(&self, expr: Expr) -> FoldResult {
        self.fold(expr)
    }

    fn exit(&self, expr: Expr) -> FoldResult {
        Ok(expr)
    }

    fn fold_binary(&self, mut expr: Expr) -> FoldResult {
        let (targets, promote_lhs, promote_rhs) = match &expr.kind {
            ExprKind::Binary { op, lhs, rhs } if *op != BinaryOp::InstanceOf => (
                binary_targets(*op, lhs, rhs),
                (self.binary)(&expr, lhs),
                (self.binary)(&expr, rhs),
            ),
            _ => return Ok(expr),
        };
        let Some((left_ty, right_ty)) = targets else {
            tracing::debug!("no promoted type for binary operands");
            return Ok(expr);
        };
        if let ExprKind::Binary { lhs, rhs, .. } = &mut expr.kind {
            if promote_lhs {
                promote(lhs, &left_ty);
            }
            if promote_rhs {
                promote(rhs, &right_ty);
            }
        }
        Ok(expr)
    }

    fn fold_unary(&self, mut expr: Expr) -> FoldResult {
        let (target, apply) = match &expr.kind {
            ExprKind::Unary { op, operand } if !op.is_increment_or_decrement() => (
                unary_promoted_type(*op, operand).filter(Type::is_primitive),
                (self.unary)(&expr, operand),
            ),
            _ => return Ok(expr),
        };
        if let (Some(ty), true, ExprKind::Unary { operand, .. }) = (target, apply, &mut expr.kind) {
            promote(operand, &ty);
        }
        Ok(expr)
    }
}
