//! Identity laws for operators with one literal operand.

use crate::casts::apply_casts;
use crate::chain::PromoteOperands;
use crate::errors::FoldResult;
use crate::evaluator::Evaluator;
use crate::fold::Fold;
use crate::numeric::{binary_promoted_type, operand_type};
use ferrule_ir::{BinaryOp, Expr, ExprKind, Type, Value};

/// Simplifies binary operators with one literal operand by algebraic identities.
///
/// | expression       | result  | condition                                   |
/// |------------------|---------|---------------------------------------------|
/// | `true && x`      | `x`     |                                             |
/// | `false && x`     | `false` | `x && false` only if `x` is pure            |
/// | `true \|\| x`    | `true`  | `x \|\| true` only if `x` is pure           |
/// | `false \|\| x`   | `x`     |                                             |
/// | `x == true`      | `x`     |                                             |
/// | `x / 1`          | `x`     | literal on the right                        |
/// | `0 + x`          | `x`     | integral                                    |
/// | `x * 1`          | `x`     |                                             |
/// | `x * 0`          | `0`     | integral, `x` is pure                       |
/// | `x - 0`          | `x`     | literal on the right; `+0.0` for floating   |
///
/// Each law holds for every value of the promoted type: `x * 0` is `NaN` for
/// a `NaN` float, and `-0.0 + 0.0` is `0.0`. Operands are promoted before the
/// laws are checked, so the remaining operand keeps the operator's type.
/// An operand is only dropped if it is [pure](Expr::is_pure): it neither
/// calls a method nor can throw, as `a / b` or an unboxed `Integer` can.
pub struct EvaluatePartialLiteralOperations {
    promote: Evaluator<PromoteOperands>,
}

impl EvaluatePartialLiteralOperations {
    /// Creates the fold.
    pub fn new() -> Self {
        Self {
            promote: Evaluator::new(PromoteOperands::on_all_operands()),
        }
    }
}

impl Default for EvaluatePartialLiteralOperations {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

fn constant(expr: &Expr) -> Option<&Value> {
    if expr.casts.is_empty() {
        expr.as_literal()
    } else {
        None
    }
}

fn is_positive_zero(value: &Value) -> bool {
    match *value {
        Value::Float(f) => f.to_bits() == 0,
        Value::Double(d) => d.to_bits() == 0,
        _ => false,
    }
}

/// Which operand an identity law reduces `literal op other` (or
/// `other op literal`) to, with the literal on `side`.
fn surviving_operand(
    op: BinaryOp,
    ty: &Type,
    value: &Value,
    side: Side,
    other: &Expr,
) -> Option<Side> {
    // the right operand of && and || is only evaluated when the left one does not decide
    let droppable = side == Side::Left || other.is_pure();
    match op {
        BinaryOp::And => match value.as_bool()? {
            true => Some(side.other()),
            false => droppable.then_some(side),
        },
        BinaryOp::Or => match value.as_bool()? {
            true => droppable.then_some(side),
            false => Some(side.other()),
        },
        BinaryOp::Eq => {
            (*ty == Type::BOOLEAN && *value == Value::Bool(true)).then_some(side.other())
        }
        BinaryOp::Div => (side == Side::Right && value.is_one()).then_some(side.other()),
        BinaryOp::Plus => (ty.is_integral() && value.is_zero()).then_some(side.other()),
        BinaryOp::Mul if value.is_one() => Some(side.other()),
        BinaryOp::Mul => {
            (ty.is_integral() && value.is_zero() && other.is_pure()).then_some(side)
        }
        BinaryOp::Minus => {
            let zero = if ty.is_integral() {
                value.is_zero()
            } else {
                is_positive_zero(value)
            };
            (side == Side::Right && zero).then_some(side.other())
        }
        _ => None,
    }
}

fn applicable_law(expr: &Expr) -> Option<Side> {
    let ExprKind::Binary { op, lhs, rhs } = &expr.kind else {
        return None;
    };
    let ty = binary_promoted_type(*op, &operand_type(lhs)?, &operand_type(rhs)?)?;
    if let Some(value) = constant(lhs) {
        if let Some(side) = surviving_operand(*op, &ty, value, Side::Left, rhs) {
            return Some(side);
        }
    }
    let value = constant(rhs)?;
    surviving_operand(*op, &ty, value, Side::Right, lhs)
}

impl Fold for EvaluatePartialLiteralOperations {
    fn fold_binary(&self, expr: Expr) -> FoldResult {
        let has_literal = matches!(
            &expr.kind,
            ExprKind::Binary { lhs, rhs, .. } if lhs.is_literal() || rhs.is_literal()
        );
        if !has_literal {
            return Ok(expr);
        }
        let promoted = self.promote.evaluate(&expr)?;
        let Some(side) = applicable_law(&promoted) else {
            return Ok(expr);
        };
        let Expr { kind, casts, .. } = promoted;
        let ExprKind::Binary { op, lhs, rhs } = kind else {
            return Ok(expr);
        };
        tracing::trace!(%op, ?side, "applied identity law");
        let mut survivor = match side {
            Side::Left => *lhs,
            Side::Right => *rhs,
        };
        survivor.casts.extend(casts);
        Ok(apply_casts(survivor))
    }
}

/// Swaps the operands of a binary operator, if that keeps its value.
///
/// Relational operators are mirrored (`a < b` becomes `b > a`). Returns
/// `None` for operators without a mirror image (`a - 1` is not `1 - a`),
/// for string concatenation, and when the new evaluation order could be
/// observed: one operand must be pure, and both for `&&` and `||`. Other
/// nodes give `None` as well.
pub fn swap_operands(expr: Expr) -> Option<Expr> {
    let Expr { kind, ty, casts } = expr;
    let ExprKind::Binary { op, lhs, rhs } = kind else {
        return None;
    };
    let mirrored = op.mirrored()?;
    if op == BinaryOp::Plus && ty.as_ref().map_or(true, |ty| *ty == Type::String) {
        return None;
    }
    let reorderable = match op {
        BinaryOp::And | BinaryOp::Or => lhs.is_pure() && rhs.is_pure(),
        _ => lhs.is_pure() || rhs.is_pure(),
    };
    if !reorderable {
        return None;
    }
    Some(Expr {
        kind: ExprKind::Binary {
            op: mirrored,
            lhs: rhs,
            rhs: lhs,
        },
        ty,
        casts,
    })
}
