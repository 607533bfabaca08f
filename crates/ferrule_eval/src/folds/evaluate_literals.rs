//! Evaluation of operators over literal operands.

use crate::casts::apply_casts;
use crate::chain::PromoteOperands;
use crate::errors::{FoldError, FoldResult};
use crate::evaluator::Evaluator;
use crate::fold::Fold;
use crate::numeric::{binary_promoted_type, cast_value, convert, infer_type, operand_type};
use ferrule_ir::{BinaryOp, Expr, ExprKind, PrimitiveType, Type, TypeCast, UnaryOp, Value};

/// Replaces operators whose operands are all literals by their value.
///
/// Operands are promoted first, so arithmetic happens in the promoted type
/// with Java's wrap-around and rounding. The result literal has the
/// operator's static type, and the operator's own casts are applied to it.
///
/// Integral division or remainder by zero, and unboxing a `null` constant,
/// abort evaluation with [`FoldError::Unevaluable`].
pub struct EvaluateLiteralOperations {
    promote: Evaluator<PromoteOperands>,
}

impl EvaluateLiteralOperations {
    /// Creates the fold.
    pub fn new() -> Self {
        Self {
            promote: Evaluator::new(PromoteOperands::on_literal_operands()),
        }
    }
}

impl Default for EvaluateLiteralOperations {
    fn default() -> Self {
        Self::new()
    }
}

impl Fold for EvaluateLiteralOperations {
    fn fold_binary(&self, expr: Expr) -> FoldResult {
        let all_literal = matches!(
            &expr.kind,
            ExprKind::Binary { lhs, rhs, .. } if lhs.is_literal() && rhs.is_literal()
        );
        if !all_literal {
            return Ok(expr);
        }
        let promoted = self.promote.evaluate_owned(expr.clone())?;
        let ExprKind::Binary { op, lhs, rhs } = &promoted.kind else {
            return Ok(expr);
        };
        let (Some(l), Some(r)) = (constant(lhs)?, constant(rhs)?) else {
            return Ok(expr);
        };
        let (Some(left_ty), Some(right_ty)) = (operand_type(lhs), operand_type(rhs)) else {
            return Ok(expr);
        };
        let Some(operation_ty) = binary_promoted_type(*op, &left_ty, &right_ty) else {
            return Ok(expr);
        };
        check_divisor(*op, &operation_ty, l, r)?;
        let Some(value) = compute_binary(*op, &operation_ty, l, r) else {
            return Ok(expr);
        };
        let Some(result_ty) = expr.ty.clone().or_else(|| infer_type(&promoted)) else {
            tracing::debug!(%op, "operator type unknown, not folding");
            return Ok(expr);
        };
        tracing::trace!(%l, %op, %r, result = %value, "folded binary operator");
        Ok(literal_result(value, result_ty, &expr.casts).unwrap_or(expr))
    }

    fn fold_unary(&self, expr: Expr) -> FoldResult {
        let literal_operand = matches!(
            &expr.kind,
            ExprKind::Unary { op, operand }
                if operand.is_literal() && !op.is_increment_or_decrement()
        );
        if !literal_operand {
            return Ok(expr);
        }
        let promoted = self.promote.evaluate_owned(expr.clone())?;
        let ExprKind::Unary { op, operand } = &promoted.kind else {
            return Ok(expr);
        };
        let Some(v) = constant(operand)? else {
            return Ok(expr);
        };
        let Some(value) = compute_unary(*op, v) else {
            return Ok(expr);
        };
        let Some(result_ty) = expr.ty.clone().or_else(|| infer_type(&promoted)) else {
            tracing::debug!(%op, "operator type unknown, not folding");
            return Ok(expr);
        };
        tracing::trace!(%op, operand = %v, result = %value, "folded unary operator");
        Ok(literal_result(value, result_ty, &expr.casts).unwrap_or(expr))
    }
}

/// The value of a literal whose casts have all been applied.
///
/// A `null` literal still waiting for a primitive cast is an unboxing of
/// `null`, which has no value.
fn constant(expr: &Expr) -> Result<Option<&Value>, FoldError> {
    let Some(value) = expr.as_literal() else {
        return Ok(None);
    };
    match expr.casts.first() {
        None => Ok(Some(value)),
        Some(TypeCast {
            target: Type::Primitive(p),
            ..
        }) if *value == Value::Null => {
            tracing::debug!("unboxing a null constant");
            Err(FoldError::unevaluable(
                format!("({}) null", p.keyword()),
                "null cannot be unboxed",
            ))
        }
        Some(_) => Ok(None),
    }
}

fn check_divisor(op: BinaryOp, ty: &Type, l: &Value, r: &Value) -> Result<(), FoldError> {
    if matches!(op, BinaryOp::Div | BinaryOp::Mod) && ty.is_integral() && r.is_zero() {
        tracing::debug!(%l, %op, %r, "integral division by zero");
        return Err(FoldError::unevaluable(
            format!("{l} {op} {r}"),
            "division by zero",
        ));
    }
    Ok(())
}

fn literal_result(value: Value, ty: Type, casts: &[TypeCast]) -> Option<Expr> {
    let value = cast_value(&value, &ty)?;
    Some(apply_casts(Expr {
        kind: ExprKind::Literal(value),
        ty: Some(ty),
        casts: casts.to_vec(),
    }))
}

fn compute_binary(op: BinaryOp, ty: &Type, l: &Value, r: &Value) -> Option<Value> {
    match op {
        BinaryOp::And => Some(Value::Bool(l.as_bool()? && r.as_bool()?)),
        BinaryOp::Or => Some(Value::Bool(l.as_bool()? || r.as_bool()?)),
        BinaryOp::Eq => equals(ty, l, r).map(Value::Bool),
        BinaryOp::Ne => equals(ty, l, r).map(|eq| Value::Bool(!eq)),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            relational(op, ty, l, r).map(Value::Bool)
        }
        BinaryOp::Shl | BinaryOp::Shr | BinaryOp::Ushr => shift(op, l, r),
        BinaryOp::InstanceOf => None,
        BinaryOp::Plus if *ty == Type::String => {
            Some(Value::String(l.to_java_string() + &r.to_java_string()))
        }
        BinaryOp::Plus
        | BinaryOp::Minus
        | BinaryOp::Mul
        | BinaryOp::Div
        | BinaryOp::Mod
        | BinaryOp::BitAnd
        | BinaryOp::BitOr
        | BinaryOp::BitXor => arithmetic(op, ty.as_primitive()?, l, r),
    }
}

/// `==` on constants. A `null` operand is only equal to `null`.
fn equals(ty: &Type, l: &Value, r: &Value) -> Option<bool> {
    match (l, r) {
        (Value::Null, _) => Some(*r == Value::Null),
        (_, Value::Null) => Some(false),
        _ if ty.is_integral() => Some(l.as_i64()? == r.as_i64()?),
        _ if ty.is_floating() => Some(l.as_f64()? == r.as_f64()?),
        _ if ty.is_boolean() => Some(l.as_bool()? == r.as_bool()?),
        _ => Some(l == r),
    }
}

fn relational(op: BinaryOp, ty: &Type, l: &Value, r: &Value) -> Option<bool> {
    fn holds<T: PartialOrd>(op: BinaryOp, a: T, b: T) -> bool {
        match op {
            BinaryOp::Lt => a < b,
            BinaryOp::Le => a <= b,
            BinaryOp::Gt => a > b,
            _ => a >= b,
        }
    }
    if ty.is_integral() {
        Some(holds(op, l.as_i64()?, r.as_i64()?))
    } else if ty.is_floating() {
        Some(holds(op, l.as_f64()?, r.as_f64()?))
    } else {
        None
    }
}

/// Shifts use only the low five (`int`) or six (`long`) bits of the distance.
fn shift(op: BinaryOp, l: &Value, r: &Value) -> Option<Value> {
    let distance = r.as_i64()? as u32;
    match *l {
        Value::Int(a) => Some(Value::Int(match op {
            BinaryOp::Shl => a.wrapping_shl(distance),
            BinaryOp::Shr => a.wrapping_shr(distance),
            _ => (a as u32).wrapping_shr(distance) as i32,
        })),
        Value::Long(a) => Some(Value::Long(match op {
            BinaryOp::Shl => a.wrapping_shl(distance),
            BinaryOp::Shr => a.wrapping_shr(distance),
            _ => (a as u64).wrapping_shr(distance) as i64,
        })),
        _ => None,
    }
}

fn arithmetic(op: BinaryOp, ty: PrimitiveType, l: &Value, r: &Value) -> Option<Value> {
    if ty == PrimitiveType::Boolean {
        let (a, b) = (l.as_bool()?, r.as_bool()?);
        return match op {
            BinaryOp::BitAnd => Some(Value::Bool(a & b)),
            BinaryOp::BitOr => Some(Value::Bool(a | b)),
            BinaryOp::BitXor => Some(Value::Bool(a ^ b)),
            _ => None,
        };
    }
    if ty.is_integral() {
        let (a, b) = (l.as_i64()?, r.as_i64()?);
        let v = match op {
            BinaryOp::Plus => a.wrapping_add(b),
            BinaryOp::Minus => a.wrapping_sub(b),
            BinaryOp::Mul => a.wrapping_mul(b),
            BinaryOp::Div | BinaryOp::Mod if b == 0 => return None,
            BinaryOp::Div => a.wrapping_div(b),
            BinaryOp::Mod => a.wrapping_rem(b),
            BinaryOp::BitAnd => a & b,
            BinaryOp::BitOr => a | b,
            BinaryOp::BitXor => a ^ b,
            _ => return None,
        };
        return convert(&Value::Long(v), ty);
    }
    let (a, b) = (l.as_f64()?, r.as_f64()?);
    let v = match op {
        BinaryOp::Plus => a + b,
        BinaryOp::Minus => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Mod => a % b,
        _ => return None,
    };
    convert(&Value::Double(v), ty)
}

fn compute_unary(op: UnaryOp, value: &Value) -> Option<Value> {
    Some(match (op, value) {
        (UnaryOp::Not, Value::Bool(b)) => Value::Bool(!b),
        (UnaryOp::Pos, Value::Int(_) | Value::Long(_) | Value::Float(_) | Value::Double(_)) => {
            value.clone()
        }
        (UnaryOp::Neg, Value::Int(i)) => Value::Int(i.wrapping_neg()),
        (UnaryOp::Neg, Value::Long(l)) => Value::Long(l.wrapping_neg()),
        (UnaryOp::Neg, Value::Float(f)) => Value::Float(-f),
        (UnaryOp::Neg, Value::Double(d)) => Value::Double(-d),
        (UnaryOp::Compl, Value::Int(i)) => Value::Int(!i),
        (UnaryOp::Compl, Value::Long(l)) => Value::Long(!l),
        _ => return None,
    })
}
