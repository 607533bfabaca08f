//! Numeric conversions and operator promotion.
//!
//! Conversions follow Java casting conversion exactly: integral narrowing
//! keeps the low-order bits, floating to integral rounds toward zero and
//! saturates (NaN becomes zero), and floating to `byte`/`short`/`char` goes
//! through `int` first. Promotion follows the binary and unary numeric
//! promotion rules of the Java language.

use ferrule_ir::{BinaryOp, Expr, ExprKind, PrimitiveType, Type, UnaryOp, Value};

/// Converts a constant to a primitive type.
///
/// Returns `None` when no casting conversion exists, e.g. from `boolean` to
/// `int` or from a string to any primitive.
pub fn convert(value: &Value, target: PrimitiveType) -> Option<Value> {
    if target == PrimitiveType::Boolean {
        return value.as_bool().map(Value::Bool);
    }
    match value {
        Value::Float(_) | Value::Double(_) => {
            let d = value.as_f64()?;
            Some(match target {
                PrimitiveType::Byte => Value::Byte(d as i32 as i8),
                PrimitiveType::Short => Value::Short(d as i32 as i16),
                PrimitiveType::Char => Value::Char(d as i32 as u16),
                PrimitiveType::Int => Value::Int(d as i32),
                PrimitiveType::Long => Value::Long(d as i64),
                PrimitiveType::Float => match *value {
                    Value::Float(f) => Value::Float(f),
                    _ => Value::Float(d as f32),
                },
                PrimitiveType::Double => Value::Double(d),
                PrimitiveType::Boolean => return None,
            })
        }
        _ => {
            let i = value.as_i64()?;
            Some(match target {
                PrimitiveType::Byte => Value::Byte(i as i8),
                PrimitiveType::Short => Value::Short(i as i16),
                PrimitiveType::Char => Value::Char(i as u16),
                PrimitiveType::Int => Value::Int(i as i32),
                PrimitiveType::Long => Value::Long(i),
                PrimitiveType::Float => Value::Float(i as f32),
                PrimitiveType::Double => Value::Double(i as f64),
                PrimitiveType::Boolean => return None,
            })
        }
    }
}

/// Converts a constant to an arbitrary cast target.
///
/// Primitive and boxed targets convert the value; `null` converts to any
/// reference type; strings convert to `String` and `Object`.
pub fn cast_value(value: &Value, target: &Type) -> Option<Value> {
    match (value, target) {
        (Value::Null, Type::Primitive(_)) => None,
        (Value::Null, _) => Some(Value::Null),
        (_, Type::Primitive(p)) | (_, Type::Boxed(p)) => convert(value, *p),
        (Value::String(_), Type::String | Type::Object) => Some(value.clone()),
        (_, Type::Object) => Some(value.clone()),
        _ => None,
    }
}

/// Unary numeric promotion: `byte`, `short`, and `char` become `int`;
/// boxed types are unboxed; non-numeric types have no promotion.
pub fn unary_numeric_promotion(ty: &Type) -> Option<Type> {
    let p = ty.unboxed_primitive().filter(|p| p.is_numeric())?;
    Some(match p {
        PrimitiveType::Byte | PrimitiveType::Short | PrimitiveType::Char => Type::INT,
        other => Type::Primitive(other),
    })
}

/// Binary numeric promotion: both operands are unboxed and widened to the
/// wider of `int`, `long`, `float`, and `double`.
pub fn binary_numeric_promotion(left: &Type, right: &Type) -> Option<Type> {
    let l = left.unboxed_primitive().filter(|p| p.is_numeric())?;
    let r = right.unboxed_primitive().filter(|p| p.is_numeric())?;
    let either = |p: PrimitiveType| l == p || r == p;
    Some(if either(PrimitiveType::Double) {
        Type::DOUBLE
    } else if either(PrimitiveType::Float) {
        Type::FLOAT
    } else if either(PrimitiveType::Long) {
        Type::LONG
    } else {
        Type::INT
    })
}

/// Returns the type both operands of `op` are converted to before it is applied.
///
/// For shifts this is the promoted type of the left operand (each operand is
/// promoted on its own, see [`shift_operand_types`]). For `+` with a string
/// operand it is `String`. Returns `None` for `instanceof` and for operand
/// types the operator is not defined on.
pub fn binary_promoted_type(op: BinaryOp, left: &Type, right: &Type) -> Option<Type> {
    match op {
        BinaryOp::And | BinaryOp::Or => {
            (left.is_boolean() && right.is_boolean()).then_some(Type::BOOLEAN)
        }
        BinaryOp::Shl | BinaryOp::Shr | BinaryOp::Ushr => {
            shift_operand_types(left, right).map(|(l, _)| l)
        }
        BinaryOp::InstanceOf => None,
        BinaryOp::Eq | BinaryOp::Ne => equality_promoted_type(left, right),
        BinaryOp::Lt
        | BinaryOp::Le
        | BinaryOp::Gt
        | BinaryOp::Ge
        | BinaryOp::Mul
        | BinaryOp::Div
        | BinaryOp::Mod
        | BinaryOp::Minus => binary_numeric_promotion(left, right),
        BinaryOp::Plus => binary_numeric_promotion(left, right).or_else(|| {
            (*left == Type::String || *right == Type::String).then_some(Type::String)
        }),
        BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => {
            if left.is_floating() || right.is_floating() {
                None
            } else if left.is_boolean() && right.is_boolean() {
                Some(Type::BOOLEAN)
            } else {
                binary_numeric_promotion(left, right)
            }
        }
    }
}

/// Promoted types of the two shift operands, each promoted on its own.
/// Both must be integral after promotion.
pub fn shift_operand_types(left: &Type, right: &Type) -> Option<(Type, Type)> {
    let l = unary_numeric_promotion(left).filter(Type::is_integral)?;
    let r = unary_numeric_promotion(right).filter(Type::is_integral)?;
    Some((l, r))
}

fn equality_promoted_type(left: &Type, right: &Type) -> Option<Type> {
    // two boxed operands compare references, not values
    if left.is_boxed() && right.is_boxed() {
        return None;
    }
    if let Some(ty) = binary_numeric_promotion(left, right) {
        return Some(ty);
    }
    if left.is_boolean() && right.is_boolean() {
        return Some(Type::BOOLEAN);
    }
    let (l, r) = (left.unbox(), right.unbox());
    if l.is_primitive() || r.is_primitive() {
        return None;
    }
    if l == Type::Null {
        Some(r)
    } else if r == Type::Null || r.is_subtype_of(&l) {
        Some(l)
    } else if l.is_subtype_of(&r) {
        Some(r)
    } else {
        None
    }
}

/// Returns the type the operand of `op` is converted to before it is applied.
///
/// Increment and decrement keep the operand type and are only defined on
/// numeric variables.
pub fn unary_promoted_type(op: UnaryOp, operand: &Expr) -> Option<Type> {
    let ty = operand_type(operand)?;
    match op {
        UnaryOp::Compl => {
            if ty.unbox().is_integral() {
                unary_numeric_promotion(&ty)
            } else {
                None
            }
        }
        UnaryOp::Pos | UnaryOp::Neg => unary_numeric_promotion(&ty),
        UnaryOp::Not => ty.is_boolean().then_some(Type::BOOLEAN),
        UnaryOp::PreInc | UnaryOp::PreDec | UnaryOp::PostInc | UnaryOp::PostDec => {
            let is_variable = matches!(operand.kind, ExprKind::VariableRead { .. });
            (is_variable && ty.unbox().is_numeric()).then_some(ty)
        }
    }
}

/// The type of an operand's value, inferring it for untyped operator nodes.
pub fn operand_type(expr: &Expr) -> Option<Type> {
    match expr.expression_type() {
        Some(ty) => Some(ty.clone()),
        None => infer_type(expr),
    }
}

/// Infers the static type of an operator node from its operands.
///
/// Comparisons, logical operators, and `instanceof` are `boolean`; other
/// binary operators have their promoted type; unary operators have the
/// promoted type of their operand. Untyped operands are inferred recursively.
/// Non-operator nodes report their own static type.
pub fn infer_type(expr: &Expr) -> Option<Type> {
    match &expr.kind {
        ExprKind::Binary { op, lhs, rhs } => match op {
            BinaryOp::And
            | BinaryOp::Or
            | BinaryOp::InstanceOf
            | BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge => Some(Type::BOOLEAN),
            _ => binary_promoted_type(*op, &operand_type(lhs)?, &operand_type(rhs)?),
        },
        ExprKind::Unary { op, operand } => unary_promoted_type(*op, operand),
        _ => expr.ty.clone(),
    }
}
