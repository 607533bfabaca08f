//! Conformance test helpers for the ferrule folding engine.
//!
//! Provides a [`Session`] that owns the interner and declarations expressions
//! refer to, builders for typed expressions, and [`reference_eval`], an
//! evaluator for constant expressions written independently of the folds,
//! which the integration tests compare the engine against.

#![warn(missing_docs)]

use ferrule_common::Interner;
use ferrule_config::{load_config_from_str, FerruleConfig};
use ferrule_eval::{build_evaluator, default_evaluator, infer_type, FoldResult};
use ferrule_ir::{
    BinaryOp, DeclKind, Declaration, DeclarationTable, Expr, ExprKind, PrimitiveType, Type, UnaryOp,
    Value,
};

/// The declarations and names expressions of one test refer to.
#[derive(Default)]
pub struct Session {
    /// Interner for variable and method names.
    pub interner: Interner,
    /// Declared variables.
    pub table: DeclarationTable,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    fn declare(&mut self, decl: Declaration) -> Expr {
        let (name, ty) = (decl.name, decl.ty.clone());
        let id = self.table.declare(decl);
        Expr::var_read(id, name, ty)
    }

    /// Declares a method parameter and returns a read of it.
    pub fn param(&mut self, name: &str, ty: Type) -> Expr {
        let decl = Declaration::new(self.interner.get_or_intern(name), ty, DeclKind::Parameter);
        self.declare(decl)
    }

    /// Declares a never reassigned local and returns a read of it.
    pub fn local(&mut self, name: &str, ty: Type, init: Expr) -> Expr {
        let decl = Declaration::new(self.interner.get_or_intern(name), ty, DeclKind::Local)
            .with_initializer(init);
        self.declare(decl)
    }

    /// Declares a `static final` field and returns a read of it.
    pub fn constant(&mut self, name: &str, ty: Type, init: Expr) -> Expr {
        let kind = DeclKind::Field { is_static: true };
        let decl = Declaration::new(self.interner.get_or_intern(name), ty, kind)
            .make_final()
            .with_initializer(init);
        self.declare(decl)
    }

    /// A call of a method without arguments.
    pub fn call(&self, name: &str, ty: Type) -> Expr {
        Expr::invocation(self.interner.get_or_intern(name), Vec::new(), ty)
    }

    /// Renders an expression as Java source.
    pub fn show(&self, expr: &Expr) -> String {
        expr.display(&self.interner).to_string()
    }

    /// Folds with the default chain.
    pub fn fold(&self, expr: &Expr) -> FoldResult {
        default_evaluator(&self.table).evaluate(expr)
    }

    /// Folds with the default chain and renders the result, or the input if
    /// it is unevaluable.
    pub fn fold_to_string(&self, expr: &Expr) -> String {
        self.show(&default_evaluator(&self.table).evaluate_or_keep(expr))
    }

    /// Folds with the evaluator a configuration describes.
    pub fn fold_with(&self, config: &FerruleConfig, expr: &Expr) -> FoldResult {
        build_evaluator(config, &self.table).evaluate(expr)
    }
}

/// Parses an inline `ferrule.toml`.
///
/// # Panics
///
/// Panics if the text is not a valid configuration.
pub fn make_config(toml_str: &str) -> FerruleConfig {
    load_config_from_str(toml_str).unwrap()
}

/// A literal.
pub fn lit(value: Value) -> Expr {
    Expr::literal(value)
}

/// An `int` literal.
pub fn int(v: i32) -> Expr {
    lit(Value::Int(v))
}

/// A binary operator node typed the way the compiler would type it.
pub fn bin(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    let mut expr = Expr::binary(op, lhs, rhs, None);
    expr.ty = infer_type(&expr);
    expr
}

/// A unary operator node typed the way the compiler would type it.
pub fn un(op: UnaryOp, operand: Expr) -> Expr {
    let mut expr = Expr::unary(op, operand, None);
    expr.ty = infer_type(&expr);
    expr
}

/// Applies casts, innermost first.
pub fn cast(expr: Expr, inner_to_outer: &[Type]) -> Expr {
    inner_to_outer
        .iter()
        .fold(expr, |expr, ty| expr.with_cast(ty.clone()))
}

/// Constants near the interesting boundaries of every numeric type.
pub fn boundary_values() -> Vec<Value> {
    let mut values = vec![
        Value::Byte(i8::MIN),
        Value::Byte(-1),
        Value::Byte(i8::MAX),
        Value::Short(i16::MIN),
        Value::Short(i16::MAX),
        Value::Char(0),
        Value::Char(u16::from(b'a')),
        Value::Char(u16::MAX),
    ];
    values.extend([i32::MIN, i32::MIN + 1, -1, 0, 1, 31, 32, i32::MAX].map(Value::Int));
    values.extend([i64::MIN, -1, 0, 63, 64, i64::from(i32::MAX) + 1, i64::MAX].map(Value::Long));
    let floats = [0.0, -0.0, 1.5, 16_777_216.0, f32::MAX, f32::MIN_POSITIVE, f32::INFINITY];
    values.extend(floats.map(Value::Float));
    values.push(Value::Float(f32::NAN));
    let doubles = [0.0, -0.0, 0.1, 1e300, 9.223_372_036_854_776e18, f64::NEG_INFINITY];
    values.extend(doubles.map(Value::Double));
    values.push(Value::Double(f64::NAN));
    values
}

/// The numeric primitive types.
pub const NUMERIC_TYPES: [PrimitiveType; 7] = [
    PrimitiveType::Byte,
    PrimitiveType::Short,
    PrimitiveType::Char,
    PrimitiveType::Int,
    PrimitiveType::Long,
    PrimitiveType::Float,
    PrimitiveType::Double,
];

/// `true` if two constants are the same value. Every `NaN` equals every
/// other `NaN`; `0.0` and `-0.0` differ.
pub fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Float(x), Value::Float(y)) => {
            x.to_bits() == y.to_bits() || (x.is_nan() && y.is_nan())
        }
        (Value::Double(x), Value::Double(y)) => {
            x.to_bits() == y.to_bits() || (x.is_nan() && y.is_nan())
        }
        _ => a == b,
    }
}

/// The outcome of evaluating a constant expression with [`reference_eval`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reference {
    /// The expression evaluates to this value.
    Value(Value),
    /// The expression divides an integer by zero.
    DivisionByZero,
}

/// Evaluates an expression made of numeric and boolean literals, operators,
/// and primitive casts.
///
/// Integers are computed exactly in `i128` and wrapped to the width of the
/// operation; `float` arithmetic is done in `f32`. Returns `None` for
/// anything else, including operators applied to operands of the wrong type.
pub fn reference_eval(expr: &Expr) -> Option<Reference> {
    let mut value = match &expr.kind {
        ExprKind::Literal(value) => value.clone(),
        ExprKind::Unary { op, operand } => match reference_eval(operand)? {
            Reference::Value(v) => reference_unary(*op, &v)?,
            division => return Some(division),
        },
        ExprKind::Binary { op, lhs, rhs } => {
            let l = match reference_eval(lhs)? {
                Reference::Value(v) => v,
                division => return Some(division),
            };
            let r = match reference_eval(rhs)? {
                Reference::Value(v) => v,
                division => return Some(division),
            };
            match reference_binary(*op, &l, &r)? {
                Reference::Value(v) => v,
                division => return Some(division),
            }
        }
        _ => return None,
    };
    for cast in &expr.casts {
        value = reference_cast(&value, cast.target.unboxed_primitive()?)?;
    }
    Some(Reference::Value(value))
}

/// An integral constant and its width in bits.
fn integer(value: &Value) -> Option<(i128, u32)> {
    match *value {
        Value::Byte(v) => Some((i128::from(v), 8)),
        Value::Short(v) => Some((i128::from(v), 16)),
        Value::Char(v) => Some((i128::from(v), 16)),
        Value::Int(v) => Some((i128::from(v), 32)),
        Value::Long(v) => Some((i128::from(v), 64)),
        _ => None,
    }
}

/// Two's complement truncation to `bits`, sign-extended back.
fn wrap(v: i128, bits: u32) -> i128 {
    let unused = 128 - bits;
    (v << unused) >> unused
}

fn make_integer(v: i128, ty: PrimitiveType) -> Option<Value> {
    Some(match ty {
        PrimitiveType::Byte => Value::Byte(wrap(v, 8) as i8),
        PrimitiveType::Short => Value::Short(wrap(v, 16) as i16),
        PrimitiveType::Char => Value::Char((v & 0xffff) as u16),
        PrimitiveType::Int => Value::Int(wrap(v, 32) as i32),
        PrimitiveType::Long => Value::Long(wrap(v, 64) as i64),
        _ => return None,
    })
}

/// Java casting conversion between primitive constants.
pub fn reference_cast(value: &Value, to: PrimitiveType) -> Option<Value> {
    if let Value::Bool(b) = value {
        return (to == PrimitiveType::Boolean).then_some(Value::Bool(*b));
    }
    if let Some((v, _)) = integer(value) {
        return match to {
            PrimitiveType::Float => Some(Value::Float(v as f32)),
            PrimitiveType::Double => Some(Value::Double(v as f64)),
            PrimitiveType::Boolean => None,
            _ => make_integer(v, to),
        };
    }
    let d = match *value {
        Value::Float(f) => f64::from(f),
        Value::Double(d) => d,
        _ => return None,
    };
    match to {
        PrimitiveType::Float => Some(Value::Float(d as f32)),
        PrimitiveType::Double => Some(Value::Double(d)),
        PrimitiveType::Long => Some(Value::Long(d as i64)),
        PrimitiveType::Boolean => None,
        _ => make_integer(i128::from(d as i32), to),
    }
}

fn rank(value: &Value) -> Option<u8> {
    match value {
        Value::Byte(_) | Value::Short(_) | Value::Char(_) | Value::Int(_) => Some(0),
        Value::Long(_) => Some(1),
        Value::Float(_) => Some(2),
        Value::Double(_) => Some(3),
        _ => None,
    }
}

fn promoted(l: &Value, r: &Value) -> Option<PrimitiveType> {
    Some(match rank(l)?.max(rank(r)?) {
        0 => PrimitiveType::Int,
        1 => PrimitiveType::Long,
        2 => PrimitiveType::Float,
        _ => PrimitiveType::Double,
    })
}

fn compare<T: PartialOrd>(op: BinaryOp, a: T, b: T) -> Option<bool> {
    Some(match op {
        BinaryOp::Eq => a == b,
        BinaryOp::Ne => a != b,
        BinaryOp::Lt => a < b,
        BinaryOp::Le => a <= b,
        BinaryOp::Gt => a > b,
        BinaryOp::Ge => a >= b,
        _ => return None,
    })
}

fn reference_binary(op: BinaryOp, l: &Value, r: &Value) -> Option<Reference> {
    let value = |v: Value| Some(Reference::Value(v));
    if let (Value::Bool(a), Value::Bool(b)) = (l, r) {
        return value(Value::Bool(match op {
            BinaryOp::And | BinaryOp::BitAnd => *a && *b,
            BinaryOp::Or | BinaryOp::BitOr => *a || *b,
            BinaryOp::BitXor | BinaryOp::Ne => a != b,
            BinaryOp::Eq => a == b,
            _ => return None,
        }));
    }
    if matches!(op, BinaryOp::Shl | BinaryOp::Shr | BinaryOp::Ushr) {
        let (a, width) = integer(l)?;
        let (d, _) = integer(r)?;
        let (ty, bits) = if width == 64 {
            (PrimitiveType::Long, 64)
        } else {
            (PrimitiveType::Int, 32)
        };
        let distance = (d & i128::from(bits - 1)) as u32;
        let shifted = match op {
            BinaryOp::Shl => a << distance,
            BinaryOp::Shr => a >> distance,
            _ => (a & ((1i128 << bits) - 1)) >> distance,
        };
        return value(make_integer(shifted, ty)?);
    }
    let ty = promoted(l, r)?;
    match ty {
        PrimitiveType::Int | PrimitiveType::Long => {
            let (a, _) = integer(l)?;
            let (b, _) = integer(r)?;
            if let Some(holds) = compare(op, a, b) {
                return value(Value::Bool(holds));
            }
            let v = match op {
                BinaryOp::Plus => a + b,
                BinaryOp::Minus => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div | BinaryOp::Mod if b == 0 => {
                    return Some(Reference::DivisionByZero);
                }
                BinaryOp::Div => a / b,
                BinaryOp::Mod => a % b,
                BinaryOp::BitAnd => a & b,
                BinaryOp::BitOr => a | b,
                BinaryOp::BitXor => a ^ b,
                _ => return None,
            };
            value(make_integer(v, ty)?)
        }
        PrimitiveType::Float => {
            let Value::Float(a) = reference_cast(l, ty)? else {
                return None;
            };
            let Value::Float(b) = reference_cast(r, ty)? else {
                return None;
            };
            if let Some(holds) = compare(op, a, b) {
                return value(Value::Bool(holds));
            }
            value(Value::Float(match op {
                BinaryOp::Plus => a + b,
                BinaryOp::Minus => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                BinaryOp::Mod => a % b,
                _ => return None,
            }))
        }
        _ => {
            let Value::Double(a) = reference_cast(l, ty)? else {
                return None;
            };
            let Value::Double(b) = reference_cast(r, ty)? else {
                return None;
            };
            if let Some(holds) = compare(op, a, b) {
                return value(Value::Bool(holds));
            }
            value(Value::Double(match op {
                BinaryOp::Plus => a + b,
                BinaryOp::Minus => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                BinaryOp::Mod => a % b,
                _ => return None,
            }))
        }
    }
}

fn reference_unary(op: UnaryOp, v: &Value) -> Option<Value> {
    match (op, v) {
        (UnaryOp::Not, Value::Bool(b)) => Some(Value::Bool(!b)),
        (UnaryOp::Neg, Value::Float(f)) => Some(Value::Float(-f)),
        (UnaryOp::Neg, Value::Double(d)) => Some(Value::Double(-d)),
        (UnaryOp::Pos, Value::Float(_) | Value::Double(_)) => Some(v.clone()),
        (UnaryOp::Neg | UnaryOp::Pos | UnaryOp::Compl, _) => {
            let (a, width) = integer(v)?;
            let ty = if width == 64 {
                PrimitiveType::Long
            } else {
                PrimitiveType::Int
            };
            let result = match op {
                UnaryOp::Neg => -a,
                UnaryOp::Compl => !a,
                _ => a,
            };
            make_integer(result, ty)
        }
        _ => None,
    }
}
