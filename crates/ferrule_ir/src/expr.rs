//! Typed expression trees handed to the folding engine.
//!
//! An [`Expr`] is a value: folds take ownership of a node, rewrite it, and
//! return the result. Every node carries an optional static type and an
//! ordered list of [`TypeCast`]s applied to its value, innermost first.

use crate::ids::VarId;
use crate::types::Type;
use crate::value::Value;
use ferrule_common::Ident;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An explicit conversion applied to an expression's value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeCast {
    /// The type converted to.
    pub target: Type,
    /// Marks a cast that only preserves the expression type after a
    /// redundant cast was dropped; it has no runtime effect.
    pub implicit: bool,
}

impl TypeCast {
    /// Creates a cast written in source.
    pub fn explicit(target: Type) -> Self {
        Self {
            target,
            implicit: false,
        }
    }

    /// Creates a type-preserving marker cast.
    pub fn implicit(target: Type) -> Self {
        Self {
            target,
            implicit: true,
        }
    }
}

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Unary plus (`+x`).
    Pos,
    /// Arithmetic negation (`-x`).
    Neg,
    /// Logical NOT (`!x`).
    Not,
    /// Bitwise complement (`~x`).
    Compl,
    /// Pre-increment (`++x`).
    PreInc,
    /// Pre-decrement (`--x`).
    PreDec,
    /// Post-increment (`x++`).
    PostInc,
    /// Post-decrement (`x--`).
    PostDec,
}

impl UnaryOp {
    /// Returns the operator token.
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Pos => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::Compl => "~",
            UnaryOp::PreInc | UnaryOp::PostInc => "++",
            UnaryOp::PreDec | UnaryOp::PostDec => "--",
        }
    }

    /// Returns `true` if the operator is written after its operand.
    pub fn is_postfix(self) -> bool {
        matches!(self, UnaryOp::PostInc | UnaryOp::PostDec)
    }

    /// Returns `true` for the four increment/decrement operators.
    pub fn is_increment_or_decrement(self) -> bool {
        matches!(
            self,
            UnaryOp::PreInc | UnaryOp::PreDec | UnaryOp::PostInc | UnaryOp::PostDec
        )
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    /// Conditional OR (`||`).
    Or,
    /// Conditional AND (`&&`).
    And,
    /// Bitwise or logical OR (`|`).
    BitOr,
    /// Bitwise or logical XOR (`^`).
    BitXor,
    /// Bitwise or logical AND (`&`).
    BitAnd,
    /// Equality (`==`).
    Eq,
    /// Inequality (`!=`).
    Ne,
    /// Less than (`<`).
    Lt,
    /// Greater than (`>`).
    Gt,
    /// Less than or equal (`<=`).
    Le,
    /// Greater than or equal (`>=`).
    Ge,
    /// Left shift (`<<`).
    Shl,
    /// Sign-filling right shift (`>>`).
    Shr,
    /// Zero-filling right shift (`>>>`).
    Ushr,
    /// Addition or string concatenation (`+`).
    Plus,
    /// Subtraction (`-`).
    Minus,
    /// Multiplication (`*`).
    Mul,
    /// Division (`/`).
    Div,
    /// Remainder (`%`).
    Mod,
    /// Type test (`instanceof`).
    InstanceOf,
}

impl BinaryOp {
    /// Returns the operator token.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Ushr => ">>>",
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::InstanceOf => "instanceof",
        }
    }

    /// Binding strength in Java source; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 3,
            BinaryOp::And => 4,
            BinaryOp::BitOr => 5,
            BinaryOp::BitXor => 6,
            BinaryOp::BitAnd => 7,
            BinaryOp::Eq | BinaryOp::Ne => 8,
            BinaryOp::Lt
            | BinaryOp::Gt
            | BinaryOp::Le
            | BinaryOp::Ge
            | BinaryOp::InstanceOf => 9,
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::Ushr => 10,
            BinaryOp::Plus | BinaryOp::Minus => 11,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 12,
        }
    }

    /// `<<`, `>>`, and `>>>`.
    pub fn is_shift(self) -> bool {
        matches!(self, BinaryOp::Shl | BinaryOp::Shr | BinaryOp::Ushr)
    }

    /// Returns the operator that yields the same result with the operands exchanged,
    /// or `None` if no such operator exists.
    pub fn mirrored(self) -> Option<BinaryOp> {
        match self {
            BinaryOp::Lt => Some(BinaryOp::Gt),
            BinaryOp::Gt => Some(BinaryOp::Lt),
            BinaryOp::Le => Some(BinaryOp::Ge),
            BinaryOp::Ge => Some(BinaryOp::Le),
            BinaryOp::Minus | BinaryOp::Div | BinaryOp::Mod => None,
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::Ushr | BinaryOp::InstanceOf => None,
            other => Some(other),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The shape of an expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// A constant.
    Literal(Value),
    /// A unary operator application.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
    },
    /// A binary operator application.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// The left-hand side.
        lhs: Box<Expr>,
        /// The right-hand side.
        rhs: Box<Expr>,
    },
    /// A read of a local variable, parameter, or field.
    VariableRead {
        /// The declaration read.
        var: VarId,
        /// The variable name, for printing.
        name: Ident,
    },
    /// A method call. Opaque to every fold except for its arguments.
    Invocation {
        /// The method name.
        name: Ident,
        /// The argument expressions.
        args: Vec<Expr>,
    },
    /// A type used as an expression, e.g. the right operand of `instanceof`.
    TypeAccess(Type),
}

/// Fieldless discriminant of [`ExprKind`], used for fold dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// [`ExprKind::Literal`]
    Literal,
    /// [`ExprKind::Unary`]
    Unary,
    /// [`ExprKind::Binary`]
    Binary,
    /// [`ExprKind::VariableRead`]
    VariableRead,
    /// [`ExprKind::Invocation`]
    Invocation,
    /// [`ExprKind::TypeAccess`]
    TypeAccess,
}

/// A typed expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    /// The node shape and its children.
    pub kind: ExprKind,
    /// The static type before casts. `None` for synthesized, not yet typed nodes.
    pub ty: Option<Type>,
    /// Casts applied to the value, innermost first.
    pub casts: Vec<TypeCast>,
}

impl Expr {
    /// Creates an uncast node.
    pub fn new(kind: ExprKind, ty: Option<Type>) -> Self {
        Self {
            kind,
            ty,
            casts: Vec::new(),
        }
    }

    /// Creates a literal typed with the value's natural type.
    pub fn literal(value: Value) -> Self {
        let ty = value.natural_type();
        Self::new(ExprKind::Literal(value), Some(ty))
    }

    /// Creates a unary operator node.
    pub fn unary(op: UnaryOp, operand: Expr, ty: Option<Type>) -> Self {
        Self::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            ty,
        )
    }

    /// Creates a binary operator node.
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr, ty: Option<Type>) -> Self {
        Self::new(
            ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            ty,
        )
    }

    /// Creates a variable read of the given declaration.
    pub fn var_read(var: VarId, name: Ident, ty: Type) -> Self {
        Self::new(ExprKind::VariableRead { var, name }, Some(ty))
    }

    /// Creates a method call node.
    pub fn invocation(name: Ident, args: Vec<Expr>, ty: Type) -> Self {
        Self::new(ExprKind::Invocation { name, args }, Some(ty))
    }

    /// Creates a type access node.
    pub fn type_access(ty: Type) -> Self {
        Self::new(ExprKind::TypeAccess(ty.clone()), Some(ty))
    }

    /// Adds an explicit outermost cast.
    pub fn with_cast(mut self, target: Type) -> Self {
        self.casts.push(TypeCast::explicit(target));
        self
    }

    /// Returns the discriminant of this node.
    pub fn node_kind(&self) -> NodeKind {
        match self.kind {
            ExprKind::Literal(_) => NodeKind::Literal,
            ExprKind::Unary { .. } => NodeKind::Unary,
            ExprKind::Binary { .. } => NodeKind::Binary,
            ExprKind::VariableRead { .. } => NodeKind::VariableRead,
            ExprKind::Invocation { .. } => NodeKind::Invocation,
            ExprKind::TypeAccess(_) => NodeKind::TypeAccess,
        }
    }

    /// The type of the value after all casts: the outermost cast target, or the static type.
    pub fn expression_type(&self) -> Option<&Type> {
        self.casts
            .last()
            .map(|cast| &cast.target)
            .or(self.ty.as_ref())
    }

    /// Returns the constant if this node is a literal.
    pub fn as_literal(&self) -> Option<&Value> {
        match &self.kind {
            ExprKind::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// Returns `true` if this node is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(self.kind, ExprKind::Literal(_))
    }

    /// Returns `true` if evaluating this expression may have an observable effect:
    /// it contains a method call or an increment/decrement.
    pub fn has_side_effects(&self) -> bool {
        match &self.kind {
            ExprKind::Invocation { .. } => true,
            ExprKind::Unary { op, operand } => {
                op.is_increment_or_decrement() || operand.has_side_effects()
            }
            ExprKind::Binary { lhs, rhs, .. } => lhs.has_side_effects() || rhs.has_side_effects(),
            ExprKind::Literal(_) | ExprKind::VariableRead { .. } | ExprKind::TypeAccess(_) => {
                false
            }
        }
    }

    /// Returns `true` if evaluating this expression may throw.
    ///
    /// Integral `/` and `%` throw unless the divisor is a nonzero constant.
    /// Operators unbox values of a wrapper type, which fails on `null`, and a
    /// cast from a reference type throws unless it widens.
    pub fn may_throw(&self) -> bool {
        if self.ty.as_ref().is_some_and(Type::is_boxed) || self.cast_may_throw() {
            return true;
        }
        match &self.kind {
            ExprKind::Binary { op, lhs, rhs } => {
                let division = matches!(op, BinaryOp::Div | BinaryOp::Mod)
                    && !self.ty.as_ref().is_some_and(Type::is_floating)
                    && !rhs.is_nonzero_integer();
                division || lhs.may_throw() || rhs.may_throw()
            }
            ExprKind::Unary { operand, .. } => operand.may_throw(),
            ExprKind::Invocation { args, .. } => args.iter().any(Expr::may_throw),
            ExprKind::Literal(_) | ExprKind::VariableRead { .. } | ExprKind::TypeAccess(_) => {
                false
            }
        }
    }

    /// Returns `true` if this expression can be evaluated any number of
    /// times, or not at all, without a visible difference.
    pub fn is_pure(&self) -> bool {
        !self.has_side_effects() && !self.may_throw()
    }

    fn cast_may_throw(&self) -> bool {
        let mut current = self.ty.as_ref();
        for cast in &self.casts {
            let throws = match current {
                _ if cast.implicit => false,
                None => true,
                Some(from) if from.is_primitive() => false,
                Some(from) => !from.is_subtype_of(&cast.target),
            };
            if throws {
                return true;
            }
            current = Some(&cast.target);
        }
        false
    }

    fn is_nonzero_integer(&self) -> bool {
        self.casts.is_empty()
            && self
                .as_literal()
                .and_then(Value::as_i64)
                .is_some_and(|v| v != 0)
    }
}
