//! Java source rendering of expressions.
//!
//! Lint rules show folded expressions to users as suggestions, so output is
//! valid Java with as few parentheses as precedence allows. Casts are written
//! outermost first: `(Integer) (int) c`.

use crate::expr::{Expr, ExprKind};
use crate::types::Type;
use ferrule_common::Interner;
use std::fmt;

/// Precedence of casts and prefix operators.
const PREFIX_PRECEDENCE: u8 = 13;
/// Precedence of postfix operators.
const POSTFIX_PRECEDENCE: u8 = 14;
/// Precedence of atoms: literals, names, calls.
const ATOM_PRECEDENCE: u8 = 15;

/// A [`Display`](fmt::Display) adapter printing an [`Expr`] as Java source.
pub struct DisplayExpr<'a> {
    expr: &'a Expr,
    interner: &'a Interner,
}

/// A [`Display`](fmt::Display) adapter printing a [`Type`] as Java source.
pub struct DisplayType<'a> {
    ty: &'a Type,
    interner: &'a Interner,
}

impl Expr {
    /// Returns an adapter that prints this expression as Java source.
    pub fn display<'a>(&'a self, interner: &'a Interner) -> DisplayExpr<'a> {
        DisplayExpr {
            expr: self,
            interner,
        }
    }
}

impl Type {
    /// Returns an adapter that prints this type as Java source.
    pub fn display<'a>(&'a self, interner: &'a Interner) -> DisplayType<'a> {
        DisplayType { ty: self, interner }
    }
}

impl fmt::Display for DisplayType<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Type::Primitive(p) => f.write_str(p.keyword()),
            Type::Boxed(p) => f.write_str(p.wrapper_name()),
            Type::String => f.write_str("String"),
            Type::Null => f.write_str("null"),
            Type::Object => f.write_str("Object"),
            Type::Class { name, .. } => {
                f.write_str(self.interner.try_resolve(*name).unwrap_or("<unknown>"))
            }
        }
    }
}

impl fmt::Display for DisplayExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, self.expr, self.interner)
    }
}

fn precedence(expr: &Expr) -> u8 {
    if !expr.casts.is_empty() {
        return PREFIX_PRECEDENCE;
    }
    match &expr.kind {
        ExprKind::Binary { op, .. } => op.precedence(),
        ExprKind::Unary { op, .. } if op.is_postfix() => POSTFIX_PRECEDENCE,
        ExprKind::Unary { .. } => PREFIX_PRECEDENCE,
        _ => ATOM_PRECEDENCE,
    }
}

fn write_parenthesized(
    f: &mut fmt::Formatter<'_>,
    expr: &Expr,
    interner: &Interner,
    parens: bool,
) -> fmt::Result {
    if parens {
        f.write_str("(")?;
        write_expr(f, expr, interner)?;
        f.write_str(")")
    } else {
        write_expr(f, expr, interner)
    }
}

fn write_expr(f: &mut fmt::Formatter<'_>, expr: &Expr, interner: &Interner) -> fmt::Result {
    for cast in expr.casts.iter().rev() {
        write!(f, "({}) ", cast.target.display(interner))?;
    }
    let body_parens = match (expr.casts.last(), &expr.kind) {
        (None, _) => false,
        (Some(_), ExprKind::Binary { .. }) => true,
        // `(Integer) -x` would parse as a subtraction
        (Some(cast), ExprKind::Unary { op, .. }) => {
            !cast.target.is_primitive() && !op.is_postfix()
        }
        _ => false,
    };
    if body_parens {
        f.write_str("(")?;
    }

    match &expr.kind {
        ExprKind::Literal(value) => write!(f, "{value}")?,
        ExprKind::VariableRead { name, .. } => {
            f.write_str(interner.try_resolve(*name).unwrap_or("<unknown>"))?
        }
        ExprKind::TypeAccess(ty) => write!(f, "{}", ty.display(interner))?,
        ExprKind::Invocation { name, args } => {
            f.write_str(interner.try_resolve(*name).unwrap_or("<unknown>"))?;
            f.write_str("(")?;
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_expr(f, arg, interner)?;
            }
            f.write_str(")")?;
        }
        ExprKind::Unary { op, operand } if op.is_postfix() => {
            let parens = precedence(operand) < POSTFIX_PRECEDENCE;
            write_parenthesized(f, operand, interner, parens)?;
            f.write_str(op.symbol())?;
        }
        ExprKind::Unary { op, operand } => {
            f.write_str(op.symbol())?;
            let parens = match &operand.kind {
                _ if !operand.casts.is_empty() => false,
                ExprKind::Unary { op: inner, .. } => !inner.is_postfix(),
                ExprKind::Binary { .. } => true,
                ExprKind::Literal(value) => value.as_f64().is_some_and(|v| v.is_sign_negative()),
                _ => false,
            };
            write_parenthesized(f, operand, interner, parens)?;
        }
        ExprKind::Binary { op, lhs, rhs } => {
            let prec = op.precedence();
            write_parenthesized(f, lhs, interner, precedence(lhs) < prec)?;
            write!(f, " {op} ")?;
            write_parenthesized(f, rhs, interner, precedence(rhs) <= prec)?;
        }
    }

    if body_parens {
        f.write_str(")")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{BinaryOp, UnaryOp};
    use crate::ids::VarId;
    use crate::types::PrimitiveType;
    use crate::value::Value;

    fn var(interner: &Interner, name: &str, ty: Type) -> Expr {
        Expr::var_read(VarId::from_raw(0), interner.get_or_intern(name), ty)
    }

    fn int(v: i32) -> Expr {
        Expr::literal(Value::Int(v))
    }

    #[test]
    fn left_associative_chain_has_no_parens() {
        let interner = Interner::new();
        let e = Expr::binary(
            BinaryOp::Plus,
            Expr::binary(BinaryOp::Plus, var(&interner, "a", Type::INT), int(1), None),
            int(3),
            None,
        );
        assert_eq!(e.display(&interner).to_string(), "a + 1 + 3");
    }

    #[test]
    fn right_nested_same_precedence_is_parenthesized() {
        let interner = Interner::new();
        let e = Expr::binary(
            BinaryOp::Plus,
            var(&interner, "a", Type::BYTE),
            Expr::binary(BinaryOp::Plus, Expr::literal(Value::Char(98)), int(0), None),
            None,
        );
        assert_eq!(e.display(&interner).to_string(), "a + ('b' + 0)");
    }

    #[test]
    fn lower_precedence_operand_is_parenthesized() {
        let interner = Interner::new();
        let e = Expr::binary(
            BinaryOp::Mul,
            Expr::binary(BinaryOp::Plus, int(2), int(3), None),
            int(4),
            None,
        );
        assert_eq!(e.display(&interner).to_string(), "(2 + 3) * 4");
    }

    #[test]
    fn casts_print_outermost_first() {
        let interner = Interner::new();
        let e = var(&interner, "c", Type::Boxed(PrimitiveType::Char))
            .with_cast(Type::INT)
            .with_cast(Type::Boxed(PrimitiveType::Int));
        assert_eq!(e.display(&interner).to_string(), "(Integer) (int) c");
    }

    #[test]
    fn cast_operand_of_binary() {
        let interner = Interner::new();
        let e = Expr::binary(
            BinaryOp::Minus,
            int(0),
            var(&interner, "b", Type::BYTE).with_cast(Type::INT),
            None,
        );
        assert_eq!(e.display(&interner).to_string(), "0 - (int) b");
        let cast_sum = Expr::binary(BinaryOp::Plus, int(1), int(2), None).with_cast(Type::LONG);
        assert_eq!(cast_sum.display(&interner).to_string(), "(long) (1 + 2)");
    }

    #[test]
    fn nested_negation() {
        let interner = Interner::new();
        let a = var(&interner, "a", Type::INT);
        let e = Expr::unary(
            UnaryOp::Neg,
            Expr::unary(UnaryOp::Neg, a.clone(), None),
            None,
        );
        assert_eq!(e.display(&interner).to_string(), "-(-a)");
        let post = Expr::unary(UnaryOp::PostInc, a, None);
        assert_eq!(post.display(&interner).to_string(), "a++");
    }

    #[test]
    fn invocation_and_instanceof() {
        let interner = Interner::new();
        let call = Expr::invocation(
            interner.get_or_intern("max"),
            vec![int(1), var(&interner, "x", Type::INT)],
            Type::INT,
        );
        assert_eq!(call.display(&interner).to_string(), "max(1, x)");
        let test = Expr::binary(
            BinaryOp::InstanceOf,
            var(&interner, "o", Type::Object),
            Expr::type_access(Type::String),
            Some(Type::BOOLEAN),
        );
        assert_eq!(test.display(&interner).to_string(), "o instanceof String");
    }

    #[test]
    fn class_type_names_resolve() {
        let interner = Interner::new();
        let ty = Type::Class {
            name: interner.get_or_intern("List"),
            supertypes: Vec::new(),
        };
        assert_eq!(ty.display(&interner).to_string(), "List");
    }
}
