//! Absorption laws of boolean algebra.

use crate::errors::FoldResult;
use crate::fold::Fold;
use ferrule_ir::{BinaryOp, Expr, ExprKind, Type, UnaryOp};

/// Collapses `&&` and `||` chains that repeat an operand.
///
/// | expression            | result       |
/// |-----------------------|--------------|
/// | `a && (a \|\| b)`     | `a`          |
/// | `a && (b \|\| a)`     | `a`          |
/// | `(a \|\| b) && a`     | `a`          |
/// | `a \|\| (a && b)`     | `a`          |
/// | `a \|\| (b && a)`     | `a`          |
/// | `(a && b) \|\| a`     | `a`          |
/// | `a \|\| (!a && c)`    | `a \|\| c`   |
/// | `a \|\| (c && !a)`    | `a \|\| c`   |
/// | `(!a && c) \|\| a`    | `a \|\| c`   |
///
/// Operands are compared structurally, and the repeated `a` must be
/// [pure](Expr::is_pure). So must a `b` that the original expression
/// evaluates but the result does not. `(b || a) && a` and `(b && a) || a`
/// are kept, since there `b` is evaluated before `a`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyAbsorptionLaw;

enum Rewrite<'a> {
    /// The whole expression is the repeated operand.
    Absorbed,
    /// The whole expression is the repeated operand `||` this one.
    OrElse(&'a Expr),
}

fn is_boolean(expr: &Expr) -> bool {
    expr.expression_type().is_some_and(Type::is_boolean)
}

fn same_pure(a: &Expr, b: &Expr) -> bool {
    a == b && a.is_pure()
}

fn logical_not(expr: &Expr) -> Option<&Expr> {
    match &expr.kind {
        ExprKind::Unary {
            op: UnaryOp::Not,
            operand,
        } if expr.casts.is_empty() => Some(&**operand),
        _ => None,
    }
}

/// `a` and `b` are a pure expression and its logical not, in either order.
fn negates(a: &Expr, b: &Expr) -> bool {
    a.is_pure() && (logical_not(b) == Some(a) || logical_not(a) == Some(b))
}

/// Matches `outer op inner`. `swapped` is set when `outer` was written on
/// the right, so it is evaluated after `inner`.
fn absorb<'a>(
    op: BinaryOp,
    outer: &Expr,
    inner: &'a Expr,
    swapped: bool,
) -> Option<Rewrite<'a>> {
    let ExprKind::Binary {
        op: inner_op,
        lhs,
        rhs,
    } = &inner.kind
    else {
        return None;
    };
    if !inner.casts.is_empty() {
        return None;
    }
    match (op, *inner_op) {
        (BinaryOp::And, BinaryOp::Or) | (BinaryOp::Or, BinaryOp::And) => {
            if same_pure(outer, lhs) && (!swapped || rhs.is_pure()) {
                return Some(Rewrite::Absorbed);
            }
            if !swapped && same_pure(outer, rhs) && lhs.is_pure() {
                return Some(Rewrite::Absorbed);
            }
            if op == BinaryOp::And {
                return None;
            }
            if negates(outer, lhs) {
                return Some(Rewrite::OrElse(rhs));
            }
            (!swapped && negates(outer, rhs)).then_some(Rewrite::OrElse(lhs))
        }
        _ => None,
    }
}

impl Fold for ApplyAbsorptionLaw {
    fn fold_binary(&self, expr: Expr) -> FoldResult {
        let ExprKind::Binary { op, lhs, rhs } = &expr.kind else {
            return Ok(expr);
        };
        if !matches!(op, BinaryOp::And | BinaryOp::Or) || !is_boolean(lhs) || !is_boolean(rhs) {
            return Ok(expr);
        }
        let matched = match absorb(*op, lhs, rhs, false) {
            Some(rewrite) => Some((lhs, rewrite)),
            None => absorb(*op, rhs, lhs, true).map(|rewrite| (rhs, rewrite)),
        };
        let Some((outer, rewrite)) = matched else {
            return Ok(expr);
        };
        tracing::trace!(%op, "applied absorption law");
        let mut result = match rewrite {
            Rewrite::Absorbed => (**outer).clone(),
            Rewrite::OrElse(rest) => {
                Expr::binary(BinaryOp::Or, (**outer).clone(), rest.clone(), expr.ty.clone())
            }
        };
        result.casts.extend(expr.casts.iter().cloned());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Evaluator;
    use ferrule_common::Interner;
    use ferrule_ir::{PrimitiveType, VarId};

    struct Fixture {
        interner: Interner,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                interner: Interner::new(),
            }
        }

        fn var(&self, name: &str) -> Expr {
            let ident = self.interner.get_or_intern(name);
            Expr::var_read(VarId::from_raw(ident.as_raw()), ident, Type::BOOLEAN)
        }

        fn call(&self, name: &str) -> Expr {
            Expr::invocation(self.interner.get_or_intern(name), Vec::new(), Type::BOOLEAN)
        }

        fn fold(&self, e: &Expr) -> String {
            let folded = Evaluator::new(ApplyAbsorptionLaw).evaluate(e).unwrap();
            folded.display(&self.interner).to_string()
        }
    }

    fn and(l: Expr, r: Expr) -> Expr {
        Expr::binary(BinaryOp::And, l, r, Some(Type::BOOLEAN))
    }

    fn or(l: Expr, r: Expr) -> Expr {
        Expr::binary(BinaryOp::Or, l, r, Some(Type::BOOLEAN))
    }

    fn not(e: Expr) -> Expr {
        Expr::unary(UnaryOp::Not, e, Some(Type::BOOLEAN))
    }

    #[test]
    fn and_absorbs_or() {
        let fx = Fixture::new();
        let (a, b) = (fx.var("a"), fx.var("b"));
        assert_eq!(fx.fold(&and(a.clone(), or(a.clone(), b.clone()))), "a");
        assert_eq!(fx.fold(&and(a.clone(), or(b.clone(), a.clone()))), "a");
        assert_eq!(fx.fold(&and(or(a.clone(), b.clone()), a.clone())), "a");
    }

    #[test]
    fn or_absorbs_and() {
        let fx = Fixture::new();
        let (a, b) = (fx.var("a"), fx.var("b"));
        assert_eq!(fx.fold(&or(a.clone(), and(a.clone(), b.clone()))), "a");
        assert_eq!(fx.fold(&or(a.clone(), and(b.clone(), a.clone()))), "a");
        assert_eq!(fx.fold(&or(and(a.clone(), b.clone()), a.clone())), "a");
    }

    #[test]
    fn negated_operand_is_dropped() {
        let fx = Fixture::new();
        let (a, c) = (fx.var("a"), fx.var("c"));
        assert_eq!(fx.fold(&or(a.clone(), and(not(a.clone()), c.clone()))), "a || c");
        assert_eq!(fx.fold(&or(a.clone(), and(c.clone(), not(a.clone())))), "a || c");
        assert_eq!(fx.fold(&or(and(not(a.clone()), c.clone()), a.clone())), "a || c");
        assert_eq!(fx.fold(&or(not(a.clone()), and(a.clone(), c.clone()))), "!a || c");
        let ready = fx.call("isReady");
        assert_eq!(fx.fold(&or(a.clone(), and(not(a), ready))), "a || isReady()");
    }

    #[test]
    fn swapped_forms_keep_evaluation_order() {
        let fx = Fixture::new();
        let (a, b, c) = (fx.var("a"), fx.var("b"), fx.var("c"));
        let e = and(or(b.clone(), a.clone()), a.clone());
        assert_eq!(fx.fold(&e), "(b || a) && a");
        let e = or(and(b, a.clone()), a.clone());
        assert_eq!(fx.fold(&e), "b && a || a");
        let e = or(and(c, not(a.clone())), a);
        assert_eq!(fx.fold(&e), "c && !a || a");
    }

    #[test]
    fn impure_operands_are_kept() {
        let fx = Fixture::new();
        let (a, ready) = (fx.var("a"), fx.call("isReady"));
        let twice = and(ready.clone(), or(ready.clone(), a.clone()));
        assert_eq!(fx.fold(&twice), "isReady() && (isReady() || a)");
        assert_eq!(fx.fold(&and(a.clone(), or(a.clone(), ready.clone()))), "a");
        let skipped = and(or(a.clone(), ready), a.clone());
        assert_eq!(fx.fold(&skipped), "(a || isReady()) && a");
        let boxed = Expr::var_read(
            VarId::from_raw(9),
            fx.interner.get_or_intern("flag"),
            Type::Boxed(PrimitiveType::Boolean),
        );
        let unboxed = or(boxed.clone(), and(boxed, a));
        assert_eq!(fx.fold(&unboxed), "flag || flag && a");
    }

    #[test]
    fn different_operands_are_kept() {
        let fx = Fixture::new();
        let (a, b, c) = (fx.var("a"), fx.var("b"), fx.var("c"));
        assert_eq!(fx.fold(&and(a.clone(), or(b.clone(), c))), "a && (b || c)");
        assert_eq!(fx.fold(&and(a.clone(), and(a.clone(), b.clone()))), "a && (a && b)");
        let cast = or(a.clone(), b).with_cast(Type::Boxed(PrimitiveType::Boolean));
        assert_eq!(fx.fold(&and(a, cast)), "a && (Boolean) (a || b)");
    }
}
