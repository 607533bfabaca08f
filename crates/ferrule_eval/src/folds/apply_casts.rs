//! Conversion of literal values through their pending casts.

use crate::casts::apply_casts;
use crate::errors::FoldResult;
use crate::fold::Fold;
use ferrule_ir::Expr;

/// Selects the literals a cast-applying fold rewrites.
pub type LiteralPredicate = Box<dyn Fn(&Expr) -> bool + Send + Sync>;

/// Converts literal values through their pending casts.
///
/// `(byte) 400` becomes `-112`, `(float) 'a'` becomes `97.0F`. Casts that
/// have no constant conversion (e.g. `null` to `int`) stay on the literal.
pub struct ApplyCasts {
    predicate: Option<LiteralPredicate>,
}

impl ApplyCasts {
    /// Applies casts on every literal.
    pub fn new() -> Self {
        Self { predicate: None }
    }

    /// Applies casts only on literals for which `predicate` holds.
    pub fn matching(predicate: impl Fn(&Expr) -> bool + Send + Sync + 'static) -> Self {
        Self {
            predicate: Some(Box::new(predicate)),
        }
    }
}

impl Default for ApplyCasts {
    fn default() -> Self {
        Self::new()
    }
}

impl Fold for ApplyCasts {
    fn fold_literal(&self, expr: Expr) -> FoldResult {
        if expr.casts.is_empty() || self.predicate.as_ref().is_some_and(|p| !p(&expr)) {
            return Ok(expr);
        }
        Ok(apply_casts(expr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Evaluator;
    use ferrule_ir::{BinaryOp, PrimitiveType, Type, Value};

    #[test]
    fn applies_all_casts_innermost_first() {
        let e = Expr::literal(Value::Int(400))
            .with_cast(Type::BYTE)
            .with_cast(Type::LONG);
        let folded = ApplyCasts::new().exit(e).unwrap();
        assert_eq!(folded.as_literal(), Some(&Value::Long(-112)));
        assert_eq!(folded.ty, Some(Type::LONG));
        assert!(folded.casts.is_empty());
    }

    #[test]
    fn char_to_float() {
        let e = Expr::literal(Value::Char(97)).with_cast(Type::FLOAT);
        let folded = ApplyCasts::new().exit(e).unwrap();
        assert_eq!(folded.as_literal(), Some(&Value::Float(97.0)));
    }

    #[test]
    fn predicate_limits_rewritten_literals() {
        let only_chars = ApplyCasts::matching(|e| matches!(e.as_literal(), Some(Value::Char(_))));
        let e = Expr::binary(
            BinaryOp::Plus,
            Expr::literal(Value::Char(98)).with_cast(Type::INT),
            Expr::literal(Value::Int(1)).with_cast(Type::LONG),
            None,
        );
        let folded = Evaluator::new(only_chars).evaluate(&e).unwrap();
        let ferrule_ir::ExprKind::Binary { lhs, rhs, .. } = folded.kind else {
            panic!("expected binary");
        };
        assert_eq!(lhs.as_literal(), Some(&Value::Int(98)));
        assert_eq!(rhs.casts.len(), 1);
    }

    #[test]
    fn unconvertible_cast_stays() {
        let e = Expr::literal(Value::Null)
            .with_cast(Type::Boxed(PrimitiveType::Int))
            .with_cast(Type::INT);
        let folded = ApplyCasts::new().exit(e).unwrap();
        assert_eq!(folded.ty, Some(Type::Boxed(PrimitiveType::Int)));
        assert_eq!(folded.expression_type(), Some(&Type::INT));
        assert_eq!(folded.casts.len(), 1);
    }
}
