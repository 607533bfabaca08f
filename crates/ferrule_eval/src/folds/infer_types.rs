//! Static types for synthesized operator nodes.

use crate::errors::FoldResult;
use crate::fold::Fold;
use crate::numeric::infer_type;
use ferrule_ir::Expr;

/// Assigns a static type to operator nodes that have none.
///
/// Rules synthesize operator nodes without running the type checker; this
/// fold gives them the type the language would, so that later folds always
/// see a typed tree. Nodes whose type cannot be inferred stay untyped.
#[derive(Debug, Clone, Copy, Default)]
pub struct InferOperatorTypes;

impl InferOperatorTypes {
    fn infer(expr: Expr) -> FoldResult {
        if expr.ty.is_some() {
            return Ok(expr);
        }
        let ty = infer_type(&expr);
        if ty.is_none() {
            tracing::debug!("cannot infer operator type");
        }
        Ok(Expr { ty, ..expr })
    }
}

impl Fold for InferOperatorTypes {
    fn fold_unary(&self, expr: Expr) -> FoldResult {
        Self::infer(expr)
    }

    fn fold_binary(&self, expr: Expr) -> FoldResult {
        Self::infer(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Evaluator;
    use ferrule_ir::{BinaryOp, ExprKind, Type, UnaryOp, Value};

    #[test]
    fn types_synthesized_operators_bottom_up() {
        let inner = Expr::binary(
            BinaryOp::Mul,
            Expr::literal(Value::Short(2)),
            Expr::literal(Value::Byte(3)),
            None,
        );
        let outer = Expr::binary(BinaryOp::Minus, inner, Expr::literal(Value::Double(0.5)), None);
        let typed = Evaluator::new(InferOperatorTypes).evaluate(&outer).unwrap();
        assert_eq!(typed.ty, Some(Type::DOUBLE));
        let ExprKind::Binary { lhs, .. } = &typed.kind else {
            panic!("expected binary");
        };
        assert_eq!(lhs.ty, Some(Type::INT));
    }

    #[test]
    fn comparisons_are_boolean() {
        let cmp = Expr::binary(
            BinaryOp::Ge,
            Expr::literal(Value::Long(1)),
            Expr::literal(Value::Int(0)),
            None,
        );
        let typed = InferOperatorTypes.exit(cmp).unwrap();
        assert_eq!(typed.ty, Some(Type::BOOLEAN));
    }

    #[test]
    fn existing_types_are_kept() {
        let e = Expr::unary(UnaryOp::Neg, Expr::literal(Value::Int(1)), Some(Type::LONG));
        assert_eq!(InferOperatorTypes.exit(e.clone()).unwrap(), e);
    }

    #[test]
    fn uninferable_stays_untyped() {
        let e = Expr::unary(UnaryOp::Neg, Expr::literal(Value::Bool(true)), None);
        assert_eq!(InferOperatorTypes.exit(e).unwrap().ty, None);
    }
}
