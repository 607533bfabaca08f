//! Fold combinators: sequencing with [`Chain`] and the bundled
//! promotion pass [`PromoteOperands`].

use crate::errors::FoldResult;
use crate::fold::Fold;
use crate::folds::{
    any_operand, literal_operand, ApplyCasts, ApplyOperatorPromotion, OperandPredicate,
};
use ferrule_ir::Expr;

/// Runs several folds as one, in order, at every hook.
///
/// At [`enter`](Fold::enter) each fold's `enter` sees the output of the
/// previous one; [`exit`](Fold::exit) works the same way. The first error
/// stops the chain.
#[derive(Default)]
pub struct Chain<'a> {
    folds: Vec<Box<dyn Fold + 'a>>,
}

/// Creates a chain of the given folds.
pub fn chain<'a>(folds: Vec<Box<dyn Fold + 'a>>) -> Chain<'a> {
    Chain { folds }
}

impl<'a> Chain<'a> {
    /// Creates an empty chain, which behaves like the identity fold.
    pub fn new() -> Self {
        Self { folds: Vec::new() }
    }

    /// Appends a fold and returns the chain.
    pub fn with(mut self, fold: impl Fold + 'a) -> Self {
        self.push(fold);
        self
    }

    /// Appends a fold.
    pub fn push(&mut self, fold: impl Fold + 'a) {
        self.folds.push(Box::new(fold));
    }

    /// Number of chained folds.
    pub fn len(&self) -> usize {
        self.folds.len()
    }

    /// Returns `true` if no fold is chained.
    pub fn is_empty(&self) -> bool {
        self.folds.is_empty()
    }
}

impl Fold for Chain<'_> {
    fn enter(&self, expr: Expr) -> FoldResult {
        self.folds.iter().try_fold(expr, |expr, fold| fold.enter(expr))
    }

    fn exit(&self, expr: Expr) -> FoldResult {
        self.folds.iter().try_fold(expr, |expr, fold| fold.exit(expr))
    }

    fn fold(&self, expr: Expr) -> FoldResult {
        self.folds.iter().try_fold(expr, |expr, fold| fold.fold(expr))
    }
}

impl std::fmt::Debug for Chain<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain").field("len", &self.folds.len()).finish()
    }
}

/// Operator promotion followed by cast application: the operands selected
/// by the predicates are cast to their promoted type, and literal operands
/// are converted right away.
///
/// `(float) 'a' + 1` becomes `97.0F + 1.0F`.
pub struct PromoteOperands {
    chain: Chain<'static>,
}

impl PromoteOperands {
    /// Creates the pass with the predicates for binary and unary operands.
    pub fn new(binary: OperandPredicate, unary: OperandPredicate) -> Self {
        Self {
            chain: Chain::new()
                .with(ApplyOperatorPromotion::new(binary, unary))
                .with(ApplyCasts::new()),
        }
    }

    /// Promotes literal operands only.
    pub fn on_literal_operands() -> Self {
        Self::new(literal_operand(), literal_operand())
    }

    /// Promotes every operand.
    pub fn on_all_operands() -> Self {
        Self::new(any_operand(), any_operand())
    }
}

impl Fold for PromoteOperands {
    fn enter(&self, expr: Expr) -> FoldResult {
        self.chain.enter(expr)
    }

    fn exit(&self, expr: Expr) -> FoldResult {
        self.chain.exit(expr)
    }

    fn fold(&self, expr: Expr) -> FoldResult {
        self.chain.fold(expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Evaluator, FoldError};
    use ferrule_common::Interner;
    use ferrule_ir::{BinaryOp, ExprKind, Type, Value, VarId};

    struct Append(&'static str);

    impl Fold for Append {
        fn fold_literal(&self, mut expr: Expr) -> FoldResult {
            if let ExprKind::Literal(Value::String(s)) = &mut expr.kind {
                s.push_str(self.0);
            }
            Ok(expr)
        }
    }

    struct Fail;

    impl Fold for Fail {
        fn fold_literal(&self, _: Expr) -> FoldResult {
            Err(FoldError::unevaluable("x", "always"))
        }
    }

    #[test]
    fn folds_run_in_order() {
        let folds: Vec<Box<dyn Fold>> = vec![Box::new(Append("a")), Box::new(Append("b"))];
        let c = chain(folds);
        let out = c.exit(Expr::literal(Value::String(String::new()))).unwrap();
        assert_eq!(out.as_literal(), Some(&Value::String("ab".into())));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn empty_chain_is_identity() {
        let c = Chain::new();
        let e = Expr::literal(Value::Int(1));
        assert!(c.is_empty());
        assert_eq!(c.enter(e.clone()).unwrap(), e);
        assert_eq!(c.exit(e.clone()).unwrap(), e);
    }

    #[test]
    fn first_error_stops_the_chain() {
        let c = Chain::new().with(Fail).with(Append("never"));
        assert!(c.exit(Expr::literal(Value::String(String::new()))).is_err());
    }

    #[test]
    fn chain_borrows_from_its_environment() {
        let suffix = String::from("!");
        struct Borrowing<'s>(&'s str);
        impl Fold for Borrowing<'_> {
            fn fold_literal(&self, mut expr: Expr) -> FoldResult {
                if let ExprKind::Literal(Value::String(s)) = &mut expr.kind {
                    s.push_str(self.0);
                }
                Ok(expr)
            }
        }
        let c = Chain::new().with(Borrowing(&suffix));
        let out = c.exit(Expr::literal(Value::String("hi".into()))).unwrap();
        assert_eq!(out.as_literal(), Some(&Value::String("hi!".into())));
    }

    #[test]
    fn promote_operands_converts_literals() {
        let interner = Interner::new();
        let e = Expr::binary(
            BinaryOp::Plus,
            Expr::literal(Value::Char(97)).with_cast(Type::FLOAT),
            Expr::literal(Value::Int(1)),
            Some(Type::FLOAT),
        );
        let promoted = Evaluator::new(PromoteOperands::on_literal_operands())
            .evaluate(&e)
            .unwrap();
        assert_eq!(promoted.display(&interner).to_string(), "97.0F + 1.0F");

        let x = Expr::var_read(VarId::from_raw(0), interner.get_or_intern("x"), Type::SHORT);
        let mixed = Expr::binary(BinaryOp::Mul, x, Expr::literal(Value::Long(2)), Some(Type::LONG));
        let literal_only = Evaluator::new(PromoteOperands::on_literal_operands())
            .evaluate(&mixed)
            .unwrap();
        assert_eq!(literal_only.display(&interner).to_string(), "x * 2L");
        let all = Evaluator::new(PromoteOperands::on_all_operands())
            .evaluate(&mixed)
            .unwrap();
        assert_eq!(all.display(&interner).to_string(), "(long) x * 2L");
    }
}
