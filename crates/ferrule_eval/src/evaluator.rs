//! The depth-first driver that runs a [`Fold`] over an expression tree.

use crate::errors::{FoldError, FoldResult};
use crate::fold::Fold;
use ferrule_ir::{Expr, ExprKind, Value};
use rayon::prelude::*;

/// Walks an expression tree and rewrites it with a fold.
///
/// For each node the evaluator calls [`Fold::enter`], rewrites the children
/// of the returned node, and hands the rebuilt node to [`Fold::exit`].
/// Literals, variable reads, and type accesses are leaves; method call
/// arguments are children like operator operands.
///
/// Evaluation never touches shared state, so one evaluator can fold many
/// expressions concurrently (see [`evaluate_all`](Evaluator::evaluate_all)).
#[derive(Debug, Clone, Default)]
pub struct Evaluator<F> {
    fold: F,
}

impl<F: Fold> Evaluator<F> {
    /// Creates an evaluator running `fold` at every node.
    pub fn new(fold: F) -> Self {
        Self { fold }
    }

    /// Returns the fold this evaluator runs.
    pub fn fold(&self) -> &F {
        &self.fold
    }

    /// Folds a copy of `expr`. The input is left untouched.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn evaluate(&self, expr: &Expr) -> FoldResult {
        self.visit(expr.clone())
    }

    /// Folds `expr` in place of the caller.
    pub fn evaluate_owned(&self, expr: Expr) -> FoldResult {
        self.visit(expr)
    }

    /// Folds a copy of `expr`, falling back to the unchanged copy if the
    /// expression turns out to be unevaluable.
    pub fn evaluate_or_keep(&self, expr: &Expr) -> Expr {
        match self.evaluate(expr) {
            Ok(folded) => folded,
            Err(err) => {
                tracing::debug!(%err, "keeping expression unchanged");
                expr.clone()
            }
        }
    }

    /// Folds independent expressions in parallel.
    ///
    /// Results are returned in input order.
    #[tracing::instrument(level = "trace", skip_all, fields(count = exprs.len()))]
    pub fn evaluate_all(&self, exprs: &[Expr]) -> Vec<FoldResult> {
        exprs.par_iter().map(|expr| self.evaluate(expr)).collect()
    }

    fn visit(&self, expr: Expr) -> FoldResult {
        let mut expr = self.fold.enter(expr)?;
        match &mut expr.kind {
            ExprKind::Unary { operand, .. } => self.visit_child(operand)?,
            ExprKind::Binary { lhs, rhs, .. } => {
                self.visit_child(lhs)?;
                self.visit_child(rhs)?;
            }
            ExprKind::Invocation { args, .. } => {
                let folded = std::mem::take(args)
                    .into_iter()
                    .map(|arg| self.visit(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                *args = folded;
            }
            ExprKind::Literal(_) | ExprKind::VariableRead { .. } | ExprKind::TypeAccess(_) => {}
        }
        self.fold.exit(expr)
    }

    fn visit_child(&self, child: &mut Box<Expr>) -> Result<(), FoldError> {
        let taken = std::mem::replace(child.as_mut(), Expr::literal(Value::Null));
        **child = self.visit(taken)?;
        Ok(())
    }
}
