//! The [`Fold`] trait: one rewrite strategy over expression nodes.

use crate::errors::FoldResult;
use ferrule_ir::{Expr, NodeKind};

/// A rewrite strategy applied to every node of an expression tree.
///
/// The [`Evaluator`](crate::Evaluator) calls [`enter`](Fold::enter) on a node
/// before its children are visited and [`exit`](Fold::exit) after the
/// rewritten children have been put back. Every hook defaults to returning
/// its input, so a fold overrides only the node kinds it cares about.
///
/// Hooks take the node by value and return the replacement. Returning an
/// error aborts the whole evaluation; a fold that does not apply returns the
/// node unchanged instead.
pub trait Fold: Send + Sync {
    /// Called before the children of `expr` are visited.
    fn enter(&self, expr: Expr) -> FoldResult {
        Ok(expr)
    }

    /// Called after the children of `expr` have been folded. Defaults to [`fold`](Fold::fold).
    fn exit(&self, expr: Expr) -> FoldResult {
        self.fold(expr)
    }

    /// Dispatches on the node kind.
    fn fold(&self, expr: Expr) -> FoldResult {
        match expr.node_kind() {
            NodeKind::Literal => self.fold_literal(expr),
            NodeKind::Unary => self.fold_unary(expr),
            NodeKind::Binary => self.fold_binary(expr),
            NodeKind::VariableRead => self.fold_variable_read(expr),
            NodeKind::Invocation => self.fold_invocation(expr),
            NodeKind::TypeAccess => self.fold_type_access(expr),
        }
    }

    /// Folds a literal.
    fn fold_literal(&self, expr: Expr) -> FoldResult {
        Ok(expr)
    }

    /// Folds a unary operator application.
    fn fold_unary(&self, expr: Expr) -> FoldResult {
        Ok(expr)
    }

    /// Folds a binary operator application.
    fn fold_binary(&self, expr: Expr) -> FoldResult {
        Ok(expr)
    }

    /// Folds a variable read.
    fn fold_variable_read(&self, expr: Expr) -> FoldResult {
        Ok(expr)
    }

    /// Folds a method call.
    fn fold_invocation(&self, expr: Expr) -> FoldResult {
        Ok(expr)
    }

    /// Folds a type access.
    fn fold_type_access(&self, expr: Expr) -> FoldResult {
        Ok(expr)
    }
}

impl<F: Fold + ?Sized> Fold for Box<F> {
    fn enter(&self, expr: Expr) -> FoldResult {
        (**self).enter(expr)
    }

    fn exit(&self, expr: Expr) -> FoldResult {
        (**self).exit(expr)
    }

    fn fold(&self, expr: Expr) -> FoldResult {
        (**self).fold(expr)
    }
}

impl<F: Fold + ?Sized> Fold for &F {
    fn enter(&self, expr: Expr) -> FoldResult {
        (**self).enter(expr)
    }

    fn exit(&self, expr: Expr) -> FoldResult {
        (**self).exit(expr)
    }

    fn fold(&self, expr: Expr) -> FoldResult {
        (**self).fold(expr)
    }
}
