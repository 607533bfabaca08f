//! The redundant-cast cleanup as a fold.

use crate::casts::remove_redundant_casts;
use crate::errors::FoldResult;
use crate::fold::Fold;
use ferrule_ir::Expr;

/// Drops casts the language would perform implicitly, on every node.
///
/// See [`remove_redundant_casts`] for the exact rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveRedundantCasts;

impl Fold for RemoveRedundantCasts {
    fn fold(&self, expr: Expr) -> FoldResult {
        if expr.casts.is_empty() {
            return Ok(expr);
        }
        Ok(remove_redundant_casts(expr))
    }
}
