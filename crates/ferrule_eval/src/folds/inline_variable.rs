//! Inlining of constant variables.

use crate::casts::{apply_casts, cast_literal};
use crate::errors::FoldResult;
use crate::fold::Fold;
use ferrule_ir::{DeclKind, Expr, SemanticModel};

/// Replaces reads of constant variables by their literal initializer.
///
/// A variable is constant if it is never reassigned and is initialized with
/// a literal. Fields must also be `final`, since they can be assigned from
/// anywhere in the class. Parameters are never inlined. Block-local
/// variables are inlined only if `inline_locals` is set.
///
/// The inlined literal is converted to the declared type, so `long n = 5;`
/// turns a read of `n` into `5L`.
pub struct InlineVariableRead<'a> {
    model: &'a dyn SemanticModel,
    inline_locals: bool,
}

impl<'a> InlineVariableRead<'a> {
    /// Creates the fold over a semantic model.
    pub fn new(model: &'a dyn SemanticModel, inline_locals: bool) -> Self {
        Self {
            model,
            inline_locals,
        }
    }
}

impl Fold for InlineVariableRead<'_> {
    fn fold_variable_read(&self, expr: Expr) -> FoldResult {
        let Some(decl) = self.model.resolve_declaration(&expr) else {
            return Ok(expr);
        };
        let eligible = match decl.kind {
            DeclKind::Parameter => false,
            DeclKind::Local => self.inline_locals,
            DeclKind::Field { .. } => decl.is_final,
        };
        if !eligible || !self.model.is_effectively_final(decl) {
            return Ok(expr);
        }
        let Some(init) = self.model.initializer(decl).filter(|init| init.is_literal()) else {
            return Ok(expr);
        };
        let mut value = cast_literal(&decl.ty, apply_casts(init.clone()));
        tracing::trace!(value = ?value.as_literal(), "inlined constant variable");
        value.casts.extend(expr.casts);
        Ok(value)
    }
}
