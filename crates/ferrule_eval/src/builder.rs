//! Evaluators assembled from configuration.

use crate::chain::{chain, Chain};
use crate::errors::FoldResult;
use crate::evaluator::Evaluator;
use crate::fold::Fold;
use crate::folds::{
    ApplyAbsorptionLaw, ApplyCasts, ApplyOperatorPromotion, DeduplicateOperatorApplication,
    EvaluateLiteralOperations, EvaluatePartialLiteralOperations, InferOperatorTypes,
    InlineVariableRead, RemoveRedundantCasts,
};
use ferrule_config::{EvaluatorConfig, FerruleConfig, FoldKind};
use ferrule_ir::{Expr, SemanticModel};

fn make_fold<'a>(
    kind: FoldKind,
    config: &EvaluatorConfig,
    model: &'a dyn SemanticModel,
) -> Box<dyn Fold + 'a> {
    match kind {
        FoldKind::ApplyAbsorptionLaw => Box::new(ApplyAbsorptionLaw),
        FoldKind::ApplyCasts => Box::new(ApplyCasts::new()),
        FoldKind::ApplyOperatorPromotion => {
            Box::new(ApplyOperatorPromotion::on_literal_operands())
        }
        FoldKind::InferOperatorTypes => Box::new(InferOperatorTypes),
        FoldKind::EvaluateLiteralOperations => Box::new(EvaluateLiteralOperations::new()),
        FoldKind::EvaluatePartialLiteralOperations => {
            Box::new(EvaluatePartialLiteralOperations::new())
        }
        FoldKind::DeduplicateOperatorApplication => {
            Box::new(DeduplicateOperatorApplication::new())
        }
        FoldKind::InlineVariableRead => {
            Box::new(InlineVariableRead::new(model, config.inline_locals))
        }
        FoldKind::RemoveRedundantCasts => Box::new(RemoveRedundantCasts),
    }
}

/// Builds the evaluator described by the `[evaluator]` section of a configuration.
///
/// Folds are chained in the configured order. With `remove_redundant_casts`
/// set, [`RemoveRedundantCasts`] is appended unless it is already listed.
pub fn build_evaluator<'a>(
    config: &FerruleConfig,
    model: &'a dyn SemanticModel,
) -> Evaluator<Chain<'a>> {
    let settings = &config.evaluator;
    let mut kinds = settings.folds.clone();
    if settings.remove_redundant_casts && !kinds.contains(&FoldKind::RemoveRedundantCasts) {
        kinds.push(FoldKind::RemoveRedundantCasts);
    }
    tracing::debug!(folds = ?kinds, "building evaluator");
    let folds = kinds
        .into_iter()
        .map(|kind| make_fold(kind, settings, model))
        .collect();
    Evaluator::new(chain(folds))
}

/// The default fold chain: type inference, variable inlining (locals
/// included), double-operator cancellation, identity laws, and literal
/// evaluation.
pub fn default_chain(model: &dyn SemanticModel) -> Chain<'_> {
    Chain::new()
        .with(InferOperatorTypes)
        .with(InlineVariableRead::new(model, true))
        .with(DeduplicateOperatorApplication::new())
        .with(EvaluatePartialLiteralOperations::new())
        .with(EvaluateLiteralOperations::new())
}

/// An evaluator over [`default_chain`].
pub fn default_evaluator(model: &dyn SemanticModel) -> Evaluator<Chain<'_>> {
    Evaluator::new(default_chain(model))
}

/// Resolves reads of constant variables in `expr`, locals included, without
/// otherwise simplifying it.
pub fn resolve_constant(expr: &Expr, model: &dyn SemanticModel) -> FoldResult {
    Evaluator::new(InlineVariableRead::new(model, true)).evaluate(expr)
}
