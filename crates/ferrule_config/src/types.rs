//! Configuration types deserialized from `ferrule.toml`.

use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// The top-level configuration parsed from `ferrule.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FerruleConfig {
    /// Settings of the expression evaluator.
    pub evaluator: EvaluatorConfig,
}

/// Which folds the evaluator runs, in order, and how they behave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Folds chained into the evaluator, applied in this order at every node.
    pub folds: Vec<FoldKind>,
    /// Whether variable inlining also inlines block-local variables.
    /// Constant fields are inlined regardless.
    pub inline_locals: bool,
    /// Appends redundant-cast removal to the end of the chain.
    pub remove_redundant_casts: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            folds: FoldKind::DEFAULT_CHAIN.to_vec(),
            inline_locals: true,
            remove_redundant_casts: false,
        }
    }
}

/// A named fold that can appear in the `folds` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoldKind {
    /// Collapses `a && (a || b)` and related boolean absorptions.
    ApplyAbsorptionLaw,
    /// Converts literal values through their pending casts.
    ApplyCasts,
    /// Adds casts to the promoted type on literal operands.
    ApplyOperatorPromotion,
    /// Assigns static types to untyped operator nodes.
    InferOperatorTypes,
    /// Evaluates operators whose operands are all literals.
    EvaluateLiteralOperations,
    /// Applies algebraic identities when one operand is a literal.
    EvaluatePartialLiteralOperations,
    /// Cancels `-(-x)` and `!!x`.
    DeduplicateOperatorApplication,
    /// Replaces reads of constant variables by their value.
    InlineVariableRead,
    /// Drops casts the language would apply implicitly.
    RemoveRedundantCasts,
}

impl FoldKind {
    /// The fold order used when the configuration does not list any.
    pub const DEFAULT_CHAIN: [FoldKind; 5] = [
        FoldKind::InferOperatorTypes,
        FoldKind::InlineVariableRead,
        FoldKind::DeduplicateOperatorApplication,
        FoldKind::EvaluatePartialLiteralOperations,
        FoldKind::EvaluateLiteralOperations,
    ];

    /// Every fold, in declaration order.
    pub const ALL: [FoldKind; 9] = [
        FoldKind::ApplyAbsorptionLaw,
        FoldKind::ApplyCasts,
        FoldKind::ApplyOperatorPromotion,
        FoldKind::InferOperatorTypes,
        FoldKind::EvaluateLiteralOperations,
        FoldKind::EvaluatePartialLiteralOperations,
        FoldKind::DeduplicateOperatorApplication,
        FoldKind::InlineVariableRead,
        FoldKind::RemoveRedundantCasts,
    ];

    /// Returns the kebab-case name used in `ferrule.toml`.
    pub fn name(self) -> &'static str {
        match self {
            FoldKind::ApplyAbsorptionLaw => "apply-absorption-law",
            FoldKind::ApplyCasts => "apply-casts",
            FoldKind::ApplyOperatorPromotion => "apply-operator-promotion",
            FoldKind::InferOperatorTypes => "infer-operator-types",
            FoldKind::EvaluateLiteralOperations => "evaluate-literal-operations",
            FoldKind::EvaluatePartialLiteralOperations => "evaluate-partial-literal-operations",
            FoldKind::DeduplicateOperatorApplication => "deduplicate-operator-application",
            FoldKind::InlineVariableRead => "inline-variable-read",
            FoldKind::RemoveRedundantCasts => "remove-redundant-casts",
        }
    }
}

impl fmt::Display for FoldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FoldKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FoldKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConfigError::UnknownFold(s.to_string()))
    }
}

/// `ferrule.toml` as written, before fold names are resolved.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawConfig {
    #[serde(default)]
    pub(crate) evaluator: RawEvaluatorConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawEvaluatorConfig {
    #[serde(default)]
    pub(crate) folds: Option<Vec<String>>,
    #[serde(default)]
    pub(crate) inline_locals: Option<bool>,
    #[serde(default)]
    pub(crate) remove_redundant_casts: Option<bool>,
}

impl RawConfig {
    /// Resolves fold names, filling absent keys with defaults.
    pub(crate) fn resolve(self) -> Result<FerruleConfig, ConfigError> {
        let defaults = EvaluatorConfig::default();
        let raw = self.evaluator;
        let folds = match raw.folds {
            Some(names) => names
                .iter()
                .map(|name| name.parse())
                .collect::<Result<Vec<FoldKind>, _>>()?,
            None => defaults.folds,
        };
        Ok(FerruleConfig {
            evaluator: EvaluatorConfig {
                folds,
                inline_locals: raw.inline_locals.unwrap_or(defaults.inline_locals),
                remove_redundant_casts: raw
                    .remove_redundant_casts
                    .unwrap_or(defaults.remove_redundant_casts),
            },
        })
    }
}
