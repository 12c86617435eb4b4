//! Pure rule composition and evaluation (no IO).
//!
//! Input: a code-model snapshot constructed elsewhere, plus rules built from it.
//! Output: evaluation results, reported failures, and a run summary.

#![forbid(unsafe_code)]

pub mod analysis;
pub mod assertions;
pub mod catalog;
pub mod checks;
pub mod composite;
pub mod error;
pub mod evaluation;
pub mod extension;
pub mod fingerprint;
pub mod model;
pub mod policy;
pub mod report;
pub mod rule;

mod engine;

#[cfg(test)]
mod properties;
#[cfg(test)]
mod test_support;

pub use analysis::AnalysisRun;
pub use catalog::RuleCatalog;
pub use composite::CompositeRule;
pub use engine::{run_analysis, summarize};
pub use error::{
    AnalysisError, AssertionError, CheckError, ExtensionError, ExtensionFailure, RegistryError,
    RuleError,
};
pub use evaluation::{EvaluationResult, FailureReport};
pub use extension::{
    EvaluatedRule, Extension, ExtensionConfig, ExtensionPhase, ExtensionRegistry, Properties,
};
pub use model::{ClassModel, Classes, FieldModel};
pub use rule::{ArchRule, IntoRuleRef, Rule, RuleRef, because_description};
