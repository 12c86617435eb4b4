use crate::error::RuleError;
use crate::evaluation::EvaluationResult;
use crate::model::Classes;
use crate::rule::{IntoRuleRef, Rule, RuleRef, because_description};
use archrule_types::Priority;
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;

const AND_SEPARATOR: &str = " and ";

/// An ordered conjunction of rules that behaves as a single rule.
///
/// Composition is persistent: [`CompositeRule::and`] copies the member sequence
/// and appends to the copy, so every composite built along the way keeps its
/// own members. Members are shared, not cloned, and the same rule may appear
/// more than once; it is then evaluated once per occurrence.
///
/// Equality is identity only. Two composites with equal members and
/// description are still distinct values.
#[derive(Clone)]
pub struct CompositeRule {
    rules: Vec<RuleRef>,
    description: String,
}

impl CompositeRule {
    /// Single-member composite. The description is the member's description.
    pub fn of(rule: impl IntoRuleRef) -> Self {
        let rule = rule.into_rule_ref();
        let description = rule.description().to_string();
        Self {
            rules: vec![rule],
            description,
        }
    }

    /// New composite with `rule` appended. The receiver is unchanged.
    pub fn and(&self, rule: impl IntoRuleRef) -> CompositeRule {
        let rule = rule.into_rule_ref();
        let description = format!("{}{AND_SEPARATOR}{}", self.description, rule.description());
        let mut rules = Vec::with_capacity(self.rules.len() + 1);
        rules.extend(self.rules.iter().cloned());
        rules.push(rule);
        CompositeRule { rules, description }
    }

    /// Fold `rules` into a composite, in order. `name` identifies the composite
    /// in the error when `rules` is empty.
    pub fn from_rules<I>(name: &str, rules: I) -> Result<CompositeRule, RuleError>
    where
        I: IntoIterator<Item = RuleRef>,
    {
        let mut iter = rules.into_iter();
        let first = iter.next().ok_or_else(|| RuleError::EmptyComposite {
            name: name.to_string(),
        })?;
        Ok(iter.fold(CompositeRule::of(first), |acc, rule| acc.and(rule)))
    }

    pub fn rules(&self) -> &[RuleRef] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn because(&self, reason: &str) -> CompositeRule {
        CompositeRule {
            rules: self.rules.clone(),
            description: because_description(&self.description, reason),
        }
    }

    pub fn described_as(&self, description: &str) -> CompositeRule {
        CompositeRule {
            rules: self.rules.clone(),
            description: description.to_string(),
        }
    }

    /// Same result as [`Rule::evaluate`], with members evaluated on the rayon pool.
    ///
    /// Member results are collected in member order before merging, so the
    /// violation sequence matches the sequential evaluation.
    pub fn evaluate_parallel(&self, classes: &Classes) -> EvaluationResult<'_> {
        let parts: Vec<EvaluationResult<'_>> = self
            .rules
            .par_iter()
            .map(|rule| rule.evaluate(classes))
            .collect();
        let mut result = EvaluationResult::new(self, Priority::Medium);
        for part in parts {
            result.add(part);
        }
        result
    }
}

impl Rule for CompositeRule {
    fn description(&self) -> &str {
        &self.description
    }

    fn evaluate(&self, classes: &Classes) -> EvaluationResult<'_> {
        let mut result = EvaluationResult::new(self, Priority::Medium);
        for rule in &self.rules {
            result.add(rule.evaluate(classes));
        }
        tracing::debug!(
            rule = %self.description,
            members = self.rules.len(),
            violations = result.violations().len(),
            "evaluated composite rule"
        );
        result
    }

    fn because(&self, reason: &str) -> RuleRef {
        Arc::new(CompositeRule::because(self, reason))
    }

    fn described_as(&self, description: &str) -> RuleRef {
        Arc::new(CompositeRule::described_as(self, description))
    }
}

impl fmt::Debug for CompositeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<&str> = self.rules.iter().map(|r| r.description()).collect();
        f.debug_struct("CompositeRule")
            .field("description", &self.description)
            .field("rules", &members)
            .finish()
    }
}
