use crate::rule::Rule;
use archrule_types::{Priority, RuleOutcome, Violation};
use std::fmt;

/// Violations found by one evaluation pass of a rule.
///
/// Created fresh by every `evaluate` call. Sub-results are merged with
/// [`EvaluationResult::add`] in the order they are produced, so the
/// violation order is reproducible for an unchanged snapshot.
pub struct EvaluationResult<'r> {
    rule: &'r dyn Rule,
    priority: Priority,
    violations: Vec<Violation>,
}

impl<'r> EvaluationResult<'r> {
    pub fn new(rule: &'r dyn Rule, priority: Priority) -> Self {
        Self {
            rule,
            priority,
            violations: Vec::new(),
        }
    }

    pub fn with_violations(rule: &'r dyn Rule, priority: Priority, violations: Vec<Violation>) -> Self {
        Self {
            rule,
            priority,
            violations,
        }
    }

    /// Append the violations of `part` after the ones already held.
    pub fn add(&mut self, part: EvaluationResult<'_>) {
        self.violations.extend(part.violations);
    }

    pub fn rule(&self) -> &'r dyn Rule {
        self.rule
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn has_violation(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Keep only violations whose message satisfies `keep`.
    pub fn filter_messages<F>(self, keep: F) -> EvaluationResult<'r>
    where
        F: Fn(&str) -> bool,
    {
        let violations = self
            .violations
            .into_iter()
            .filter(|v| keep(&v.message))
            .collect();
        EvaluationResult {
            rule: self.rule,
            priority: self.priority,
            violations,
        }
    }

    pub fn failure_report(&self) -> FailureReport {
        FailureReport {
            description: self.rule.description().to_string(),
            priority: self.priority,
            messages: self.violations.iter().map(|v| v.message.clone()).collect(),
        }
    }

    pub fn to_outcome(&self) -> RuleOutcome {
        RuleOutcome {
            description: self.rule.description().to_string(),
            priority: self.priority,
            violations: self.violations.clone(),
        }
    }

    pub fn into_outcome(self) -> RuleOutcome {
        RuleOutcome {
            description: self.rule.description().to_string(),
            priority: self.priority,
            violations: self.violations,
        }
    }
}

impl fmt::Debug for EvaluationResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationResult")
            .field("rule", &self.rule.description())
            .field("priority", &self.priority)
            .field("violations", &self.violations)
            .finish()
    }
}

/// What a failed check reports: description, priority, and every violation
/// message in evaluation order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailureReport {
    pub description: String,
    pub priority: Priority,
    pub messages: Vec<String>,
}

impl FailureReport {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let times = if self.messages.len() == 1 { "time" } else { "times" };
        write!(
            f,
            "Architecture Violation [Priority: {}] - Rule '{}' was violated ({} {}):",
            self.priority,
            self.description,
            self.messages.len(),
            times
        )?;
        for message in &self.messages {
            write!(f, "\n{message}")?;
        }
        Ok(())
    }
}
