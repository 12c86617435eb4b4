use crate::assertions;
use crate::error::AssertionError;
use crate::evaluation::EvaluationResult;
use crate::fingerprint::fingerprint_for_violation;
use crate::model::{ClassModel, Classes};
use archrule_types::{Priority, Violation};
use std::fmt;
use std::sync::Arc;

/// Shared handle to any rule, primitive or composite.
pub type RuleRef = Arc<dyn Rule>;

/// A checkable unit: a description, a priority, and an evaluation over a snapshot.
///
/// Rules are immutable. `because` and `described_as` return new rules and leave
/// the receiver untouched, so a rule handed to one caller cannot be altered by
/// another holding a derived value.
pub trait Rule: Send + Sync {
    fn description(&self) -> &str;

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    /// Evaluate against `classes`. Violations are recorded, never raised.
    fn evaluate(&self, classes: &Classes) -> EvaluationResult<'_>;

    /// Evaluate and turn any violation into an [`AssertionError`].
    ///
    /// Extensions are not notified here; [`AnalysisRun::check`](crate::AnalysisRun::check)
    /// dispatches to registered extensions before asserting.
    fn check(&self, classes: &Classes) -> Result<(), AssertionError> {
        assertions::check(self, classes)
    }

    fn because(&self, reason: &str) -> RuleRef;

    /// Replace the description verbatim.
    fn described_as(&self, description: &str) -> RuleRef;
}

/// Justification suffix shared by primitive and composite rules.
pub fn because_description(description: &str, reason: &str) -> String {
    format!("{description} because {reason}")
}

/// Conversion into a shared rule handle, so combinators accept both owned rules
/// and existing [`RuleRef`]s without double wrapping.
pub trait IntoRuleRef {
    fn into_rule_ref(self) -> RuleRef;
}

impl<R: Rule + 'static> IntoRuleRef for R {
    fn into_rule_ref(self) -> RuleRef {
        Arc::new(self)
    }
}

impl IntoRuleRef for RuleRef {
    fn into_rule_ref(self) -> RuleRef {
        self
    }
}

type Condition = dyn Fn(&Classes, &mut Vec<Violation>) + Send + Sync;

/// A primitive rule: an id, a description, a priority, and a condition that
/// appends violations for the subjects it rejects.
#[derive(Clone)]
pub struct ArchRule {
    id: String,
    description: String,
    priority: Priority,
    condition: Arc<Condition>,
}

impl ArchRule {
    pub fn new<F>(id: impl Into<String>, description: impl Into<String>, condition: F) -> Self
    where
        F: Fn(&Classes, &mut Vec<Violation>) + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            description: description.into(),
            priority: Priority::default(),
            condition: Arc::new(condition),
        }
    }

    /// Rule that inspects each class on its own. `reject` returns a message for
    /// every class that violates the rule.
    pub fn for_each_class<F>(
        id: impl Into<String>,
        code: impl Into<String>,
        description: impl Into<String>,
        reject: F,
    ) -> Self
    where
        F: Fn(&ClassModel) -> Option<String> + Send + Sync + 'static,
    {
        let id = id.into();
        let code = code.into();
        let rule_id = id.clone();
        Self::new(id, description, move |classes, out| {
            for class in classes {
                if let Some(message) = reject(class) {
                    out.push(
                        Violation::new(&rule_id, &code, &class.name, message)
                            .with_location(class.location()),
                    );
                }
            }
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn with_priority(&self, priority: Priority) -> ArchRule {
        ArchRule {
            priority,
            ..self.clone()
        }
    }

    pub fn because(&self, reason: &str) -> ArchRule {
        ArchRule {
            description: because_description(&self.description, reason),
            ..self.clone()
        }
    }

    pub fn described_as(&self, description: &str) -> ArchRule {
        ArchRule {
            description: description.to_string(),
            ..self.clone()
        }
    }
}

impl Rule for ArchRule {
    fn description(&self) -> &str {
        &self.description
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn evaluate(&self, classes: &Classes) -> EvaluationResult<'_> {
        let mut violations = Vec::new();
        (self.condition)(classes, &mut violations);
        for v in &mut violations {
            if v.fingerprint.is_none() {
                v.fingerprint = Some(fingerprint_for_violation(
                    &v.rule_id,
                    &v.code,
                    &v.subject,
                    &v.message,
                ));
            }
        }
        EvaluationResult::with_violations(self, self.priority, violations)
    }

    fn because(&self, reason: &str) -> RuleRef {
        Arc::new(ArchRule::because(self, reason))
    }

    fn described_as(&self, description: &str) -> RuleRef {
        Arc::new(ArchRule::described_as(self, description))
    }
}

impl fmt::Debug for ArchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchRule")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}
