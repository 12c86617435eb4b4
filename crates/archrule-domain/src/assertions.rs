//! Turn evaluation results into pass/fail outcomes.

use crate::error::AssertionError;
use crate::evaluation::EvaluationResult;
use crate::model::Classes;
use crate::rule::Rule;

/// Evaluate `rule` against `classes` and fail if anything was violated.
pub fn check<R: Rule + ?Sized>(rule: &R, classes: &Classes) -> Result<(), AssertionError> {
    let result = rule.evaluate(classes);
    assert_no_violation(&result)
}

pub fn assert_no_violation(result: &EvaluationResult<'_>) -> Result<(), AssertionError> {
    if !result.has_violation() {
        return Ok(());
    }
    tracing::debug!(
        rule = %result.rule().description(),
        violations = result.violations().len(),
        "rule violated"
    );
    Err(AssertionError {
        report: result.failure_report(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{failing_rule, passing_rule};
    use archrule_types::Priority;

    #[test]
    fn passing_result_is_ok() {
        assert!(check(&passing_rule("fine"), &Classes::default()).is_ok());
    }

    #[test]
    fn failure_lists_every_message_in_order() {
        let rule = failing_rule("ordered", &["first", "second", "third"]);
        let err = check(&rule, &Classes::default()).expect_err("violated");
        assert_eq!(err.report.priority, Priority::Medium);
        assert_eq!(err.report.messages, vec!["first", "second", "third"]);
        let text = err.to_string();
        assert!(text.starts_with("Architecture Violation [Priority: MEDIUM] - Rule 'ordered'"));
        assert!(text.ends_with("first\nsecond\nthird"));
    }

    #[test]
    fn works_through_trait_objects() {
        let rule: &dyn Rule = &failing_rule("dyn", &["m"]);
        assert!(check(rule, &Classes::default()).is_err());
    }
}
