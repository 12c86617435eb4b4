//! Property-based tests for rule composition.
//!
//! These tests use proptest to verify invariants around:
//! - Composite descriptions joining member descriptions in order
//! - Persistence of composites across `and`
//! - Evaluation order of member violations

use crate::composite::CompositeRule;
use crate::engine::summarize;
use crate::model::Classes;
use crate::rule::Rule;
use crate::test_support::{config, failing_rule};
use archrule_types::{Priority, RuleOutcome, Verdict, Violation};
use proptest::prelude::*;

fn arb_description() -> impl Strategy<Value = String> {
    "[a-z][a-z ]{0,15}"
}

fn arb_messages() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z0-9]{1,8}", 0..4)
}

/// (description, messages) per member, at least one member.
fn arb_members() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
    prop::collection::vec((arb_description(), arb_messages()), 1..6)
}

fn build(members: &[(String, Vec<String>)]) -> CompositeRule {
    let rule = |(d, ms): &(String, Vec<String>)| {
        let ms: Vec<&str> = ms.iter().map(String::as_str).collect();
        failing_rule(d, &ms)
    };
    let mut composite = CompositeRule::of(rule(&members[0]));
    for member in &members[1..] {
        composite = composite.and(rule(member));
    }
    composite
}

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![Just(Priority::Low), Just(Priority::Medium), Just(Priority::High)]
}

proptest! {
    #[test]
    fn description_is_ordered_join(members in arb_members()) {
        let composite = build(&members);
        let expected: Vec<&str> = members.iter().map(|(d, _)| d.as_str()).collect();
        prop_assert_eq!(composite.description(), expected.join(" and "));
    }

    #[test]
    fn violations_follow_member_order(members in arb_members()) {
        let composite = build(&members);
        let expected: Vec<String> = members.iter().flat_map(|(_, ms)| ms.clone()).collect();
        let result = composite.evaluate(&Classes::default());
        let actual: Vec<String> = result.violations().iter().map(|v| v.message.clone()).collect();
        prop_assert_eq!(&actual, &expected);

        let parallel: Vec<String> = composite
            .evaluate_parallel(&Classes::default())
            .violations()
            .iter()
            .map(|v| v.message.clone())
            .collect();
        prop_assert_eq!(parallel, expected);
    }

    #[test]
    fn and_never_changes_the_receiver(
        members in arb_members(),
        extra in arb_description(),
        reason in arb_description(),
    ) {
        let composite = build(&members);
        let before = composite.description().to_string();
        let len = composite.len();
        let own: Vec<String> = members.iter().flat_map(|(_, ms)| ms.clone()).collect();

        let _extended = composite.and(failing_rule(&extra, &["added"]));
        let _justified = composite.because(&reason);
        let _renamed = composite.described_as(&extra);

        prop_assert_eq!(composite.description(), before.as_str());
        prop_assert_eq!(composite.len(), len);
        let after: Vec<String> = composite
            .evaluate(&Classes::default())
            .violations()
            .iter()
            .map(|v| v.message.clone())
            .collect();
        prop_assert_eq!(after, own);
    }

    #[test]
    fn verdict_is_fail_exactly_when_a_violated_rule_reaches_threshold(
        rules in prop::collection::vec((arb_priority(), 0usize..3), 0..6),
        fail_on in arb_priority(),
        max in 0usize..5,
    ) {
        let outcomes: Vec<RuleOutcome> = rules
            .iter()
            .map(|(priority, n)| RuleOutcome {
                description: "r".to_string(),
                priority: *priority,
                violations: (0..*n).map(|i| Violation::new("t", "c", "s", i.to_string())).collect(),
            })
            .collect();
        let mut cfg = config(fail_on);
        cfg.max_violations = max;

        let report = summarize(0, outcomes, &cfg);

        let any_violation = rules.iter().any(|(_, n)| *n > 0);
        let any_failing = rules.iter().any(|(p, n)| *n > 0 && *p >= fail_on);
        let expected = if any_failing {
            Verdict::Fail
        } else if any_violation {
            Verdict::Warn
        } else {
            Verdict::Pass
        };
        prop_assert_eq!(report.verdict, expected);
        prop_assert!(report.data.violations_emitted as usize <= max);
    }
}
