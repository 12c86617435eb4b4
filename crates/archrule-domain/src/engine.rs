use crate::analysis::AnalysisRun;
use crate::error::AnalysisError;
use crate::extension::{ExtensionConfig, ExtensionRegistry};
use crate::model::Classes;
use crate::policy::EffectiveConfig;
use crate::report::DomainReport;
use crate::rule::RuleRef;
use archrule_types::{ArchruleData, Priority, PriorityCounts, RuleOutcome, Verdict};
use regex::RegexSet;

/// Check every rule in order within one analysis run and summarize the outcomes.
pub fn run_analysis(
    classes: &Classes,
    rules: &[RuleRef],
    registry: &mut ExtensionRegistry,
    extension_config: &ExtensionConfig,
    cfg: &EffectiveConfig,
) -> Result<DomainReport, AnalysisError> {
    let ignore = RegexSet::new(&cfg.ignore_patterns)?;

    let mut run = AnalysisRun::start(registry, extension_config, classes)?.ignoring(ignore);
    let mut outcomes = Vec::with_capacity(rules.len());
    for rule in rules {
        outcomes.push(run.report(&**rule)?);
    }
    run.finish()?;

    Ok(summarize(classes.len(), outcomes, cfg))
}

/// Verdict, truncation and counts for a list of rule outcomes in check order.
///
/// The verdict looks at every violation; truncation only limits what is
/// emitted and keeps evaluation order.
pub fn summarize(
    classes_analyzed: usize,
    mut outcomes: Vec<RuleOutcome>,
    cfg: &EffectiveConfig,
) -> DomainReport {
    let verdict = compute_verdict(&outcomes, cfg.fail_on);
    let total: usize = outcomes.iter().map(|o| o.violations.len()).sum();
    let rules_failed = outcomes.iter().filter(|o| !o.passed()).count();

    let mut remaining = cfg.max_violations;
    for outcome in &mut outcomes {
        outcome.violations.truncate(remaining);
        remaining -= outcome.violations.len();
    }
    let emitted: usize = outcomes.iter().map(|o| o.violations.len()).sum();
    let truncated_reason = (emitted < total).then(|| {
        format!(
            "violations truncated to max_violations={}",
            cfg.max_violations
        )
    });

    let counts = PriorityCounts::from_outcomes(&outcomes);
    tracing::debug!(
        ?verdict,
        rules = outcomes.len(),
        rules_failed,
        total,
        emitted,
        "summarized analysis"
    );

    let data = ArchruleData {
        profile: cfg.profile.clone(),
        fail_on: cfg.fail_on,
        classes_analyzed: classes_analyzed as u32,
        rules_checked: outcomes.len() as u32,
        rules_failed: rules_failed as u32,
        violations_total: total as u32,
        violations_emitted: emitted as u32,
        counts: counts.clone(),
        truncated_reason,
    };

    DomainReport {
        verdict,
        outcomes,
        data,
        counts,
    }
}

fn compute_verdict(outcomes: &[RuleOutcome], fail_on: Priority) -> Verdict {
    let mut violated = outcomes.iter().filter(|o| !o.passed()).peekable();
    if violated.peek().is_none() {
        return Verdict::Pass;
    }
    if violated.any(|o| o.priority >= fail_on) {
        Verdict::Fail
    } else {
        Verdict::Warn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::CompositeRule;
    use crate::test_support::{Recorder, RecordingExtension, config, failing_rule, passing_rule};
    use archrule_types::Violation;
    use std::sync::Arc;

    fn outcome(priority: Priority, messages: &[&str]) -> RuleOutcome {
        RuleOutcome {
            description: "r".to_string(),
            priority,
            violations: messages
                .iter()
                .map(|m| Violation::new("test.rule", "test", "a.B", *m))
                .collect(),
        }
    }

    #[test]
    fn verdict_pass_without_violations() {
        let cfg = config(Priority::Medium);
        let report = summarize(3, vec![outcome(Priority::High, &[])], &cfg);
        assert_eq!(report.verdict, Verdict::Pass);
        assert_eq!(report.data.rules_failed, 0);
        assert_eq!(report.data.classes_analyzed, 3);
    }

    #[test]
    fn verdict_warn_below_threshold_fail_at_or_above() {
        let cfg = config(Priority::Medium);
        let warn = summarize(0, vec![outcome(Priority::Low, &["x"])], &cfg);
        assert_eq!(warn.verdict, Verdict::Warn);

        let fail = summarize(
            0,
            vec![outcome(Priority::Low, &["x"]), outcome(Priority::Medium, &["y"])],
            &cfg,
        );
        assert_eq!(fail.verdict, Verdict::Fail);
    }

    #[test]
    fn truncation_keeps_evaluation_order_and_counts_emitted() {
        let mut cfg = config(Priority::High);
        cfg.max_violations = 3;
        let report = summarize(
            0,
            vec![
                outcome(Priority::Low, &["z1", "z2"]),
                outcome(Priority::High, &["a1", "a2"]),
            ],
            &cfg,
        );

        let emitted: Vec<&str> = report
            .outcomes
            .iter()
            .flat_map(|o| o.violations.iter().map(|v| v.message.as_str()))
            .collect();
        assert_eq!(emitted, vec!["z1", "z2", "a1"]);
        assert_eq!(report.data.violations_total, 4);
        assert_eq!(report.data.violations_emitted, 3);
        assert_eq!(report.counts.low, 2);
        assert_eq!(report.counts.high, 1);
        assert_eq!(
            report.data.truncated_reason.as_deref(),
            Some("violations truncated to max_violations=3")
        );
        assert_eq!(report.verdict, Verdict::Fail);
    }

    #[test]
    fn verdict_counts_violations_dropped_by_truncation() {
        let mut cfg = config(Priority::High);
        cfg.max_violations = 1;
        let report = summarize(
            0,
            vec![outcome(Priority::Low, &["l"]), outcome(Priority::High, &["h"])],
            &cfg,
        );
        assert_eq!(report.verdict, Verdict::Fail);
        assert!(report.outcomes[1].violations.is_empty());
    }

    #[test]
    fn run_analysis_reports_rules_in_order_and_finishes_extensions() {
        let log = Recorder::default();
        let mut registry = ExtensionRegistry::new();
        registry
            .register(Box::new(RecordingExtension::new("ext", &log)))
            .expect("register");
        let classes = Classes::default();
        let rules: Vec<RuleRef> = vec![
            Arc::new(CompositeRule::of(failing_rule("a", &["x"])).and(passing_rule("b"))),
            Arc::new(passing_rule("c")),
        ];
        let mut cfg = config(Priority::Medium);
        cfg.ignore_patterns = vec!["^never$".to_string()];

        let report = run_analysis(&classes, &rules, &mut registry, &ExtensionConfig::new(), &cfg)
            .expect("run");

        let descriptions: Vec<&str> = report.outcomes.iter().map(|o| o.description.as_str()).collect();
        assert_eq!(descriptions, vec!["a and b", "c"]);
        assert_eq!(report.verdict, Verdict::Fail);
        assert_eq!(log.events().last().map(String::as_str), Some("ext:finish"));
    }

    #[test]
    fn invalid_ignore_pattern_is_an_error() {
        let mut registry = ExtensionRegistry::new();
        let mut cfg = config(Priority::Medium);
        cfg.ignore_patterns = vec!["(".to_string()];
        let err = run_analysis(
            &Classes::default(),
            &[],
            &mut registry,
            &ExtensionConfig::new(),
            &cfg,
        )
        .expect_err("bad regex");
        assert!(matches!(err, AnalysisError::IgnorePattern(_)));
    }
}
