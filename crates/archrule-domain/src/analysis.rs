use crate::assertions::assert_no_violation;
use crate::error::{CheckError, ExtensionFailure};
use crate::evaluation::EvaluationResult;
use crate::extension::{EvaluatedRule, ExtensionConfig, ExtensionRegistry};
use crate::model::Classes;
use crate::rule::Rule;
use archrule_types::RuleOutcome;
use regex::RegexSet;

/// One pass of checking rules against a snapshot with extensions attached.
///
/// [`AnalysisRun::start`] configures every registered extension once. Each
/// checked rule is then evaluated, filtered through the ignore patterns and
/// handed to every extension before its outcome is decided.
/// [`AnalysisRun::finish`] consumes the run so the finish notification can
/// only be sent once.
pub struct AnalysisRun<'a> {
    registry: &'a mut ExtensionRegistry,
    classes: &'a Classes,
    ignore: Option<RegexSet>,
    rules_checked: usize,
}

impl<'a> AnalysisRun<'a> {
    pub fn start(
        registry: &'a mut ExtensionRegistry,
        config: &ExtensionConfig,
        classes: &'a Classes,
    ) -> Result<Self, ExtensionFailure> {
        registry.configure_all(config)?;
        tracing::debug!(
            extensions = registry.len(),
            classes = classes.len(),
            "analysis run started"
        );
        Ok(Self {
            registry,
            classes,
            ignore: None,
            rules_checked: 0,
        })
    }

    /// Drop violations whose message matches any pattern in `patterns`.
    pub fn ignoring(mut self, patterns: RegexSet) -> Self {
        self.ignore = (!patterns.is_empty()).then_some(patterns);
        self
    }

    pub fn classes(&self) -> &'a Classes {
        self.classes
    }

    /// Evaluate, notify extensions, and fail on any remaining violation.
    pub fn check<R: Rule + ?Sized>(&mut self, rule: &R) -> Result<(), CheckError> {
        let result = self.evaluate(rule)?;
        assert_no_violation(&result)?;
        Ok(())
    }

    /// Like [`AnalysisRun::check`] but returns the outcome instead of failing.
    pub fn report<R: Rule + ?Sized>(&mut self, rule: &R) -> Result<RuleOutcome, ExtensionFailure> {
        let result = self.evaluate(rule)?;
        Ok(result.into_outcome())
    }

    pub fn finish(self) -> Result<(), ExtensionFailure> {
        self.registry.finish_all(self.classes)?;
        tracing::debug!(rules = self.rules_checked, "analysis run finished");
        Ok(())
    }

    fn evaluate<'r, R: Rule + ?Sized>(
        &mut self,
        rule: &'r R,
    ) -> Result<EvaluationResult<'r>, ExtensionFailure> {
        let classes = self.classes;
        let mut result = rule.evaluate(classes);
        if let Some(ignore) = &self.ignore {
            let before = result.violations().len();
            result = result.filter_messages(|m| !ignore.is_match(m));
            let dropped = before - result.violations().len();
            if dropped > 0 {
                tracing::debug!(rule = %rule.description(), dropped, "ignored violations");
            }
        }
        tracing::debug!(
            rule = %rule.description(),
            priority = %result.priority(),
            violations = result.violations().len(),
            "evaluated rule"
        );
        self.rules_checked += 1;
        let evaluated = EvaluatedRule::new(result.rule(), classes, &result);
        self.registry.dispatch(&evaluated)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::CompositeRule;
    use crate::extension::{ExtensionPhase, Properties};
    use crate::test_support::{Recorder, RecordingExtension, failing_rule, passing_rule};

    fn registry_with(log: &Recorder, ids: &[&str]) -> ExtensionRegistry {
        let mut registry = ExtensionRegistry::new();
        for id in ids {
            registry
                .register(Box::new(RecordingExtension::new(id, log)))
                .expect("register");
        }
        registry
    }

    #[test]
    fn lifecycle_is_configure_then_handle_per_rule_then_finish() {
        let log = Recorder::default();
        let mut registry = registry_with(&log, &["ext"]);
        let classes = Classes::default();
        let mut config = ExtensionConfig::new();
        config.insert(
            "ext".to_string(),
            Properties::from([("mode".to_string(), "strict".to_string())]),
        );

        let mut run = AnalysisRun::start(&mut registry, &config, &classes).expect("start");
        run.check(&passing_rule("first")).expect("passes");
        let err = run.check(&failing_rule("second", &["m"])).expect_err("violated");
        assert!(matches!(err, CheckError::Violated(_)));
        run.finish().expect("finish");

        assert_eq!(
            log.events(),
            vec![
                "ext:configure:mode=strict".to_string(),
                "ext:handle:first:0".to_string(),
                "ext:handle:second:1".to_string(),
                "ext:finish".to_string(),
            ]
        );
    }

    #[test]
    fn extensions_see_the_composite_not_its_members() {
        let log = Recorder::default();
        let mut registry = registry_with(&log, &["ext"]);
        let classes = Classes::default();
        let composite = CompositeRule::of(failing_rule("a", &["x"])).and(failing_rule("b", &["y"]));

        let mut run = AnalysisRun::start(&mut registry, &ExtensionConfig::new(), &classes)
            .expect("start");
        let outcome = run.report(&composite).expect("report");
        run.finish().expect("finish");

        assert_eq!(outcome.description, "a and b");
        assert_eq!(outcome.violations.len(), 2);
        assert!(log.events().contains(&"ext:handle:a and b:2".to_string()));
    }

    #[test]
    fn ignore_patterns_filter_before_dispatch_and_assert() {
        let log = Recorder::default();
        let mut registry = registry_with(&log, &["ext"]);
        let classes = Classes::default();
        let patterns = RegexSet::new(["^generated"]).expect("regex");

        let mut run = AnalysisRun::start(&mut registry, &ExtensionConfig::new(), &classes)
            .expect("start")
            .ignoring(patterns);
        run.check(&failing_rule("r", &["generated code"])).expect("ignored");
        let err = run
            .check(&failing_rule("r2", &["generated", "real problem"]))
            .expect_err("still violated");
        let CheckError::Violated(assertion) = err else {
            panic!("expected violation");
        };
        assert_eq!(assertion.report.messages, vec!["real problem".to_string()]);
        assert_eq!(
            log.events(),
            vec![
                "ext:configure:".to_string(),
                "ext:handle:r:0".to_string(),
                "ext:handle:r2:1".to_string(),
            ]
        );
    }

    #[test]
    fn extension_failure_aborts_check() {
        let log = Recorder::default();
        let mut registry = ExtensionRegistry::new();
        registry
            .register(Box::new(
                RecordingExtension::new("broken", &log).failing_on(ExtensionPhase::Handle),
            ))
            .expect("register");
        let classes = Classes::default();

        let mut run = AnalysisRun::start(&mut registry, &ExtensionConfig::new(), &classes)
            .expect("start");
        let err = run.check(&passing_rule("ok")).expect_err("extension fails");
        let CheckError::Extension(failure) = err else {
            panic!("expected extension failure");
        };
        assert_eq!(failure.identifier, "broken");
        assert_eq!(failure.phase, ExtensionPhase::Handle);
    }

    #[test]
    fn configure_failure_prevents_start() {
        let log = Recorder::default();
        let mut registry = ExtensionRegistry::new();
        registry
            .register(Box::new(
                RecordingExtension::new("picky", &log).failing_on(ExtensionPhase::Configure),
            ))
            .expect("register");
        let classes = Classes::default();

        let err = AnalysisRun::start(&mut registry, &ExtensionConfig::new(), &classes)
            .err()
            .expect("configure fails");
        assert_eq!(err.phase, ExtensionPhase::Configure);
    }
}
