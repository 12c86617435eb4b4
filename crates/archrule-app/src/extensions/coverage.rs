use super::reject_unknown_properties;
use archrule_domain::{Classes, EvaluatedRule, Extension, ExtensionError, Properties};
use archrule_types::ids::EXTENSION_COVERAGE;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// How much of the snapshot the run found problems in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoverageSummary {
    pub classes_analyzed: usize,
    /// Classes named as the subject of at least one violation.
    pub classes_with_violations: usize,
    pub rules_handled: usize,
}

type SummarySlot = Arc<Mutex<Option<CoverageSummary>>>;

/// Collects violation subjects and publishes a [`CoverageSummary`] once the run finishes.
#[derive(Debug, Default)]
pub struct CoverageExtension {
    subjects: BTreeSet<String>,
    rules_handled: usize,
    slot: SummarySlot,
}

impl CoverageExtension {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared slot the summary is written to; keep it before boxing the extension.
    pub fn summary_slot(&self) -> SummarySlot {
        Arc::clone(&self.slot)
    }

    pub fn take_summary(slot: &SummarySlot) -> Option<CoverageSummary> {
        slot.lock().ok().and_then(|mut guard| guard.take())
    }
}

impl Extension for CoverageExtension {
    fn unique_identifier(&self) -> &str {
        EXTENSION_COVERAGE
    }

    fn configure(&mut self, properties: &Properties) -> Result<(), ExtensionError> {
        reject_unknown_properties(properties, &[])?;
        self.subjects.clear();
        self.rules_handled = 0;
        Ok(())
    }

    fn handle(&mut self, evaluated: &EvaluatedRule<'_>) -> Result<(), ExtensionError> {
        self.rules_handled += 1;
        let classes = evaluated.classes();
        self.subjects.extend(
            evaluated
                .result()
                .violations()
                .iter()
                .filter(|v| classes.contains(&v.subject))
                .map(|v| v.subject.clone()),
        );
        Ok(())
    }

    fn on_finish_analyzing_classes(&mut self, classes: &Classes) -> Result<(), ExtensionError> {
        let summary = CoverageSummary {
            classes_analyzed: classes.len(),
            classes_with_violations: self.subjects.len(),
            rules_handled: self.rules_handled,
        };
        tracing::info!(
            classes = summary.classes_analyzed,
            with_violations = summary.classes_with_violations,
            rules = summary.rules_handled,
            "coverage"
        );
        let mut guard = self
            .slot
            .lock()
            .map_err(|_| ExtensionError::new("coverage summary lock poisoned"))?;
        *guard = Some(summary);
        Ok(())
    }
}
