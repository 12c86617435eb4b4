use archrule_types::{ArchruleData, PriorityCounts, RuleOutcome, Verdict};

/// Summary of an analysis run before it is wrapped into a report envelope.
#[derive(Clone, Debug)]
pub struct DomainReport {
    pub verdict: Verdict,
    /// Checked rules in check order, violations truncated to the configured cap.
    pub outcomes: Vec<RuleOutcome>,
    pub data: ArchruleData,
    pub counts: PriorityCounts,
}
