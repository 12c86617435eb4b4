use crate::SourcePath;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use time::OffsetDateTime;

/// Stable schema identifier for archrule reports.
pub const SCHEMA_REPORT_V1: &str = "archrule.report.v1";

/// Evaluation priority of a rule.
///
/// Ordered `Low < Medium < High` so a threshold can be compared directly.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub path: SourcePath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

/// A single recorded instance of a rule's condition failing for one subject.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Violation {
    pub rule_id: String,
    pub code: String,
    /// Fully qualified name of the offending class (or package, for package-level rules).
    pub subject: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    /// Stable identifier intended for dedup and trending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    /// Rule-specific structured payload.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: JsonValue,
}

impl Violation {
    pub fn new(
        rule_id: impl Into<String>,
        code: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            code: code.into(),
            subject: subject.into(),
            message: message.into(),
            location: None,
            fingerprint: None,
            data: JsonValue::Null,
        }
    }

    pub fn with_location(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    pub fn with_data(mut self, data: JsonValue) -> Self {
        self.data = data;
        self
    }
}

/// Outcome of one top-level rule checked during a run, violations in evaluation order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleOutcome {
    pub description: String,
    pub priority: Priority,
    pub violations: Vec<Violation>,
}

impl RuleOutcome {
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

/// Violation counts keyed by the priority of the rule that produced them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PriorityCounts {
    pub low: u32,
    pub medium: u32,
    pub high: u32,
}

impl PriorityCounts {
    pub fn from_outcomes(outcomes: &[RuleOutcome]) -> Self {
        let mut counts = PriorityCounts::default();
        for o in outcomes {
            let n = o.violations.len() as u32;
            match o.priority {
                Priority::Low => counts.low += n,
                Priority::Medium => counts.medium += n,
                Priority::High => counts.high += n,
            }
        }
        counts
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunMeta {
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "Option<String>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(with = "time::serde::rfc3339::option")]
    pub ended_at: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Archrule-specific summary payload for the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ArchruleData {
    pub profile: String,
    pub fail_on: Priority,

    pub classes_analyzed: u32,
    pub rules_checked: u32,
    pub rules_failed: u32,

    pub violations_total: u32,
    pub violations_emitted: u32,
    pub counts: PriorityCounts,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncated_reason: Option<String>,
}

/// A generic receipt/envelope.
///
/// Keeping this generic lets callers embed their own summary data while still
/// enforcing a stable outer shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = ArchruleData> {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    pub run: RunMeta,
    pub verdict: Verdict,
    /// Checked rules in the order they were checked.
    pub rules: Vec<RuleOutcome>,
    pub data: TData,
}

pub type ArchruleReport = ReportEnvelope<ArchruleData>;
