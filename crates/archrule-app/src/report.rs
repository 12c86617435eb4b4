use anyhow::Context;
use archrule_render::{
    RenderableData, RenderableLocation, RenderablePriority, RenderableReport, RenderableRule,
    RenderableVerdictStatus, RenderableViolation,
};
use archrule_types::{
    ArchruleData, ArchruleReport, Priority, PriorityCounts, RuleOutcome, RunMeta,
    SCHEMA_REPORT_V1, ToolMeta, Verdict, Violation,
};
use time::OffsetDateTime;

pub fn parse_report_json(text: &str) -> anyhow::Result<ArchruleReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema}");
    }

    serde_json::from_value(value).context("parse archrule report")
}

pub fn serialize_report(report: &ArchruleReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &ArchruleReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdictStatus::Pass,
            Verdict::Warn => RenderableVerdictStatus::Warn,
            Verdict::Fail => RenderableVerdictStatus::Fail,
        },
        rules: report.rules.iter().map(renderable_rule).collect(),
        data: RenderableData {
            rules_checked: report.data.rules_checked,
            rules_failed: report.data.rules_failed,
            violations_emitted: report.data.violations_emitted,
            violations_total: report.data.violations_total,
            truncated_reason: report.data.truncated_reason.clone(),
        },
    }
}

fn renderable_rule(outcome: &RuleOutcome) -> RenderableRule {
    RenderableRule {
        description: outcome.description.clone(),
        priority: match outcome.priority {
            Priority::Low => RenderablePriority::Low,
            Priority::Medium => RenderablePriority::Medium,
            Priority::High => RenderablePriority::High,
        },
        violations: outcome.violations.iter().map(renderable_violation).collect(),
    }
}

fn renderable_violation(v: &Violation) -> RenderableViolation {
    RenderableViolation {
        rule_id: v.rule_id.clone(),
        code: v.code.clone(),
        subject: v.subject.clone(),
        message: v.message.clone(),
        location: v.location.as_ref().map(|loc| RenderableLocation {
            path: loc.path.as_str().to_string(),
            line: loc.line,
        }),
    }
}

/// Report written when the tool itself fails before producing a verdict.
pub fn runtime_error_report(message: &str) -> ArchruleReport {
    let now = OffsetDateTime::now_utc();
    let outcome = RuleOutcome {
        description: "archrule runs to completion".to_string(),
        priority: Priority::High,
        violations: vec![Violation::new(
            archrule_types::ids::RULE_TOOL_RUNTIME,
            archrule_types::ids::CODE_RUNTIME_ERROR,
            "archrule",
            message,
        )],
    };
    let counts = PriorityCounts::from_outcomes(std::slice::from_ref(&outcome));

    ArchruleReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run: RunMeta {
            started_at: now,
            ended_at: Some(now),
            duration_ms: Some(0),
        },
        verdict: Verdict::Fail,
        rules: vec![outcome],
        data: ArchruleData {
            profile: "unknown".to_string(),
            fail_on: Priority::High,
            classes_analyzed: 0,
            rules_checked: 1,
            rules_failed: 1,
            violations_total: 1,
            violations_emitted: 1,
            counts,
            truncated_reason: None,
        },
    }
}

pub(crate) fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "archrule".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}
