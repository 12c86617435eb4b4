use crate::{RenderableReport, RenderableVerdictStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Archrule report\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Fail => "FAIL",
    };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Rules: {} checked / {} failed\n- Violations: {} (emitted) / {} (total)\n\n",
        verdict,
        report.data.rules_checked,
        report.data.rules_failed,
        report.data.violations_emitted,
        report.data.violations_total
    ));

    if let Some(r) = &report.data.truncated_reason {
        out.push_str(&format!("> Note: {}\n\n", r));
    }

    if report.rules.is_empty() {
        out.push_str("No rules checked.\n");
        return out;
    }

    for rule in &report.rules {
        let status = if rule.violations.is_empty() { "passed" } else { "violated" };
        out.push_str(&format!(
            "## [{}] {} ({})\n\n",
            rule.priority.as_str(),
            rule.description,
            status
        ));

        if rule.violations.is_empty() {
            out.push_str("No violations.\n\n");
            continue;
        }

        for v in &rule.violations {
            match &v.location {
                Some(loc) => out.push_str(&format!(
                    "- `{}` / `{}`: {} (`{}`:{})\n",
                    v.rule_id,
                    v.code,
                    v.message,
                    loc.path,
                    loc.line.unwrap_or(0)
                )),
                None => out.push_str(&format!("- `{}` / `{}`: {}\n", v.rule_id, v.code, v.message)),
            }
        }
        out.push('\n');
    }

    out
}
