use crate::{RenderablePriority, RenderableReport};

/// Render violations as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} file={path},line={line}::[{rule_id}:{code}] {message}`
///
/// Level follows the priority of the checked rule: HIGH is `error`, MEDIUM is
/// `warning`, LOW is `notice`.
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    for rule in &report.rules {
        let level = match rule.priority {
            RenderablePriority::High => "error",
            RenderablePriority::Medium => "warning",
            RenderablePriority::Low => "notice",
        };

        for v in &rule.violations {
            let mut meta = String::new();
            if let Some(loc) = &v.location {
                meta.push_str(&format!("file={}", loc.path));
                if let Some(line) = loc.line {
                    meta.push_str(&format!(",line={}", line));
                }
            }

            let message = format!("[{}:{}] {}", v.rule_id, v.code, v.message)
                .replace('%', "%25")
                .replace('\r', "%0D")
                .replace('\n', "%0A");

            if meta.is_empty() {
                out.push(format!("::{}::{}", level, message));
            } else {
                out.push(format!("::{} {}::{}", level, meta, message));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        RenderableData, RenderableLocation, RenderableRule, RenderableVerdictStatus,
        RenderableViolation,
    };

    fn violation(message: &str, location: Option<RenderableLocation>) -> RenderableViolation {
        RenderableViolation {
            rule_id: "arch.naming_suffix".to_string(),
            code: "missing_suffix".to_string(),
            subject: "a.B".to_string(),
            message: message.to_string(),
            location,
        }
    }

    fn report(rules: Vec<RenderableRule>) -> RenderableReport {
        RenderableReport {
            verdict: RenderableVerdictStatus::Warn,
            rules,
            data: RenderableData {
                rules_checked: 0,
                rules_failed: 0,
                violations_emitted: 0,
                violations_total: 0,
                truncated_reason: None,
            },
        }
    }

    #[test]
    fn level_follows_priority() {
        let rules = [
            RenderablePriority::High,
            RenderablePriority::Medium,
            RenderablePriority::Low,
        ]
        .into_iter()
        .map(|priority| RenderableRule {
            description: "r".to_string(),
            priority,
            violations: vec![violation("m", None)],
        })
        .collect();

        let lines = render_github_annotations(&report(rules));
        assert_eq!(
            lines,
            vec![
                "::error::[arch.naming_suffix:missing_suffix] m",
                "::warning::[arch.naming_suffix:missing_suffix] m",
                "::notice::[arch.naming_suffix:missing_suffix] m",
            ]
        );
    }

    #[test]
    fn includes_location_and_escapes_message() {
        let rules = vec![RenderableRule {
            description: "r".to_string(),
            priority: RenderablePriority::Medium,
            violations: vec![violation(
                "100%\nsure",
                Some(RenderableLocation {
                    path: "src/a/B.java".to_string(),
                    line: Some(9),
                }),
            )],
        }];
        let lines = render_github_annotations(&report(rules));
        assert_eq!(
            lines,
            vec!["::warning file=src/a/B.java,line=9::[arch.naming_suffix:missing_suffix] 100%25%0Asure"]
        );
    }
}
