//! The `check` use case: load the snapshot, check the configured rules, produce a report.

use anyhow::Context;
use archrule_domain::{Extension, ExtensionRegistry, RuleCatalog};
use archrule_settings::{Overrides, ResolvedConfig};
use archrule_types::ids::{EXTENSION_COVERAGE, EXTENSION_EVENT_LOG};
use archrule_types::{ArchruleReport, RunMeta, SCHEMA_REPORT_V1, Verdict};
use camino::Utf8Path;
use time::OffsetDateTime;

use crate::extensions::{CoverageExtension, CoverageSummary, EventLogExtension};
use crate::report::tool_meta;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Snapshot file, or a directory of `*.classes.json` files.
    pub classes_path: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: ArchruleReport,
    pub resolved_config: ResolvedConfig,
    /// Present when the coverage extension was enabled.
    pub coverage: Option<CoverageSummary>,
}

pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    run_check_with_extensions(input, Vec::new())
}

/// Run the check with caller-supplied extensions registered after the built-in ones.
///
/// Every extension receives the `properties` of its `[extensions.<id>]` entry,
/// or none. An entry with `enabled = false` keeps a supplied extension out of
/// the run. An enabled entry naming neither a built-in nor a supplied
/// extension is an error.
pub fn run_check_with_extensions(
    input: CheckInput<'_>,
    extra: Vec<Box<dyn Extension>>,
) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        archrule_settings::ArchruleConfigV1::default()
    } else {
        archrule_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved = archrule_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let classes = archrule_import::load_classes(input.classes_path)
        .with_context(|| format!("load classes from {}", input.classes_path))?;

    let catalog = RuleCatalog::from_config(&resolved.effective).context("build rules")?;
    let rules = catalog
        .rules_to_check(&resolved.effective.composites)
        .context("build composites")?;

    let extra_ids: Vec<String> = extra
        .iter()
        .map(|e| e.unique_identifier().to_string())
        .collect();
    let mut registry = ExtensionRegistry::new();
    let mut coverage_slot = None;
    for id in resolved.extensions.keys() {
        match id.as_str() {
            EXTENSION_EVENT_LOG => registry
                .register(Box::new(EventLogExtension::new()))
                .context("register extension")?,
            EXTENSION_COVERAGE => {
                let coverage = CoverageExtension::new();
                coverage_slot = Some(coverage.summary_slot());
                registry
                    .register(Box::new(coverage))
                    .context("register extension")?;
            }
            other if extra_ids.iter().any(|e| e == other) => {}
            other => anyhow::bail!("unknown extension `{other}` in config"),
        }
    }
    for ext in extra {
        if resolved.disabled_extensions.contains(ext.unique_identifier()) {
            tracing::debug!(extension = ext.unique_identifier(), "extension disabled by config");
            continue;
        }
        registry.register(ext).context("register extension")?;
    }

    let domain = archrule_domain::run_analysis(
        &classes,
        &rules,
        &mut registry,
        &resolved.extensions,
        &resolved.effective,
    )
    .context("run analysis")?;

    let coverage = coverage_slot.and_then(|slot| CoverageExtension::take_summary(&slot));

    let finished_at = OffsetDateTime::now_utc();
    let duration_ms = (finished_at - started_at).whole_milliseconds().max(0) as u64;

    tracing::info!(
        verdict = ?domain.verdict,
        classes = domain.data.classes_analyzed,
        rules = domain.data.rules_checked,
        rules_failed = domain.data.rules_failed,
        violations = domain.data.violations_total,
        duration_ms,
        "check finished"
    );

    let report = ArchruleReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run: RunMeta {
            started_at,
            ended_at: Some(finished_at),
            duration_ms: Some(duration_ms),
        },
        verdict: domain.verdict,
        rules: domain.outcomes,
        data: domain.data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
        coverage,
    })
}

/// Map a verdict to the process exit code: warnings never fail the build.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass | Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archrule_domain::{Classes, EvaluatedRule, ExtensionError, Properties};
    use archrule_types::Priority;
    use camino::Utf8PathBuf;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    const SNAPSHOT: &str = r#"{
  "classes": [
    {
      "name": "com.shop.orders.OrderService",
      "source": "src/com/shop/orders/OrderService.java",
      "line": 3,
      "dependencies": ["com.shop.billing.Invoice"],
      "fields": [{ "name": "repo", "annotations": ["Autowired"], "line": 7 }]
    },
    {
      "name": "com.shop.billing.Invoice",
      "dependencies": ["com.shop.orders.OrderService"]
    }
  ]
}"#;

    fn snapshot_dir(text: &str) -> (TempDir, Utf8PathBuf) {
        let tmp = TempDir::new().expect("tempdir");
        let path = Utf8PathBuf::from_path_buf(tmp.path().join("classes.json")).expect("utf8");
        std::fs::write(&path, text).expect("write snapshot");
        (tmp, path)
    }

    fn input<'a>(path: &'a Utf8Path, config: &'a str) -> CheckInput<'a> {
        CheckInput {
            classes_path: path,
            config_text: config,
            overrides: Overrides::default(),
        }
    }

    #[test]
    fn default_config_fails_on_injection_and_cycle() {
        let (_tmp, path) = snapshot_dir(SNAPSHOT);
        let out = run_check(input(&path, "")).expect("check");

        assert_eq!(out.report.schema, SCHEMA_REPORT_V1);
        assert_eq!(out.report.verdict, Verdict::Fail);
        assert_eq!(out.report.data.classes_analyzed, 2);
        // forbidden_dependency and naming_suffix stay off until configured.
        assert_eq!(out.report.data.rules_checked, 2);
        assert_eq!(out.report.data.rules_failed, 2);
        let codes: Vec<&str> = out
            .report
            .rules
            .iter()
            .flat_map(|r| r.violations.iter().map(|v| v.code.as_str()))
            .collect();
        assert_eq!(codes, vec!["field_injection", "package_cycle"]);
        assert!(out.coverage.is_none());
        assert_eq!(verdict_exit_code(out.report.verdict), 2);
    }

    #[test]
    fn composite_is_reported_as_one_rule_and_consumes_its_members() {
        let (_tmp, path) = snapshot_dir(SNAPSHOT);
        let config = r#"
profile = "lenient"

[[composites]]
name = "hygiene"
rules = ["arch.no_field_injection", "arch.no_package_cycles"]
because = "we ship on fridays"
"#;
        let out = run_check(input(&path, config)).expect("check");

        assert_eq!(out.report.data.rules_checked, 1);
        let first = &out.report.rules[0];
        assert_eq!(
            first.description,
            "no classes should use field injection and no package cycles because we ship on fridays"
        );
        assert_eq!(first.priority, Priority::Medium);
        assert_eq!(first.violations.len(), 2);
        // Composites evaluate at medium priority, below the lenient threshold.
        assert_eq!(out.report.verdict, Verdict::Warn);
        assert_eq!(verdict_exit_code(out.report.verdict), 0);
    }

    #[test]
    fn coverage_extension_publishes_summary() {
        let (_tmp, path) = snapshot_dir(SNAPSHOT);
        let config = r#"
[extensions."archrule.coverage"]
enabled = true
"#;
        let out = run_check(input(&path, config)).expect("check");
        let coverage = out.coverage.expect("coverage summary");
        assert_eq!(coverage.classes_analyzed, 2);
        assert_eq!(coverage.classes_with_violations, 1);
        assert_eq!(coverage.rules_handled, 2);
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let (_tmp, path) = snapshot_dir(SNAPSHOT);
        let config = r#"
[extensions."acme.nope"]
enabled = true
"#;
        let err = run_check(input(&path, config)).expect_err("unknown extension");
        assert!(format!("{err:#}").contains("unknown extension `acme.nope`"));
    }

    struct Recorder {
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl Extension for Recorder {
        fn unique_identifier(&self) -> &str {
            "test.recorder"
        }

        fn configure(&mut self, properties: &Properties) -> Result<(), ExtensionError> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.extend(properties.iter().map(|(k, v)| format!("{k}={v}")));
            }
            Ok(())
        }

        fn handle(&mut self, evaluated: &EvaluatedRule<'_>) -> Result<(), ExtensionError> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(evaluated.rule().description().to_string());
            }
            Ok(())
        }

        fn on_finish_analyzing_classes(&mut self, _classes: &Classes) -> Result<(), ExtensionError> {
            Err(ExtensionError::new("refusing to finish"))
        }
    }

    #[test]
    fn supplied_extension_gets_properties_and_can_abort_the_run() {
        let (_tmp, path) = snapshot_dir(SNAPSHOT);
        let config = r#"
[extensions."test.recorder"]
properties = { mode = "loud" }
"#;
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = Recorder {
            seen: Arc::clone(&seen),
        };
        let err = run_check_with_extensions(input(&path, config), vec![Box::new(recorder)])
            .expect_err("finish fails");
        let text = format!("{err:#}");
        assert!(text.contains("test.recorder"), "{text}");
        assert!(text.contains("refusing to finish"), "{text}");

        let seen = seen.lock().expect("lock");
        assert_eq!(seen[0], "mode=loud");
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn disabled_supplied_extension_is_not_registered() {
        let (_tmp, path) = snapshot_dir(SNAPSHOT);
        let config = r#"
[extensions."test.recorder"]
enabled = false
properties = { mode = "loud" }
"#;
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = Recorder {
            seen: Arc::clone(&seen),
        };
        let out = run_check_with_extensions(input(&path, config), vec![Box::new(recorder)])
            .expect("disabled extension never reaches finish");

        assert_eq!(out.report.verdict, Verdict::Fail);
        assert!(out.resolved_config.extensions.is_empty());
        assert!(seen.lock().expect("lock").is_empty());
    }

    #[test]
    fn missing_snapshot_has_context() {
        let tmp = TempDir::new().expect("tempdir");
        let path = Utf8PathBuf::from_path_buf(tmp.path().join("absent.json")).expect("utf8");
        let err = run_check(input(&path, "")).expect_err("missing file");
        assert!(format!("{err:#}").contains("load classes from"));
    }

    #[test]
    fn verdict_exit_codes() {
        assert_eq!(verdict_exit_code(Verdict::Pass), 0);
        assert_eq!(verdict_exit_code(Verdict::Warn), 0);
        assert_eq!(verdict_exit_code(Verdict::Fail), 2);
    }
}
