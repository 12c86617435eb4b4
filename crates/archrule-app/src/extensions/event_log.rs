use super::reject_unknown_properties;
use archrule_domain::{Classes, EvaluatedRule, Extension, ExtensionError, Properties};
use archrule_types::ids::EXTENSION_EVENT_LOG;
use camino::Utf8PathBuf;
use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};

const PROP_PATH: &str = "path";

/// Writes one JSON line per evaluated rule and a final summary line.
///
/// Without a `path` property the extension only counts what it sees.
#[derive(Debug, Default)]
pub struct EventLogExtension {
    out: Option<BufWriter<File>>,
    path: Option<Utf8PathBuf>,
    rules_seen: usize,
    violations_seen: usize,
}

impl EventLogExtension {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules_seen(&self) -> usize {
        self.rules_seen
    }

    fn write_line(&mut self, line: &serde_json::Value) -> Result<(), ExtensionError> {
        let Some(out) = self.out.as_mut() else {
            return Ok(());
        };
        serde_json::to_writer(&mut *out, line)
            .map_err(|e| ExtensionError::with_source("serialize event", e))?;
        out.write_all(b"\n")
            .map_err(|e| ExtensionError::with_source("write event", e))
    }
}

impl Extension for EventLogExtension {
    fn unique_identifier(&self) -> &str {
        EXTENSION_EVENT_LOG
    }

    fn configure(&mut self, properties: &Properties) -> Result<(), ExtensionError> {
        reject_unknown_properties(properties, &[PROP_PATH])?;
        let Some(path) = properties.get(PROP_PATH) else {
            return Ok(());
        };
        let path = Utf8PathBuf::from(path);
        if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ExtensionError::with_source(format!("create {parent}"), e))?;
        }
        let file =
            File::create(&path).map_err(|e| ExtensionError::with_source(format!("create {path}"), e))?;
        tracing::debug!(%path, "event log opened");
        self.out = Some(BufWriter::new(file));
        self.path = Some(path);
        Ok(())
    }

    fn handle(&mut self, evaluated: &EvaluatedRule<'_>) -> Result<(), ExtensionError> {
        let result = evaluated.result();
        self.rules_seen += 1;
        self.violations_seen += result.violations().len();
        let line = json!({
            "event": "rule",
            "description": evaluated.rule().description(),
            "priority": result.priority(),
            "violations": result.violations().iter().map(|v| &v.message).collect::<Vec<_>>(),
        });
        self.write_line(&line)
    }

    fn on_finish_analyzing_classes(&mut self, classes: &Classes) -> Result<(), ExtensionError> {
        let line = json!({
            "event": "finish",
            "classes_analyzed": classes.len(),
            "rules": self.rules_seen,
            "violations": self.violations_seen,
        });
        self.write_line(&line)?;
        if let Some(out) = self.out.as_mut() {
            out.flush()
                .map_err(|e| ExtensionError::with_source("flush event log", e))?;
        }
        tracing::info!(
            rules = self.rules_seen,
            violations = self.violations_seen,
            path = self.path.as_ref().map(|p| p.as_str()),
            "event log finished"
        );
        Ok(())
    }
}
