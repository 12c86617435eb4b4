use crate::error::ExtensionError;
use crate::extension::{EvaluatedRule, Extension, ExtensionPhase, Properties};
use crate::model::{ClassModel, Classes, FieldModel};
use crate::policy::{CheckPolicy, EffectiveConfig};
use crate::rule::{ArchRule, Rule};
use archrule_types::{Priority, SourcePath, Violation};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Rule that reports one violation per message, whatever the snapshot.
pub fn failing_rule(description: &str, messages: &[&str]) -> ArchRule {
    let messages: Vec<String> = messages.iter().map(|m| m.to_string()).collect();
    let subject = description.to_string();
    ArchRule::new("test.rule", description, move |_, out| {
        for m in &messages {
            out.push(Violation::new("test.rule", "test", &subject, m));
        }
    })
}

pub fn passing_rule(description: &str) -> ArchRule {
    ArchRule::new("test.rule", description, |_, _| {})
}

pub fn class(name: &str) -> ClassModel {
    ClassModel {
        name: name.to_string(),
        ..ClassModel::default()
    }
}

pub fn class_at(name: &str, source: &str, line: u32) -> ClassModel {
    ClassModel {
        source: Some(SourcePath::new(source)),
        line: Some(line),
        ..class(name)
    }
}

pub fn depending_on(mut class: ClassModel, deps: &[&str]) -> ClassModel {
    class.dependencies = deps.iter().map(|d| d.to_string()).collect();
    class
}

pub fn with_field(mut class: ClassModel, name: &str, annotations: &[&str]) -> ClassModel {
    class.fields.push(FieldModel {
        name: name.to_string(),
        type_name: None,
        annotations: annotations.iter().map(|a| a.to_string()).collect(),
        line: None,
    });
    class
}

pub fn classes(classes: Vec<ClassModel>) -> Classes {
    Classes::new(classes)
}

pub fn config(fail_on: Priority) -> EffectiveConfig {
    EffectiveConfig {
        profile: "test".to_string(),
        fail_on,
        max_violations: 200,
        ignore_patterns: Vec::new(),
        checks: BTreeMap::new(),
        composites: Vec::new(),
    }
}

pub fn policy_allow_scope(allow: &[&str], scope: &[&str]) -> CheckPolicy {
    CheckPolicy {
        allow: allow.iter().map(|s| s.to_string()).collect(),
        scope: scope.iter().map(|s| s.to_string()).collect(),
        ..CheckPolicy::enabled(Priority::Medium)
    }
}

/// Shared event log for [`RecordingExtension`]s.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<String>>>);

impl Recorder {
    pub fn push(&self, event: String) {
        self.0.lock().expect("recorder lock").push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().expect("recorder lock").clone()
    }
}

/// Extension that logs each lifecycle call as `id:phase[:detail]`.
pub struct RecordingExtension {
    id: String,
    log: Recorder,
    fail_on: Option<ExtensionPhase>,
}

impl RecordingExtension {
    pub fn new(id: &str, log: &Recorder) -> Self {
        Self {
            id: id.to_string(),
            log: log.clone(),
            fail_on: None,
        }
    }

    pub fn failing_on(mut self, phase: ExtensionPhase) -> Self {
        self.fail_on = Some(phase);
        self
    }

    fn enter(&self, phase: ExtensionPhase) -> Result<(), ExtensionError> {
        if self.fail_on == Some(phase) {
            return Err(ExtensionError::new(format!("{} refused {phase}", self.id)));
        }
        Ok(())
    }
}

impl Extension for RecordingExtension {
    fn unique_identifier(&self) -> &str {
        &self.id
    }

    fn configure(&mut self, properties: &Properties) -> Result<(), ExtensionError> {
        self.enter(ExtensionPhase::Configure)?;
        let props: Vec<String> = properties.iter().map(|(k, v)| format!("{k}={v}")).collect();
        self.log
            .push(format!("{}:configure:{}", self.id, props.join(",")));
        Ok(())
    }

    fn handle(&mut self, evaluated: &EvaluatedRule<'_>) -> Result<(), ExtensionError> {
        self.enter(ExtensionPhase::Handle)?;
        self.log.push(format!(
            "{}:handle:{}:{}",
            self.id,
            evaluated.rule().description(),
            evaluated.result().violations().len()
        ));
        Ok(())
    }

    fn on_finish_analyzing_classes(&mut self, _classes: &Classes) -> Result<(), ExtensionError> {
        self.enter(ExtensionPhase::Finish)?;
        self.log.push(format!("{}:finish", self.id));
        Ok(())
    }
}
