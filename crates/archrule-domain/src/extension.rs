//! Plugin contract for observers of an analysis run.
//!
//! An extension is configured once with its own properties, sees every
//! evaluated rule in check order, and is told once when the run is over.
//! Any error it returns aborts the run.

use crate::error::{ExtensionError, ExtensionFailure, RegistryError};
use crate::evaluation::EvaluationResult;
use crate::model::Classes;
use crate::rule::Rule;
use std::collections::BTreeMap;
use std::fmt;

/// String-keyed configuration handed to an extension.
pub type Properties = BTreeMap<String, String>;

/// Properties for every extension, keyed by unique identifier.
pub type ExtensionConfig = BTreeMap<String, Properties>;

pub trait Extension: Send {
    /// Stable identifier, unique among the extensions of one registry.
    fn unique_identifier(&self) -> &str;

    fn configure(&mut self, properties: &Properties) -> Result<(), ExtensionError>;

    fn handle(&mut self, evaluated: &EvaluatedRule<'_>) -> Result<(), ExtensionError>;

    fn on_finish_analyzing_classes(&mut self, classes: &Classes) -> Result<(), ExtensionError>;
}

/// Lifecycle step an extension was in when it failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtensionPhase {
    Configure,
    Handle,
    Finish,
}

impl ExtensionPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtensionPhase::Configure => "configure",
            ExtensionPhase::Handle => "handle",
            ExtensionPhase::Finish => "finish",
        }
    }
}

impl fmt::Display for ExtensionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rule together with the snapshot it was evaluated on and the result.
pub struct EvaluatedRule<'a> {
    rule: &'a dyn Rule,
    classes: &'a Classes,
    result: &'a EvaluationResult<'a>,
}

impl<'a> EvaluatedRule<'a> {
    pub fn new(rule: &'a dyn Rule, classes: &'a Classes, result: &'a EvaluationResult<'a>) -> Self {
        Self {
            rule,
            classes,
            result,
        }
    }

    pub fn rule(&self) -> &'a dyn Rule {
        self.rule
    }

    pub fn classes(&self) -> &'a Classes {
        self.classes
    }

    pub fn result(&self) -> &'a EvaluationResult<'a> {
        self.result
    }
}

/// Registered extensions, dispatched in registration order.
#[derive(Default)]
pub struct ExtensionRegistry {
    extensions: Vec<Box<dyn Extension>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, extension: Box<dyn Extension>) -> Result<(), RegistryError> {
        let id = extension.unique_identifier();
        if self.extensions.iter().any(|e| e.unique_identifier() == id) {
            return Err(RegistryError::DuplicateIdentifier {
                identifier: id.to_string(),
            });
        }
        tracing::debug!(extension = id, "registered extension");
        self.extensions.push(extension);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.extensions.iter().map(|e| e.unique_identifier()).collect()
    }

    /// Configure every extension with its entry in `config`, or empty properties.
    pub(crate) fn configure_all(&mut self, config: &ExtensionConfig) -> Result<(), ExtensionFailure> {
        let empty = Properties::new();
        for ext in &mut self.extensions {
            let props = config.get(ext.unique_identifier()).unwrap_or(&empty);
            tracing::debug!(
                extension = ext.unique_identifier(),
                properties = props.len(),
                "configuring extension"
            );
            ext.configure(props)
                .map_err(|source| failure(&**ext, ExtensionPhase::Configure, source))?;
        }
        Ok(())
    }

    pub(crate) fn dispatch(&mut self, evaluated: &EvaluatedRule<'_>) -> Result<(), ExtensionFailure> {
        for ext in &mut self.extensions {
            ext.handle(evaluated)
                .map_err(|source| failure(&**ext, ExtensionPhase::Handle, source))?;
        }
        Ok(())
    }

    pub(crate) fn finish_all(&mut self, classes: &Classes) -> Result<(), ExtensionFailure> {
        for ext in &mut self.extensions {
            tracing::debug!(extension = ext.unique_identifier(), "finishing extension");
            ext.on_finish_analyzing_classes(classes)
                .map_err(|source| failure(&**ext, ExtensionPhase::Finish, source))?;
        }
        Ok(())
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("extensions", &self.identifiers())
            .finish()
    }
}

fn failure(ext: &dyn Extension, phase: ExtensionPhase, source: ExtensionError) -> ExtensionFailure {
    tracing::warn!(
        extension = ext.unique_identifier(),
        %phase,
        error = %source,
        "extension failed"
    );
    ExtensionFailure {
        identifier: ext.unique_identifier().to_string(),
        phase,
        source,
    }
}
