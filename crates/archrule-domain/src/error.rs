use crate::evaluation::FailureReport;
use crate::extension::ExtensionPhase;
use thiserror::Error;

/// Construction errors: a composite could not be built from the requested rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("composite `{composite}` references unknown or disabled rule `{id}`")]
    UnknownRule { composite: String, id: String },

    #[error("composite `{name}` contains no rules")]
    EmptyComposite { name: String },

    #[error("rule `{rule}` is enabled without `{setting}`")]
    MissingSetting { rule: String, setting: String },

    #[error("rule `{rule}` has invalid pattern `{pattern}`: {message}")]
    InvalidPattern {
        rule: String,
        pattern: String,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("extension identifier `{identifier}` is registered more than once")]
    DuplicateIdentifier { identifier: String },
}

/// Error returned by an extension's lifecycle methods.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ExtensionError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl ExtensionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// An extension failed during one of its lifecycle phases. Fatal for the run.
#[derive(Debug, Error)]
#[error("extension `{identifier}` failed during {phase}")]
pub struct ExtensionFailure {
    pub identifier: String,
    pub phase: ExtensionPhase,
    #[source]
    pub source: ExtensionError,
}

/// A checked rule reported violations.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{report}")]
pub struct AssertionError {
    pub report: FailureReport,
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Violated(#[from] AssertionError),

    #[error(transparent)]
    Extension(#[from] ExtensionFailure),
}

/// A run could not be carried out to the end.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid ignore pattern")]
    IgnorePattern(#[from] regex::Error),

    #[error(transparent)]
    Extension(#[from] ExtensionFailure),
}
