//! Extensions shipped with archrule, enabled from `[extensions.<id>]` in the config.

mod coverage;
mod event_log;

pub use coverage::{CoverageExtension, CoverageSummary};
pub use event_log::EventLogExtension;

use archrule_domain::{ExtensionError, Properties};

/// Reject property keys an extension does not understand.
fn reject_unknown_properties(properties: &Properties, known: &[&str]) -> Result<(), ExtensionError> {
    match properties.keys().find(|k| !known.contains(&k.as_str())) {
        Some(key) => Err(ExtensionError::new(format!("unknown property `{key}`"))),
        None => Ok(()),
    }
}
