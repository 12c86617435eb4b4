//! Stable DTOs and IDs used across the archrule workspace.
//!
//! This crate is intentionally boring:
//! - rule priority and violation records shared by the engine and the renderers
//! - the emitted report envelope
//! - stable string IDs and codes for the built-in rules
//! - canonical source path handling

#![forbid(unsafe_code)]

pub mod ids;
pub mod path;
pub mod report;

pub use path::SourcePath;
pub use report::{
    ArchruleData, ArchruleReport, Location, Priority, PriorityCounts, ReportEnvelope, RuleOutcome,
    RunMeta, SCHEMA_REPORT_V1, ToolMeta, Verdict, Violation,
};
