//! Use case orchestration for archrule.
//!
//! This crate provides the application layer: use cases that coordinate the domain, import,
//! settings, and render layers, plus the extensions shipped with the tool.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod extensions;
mod render;
mod report;
mod rules;

pub use check::{CheckInput, CheckOutput, run_check, run_check_with_extensions, verdict_exit_code};
pub use extensions::{CoverageExtension, CoverageSummary, EventLogExtension};
pub use render::{render_annotations, render_markdown};
pub use report::{parse_report_json, runtime_error_report, serialize_report, to_renderable};
pub use rules::{RuleListing, format_rule_listing, list_builtin_rules};
