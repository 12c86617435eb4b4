//! Stable identifiers for built-in rules and violation codes.
//!
//! `rule_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Rules
pub const RULE_NO_FIELD_INJECTION: &str = "arch.no_field_injection";
pub const RULE_NO_PACKAGE_CYCLES: &str = "arch.no_package_cycles";
pub const RULE_FORBIDDEN_DEPENDENCY: &str = "arch.forbidden_dependency";
pub const RULE_NAMING_SUFFIX: &str = "arch.naming_suffix";

// Codes: arch.no_field_injection
pub const CODE_FIELD_INJECTION: &str = "field_injection";

// Codes: arch.no_package_cycles
pub const CODE_PACKAGE_CYCLE: &str = "package_cycle";

// Codes: arch.forbidden_dependency
pub const CODE_FORBIDDEN_DEPENDENCY: &str = "forbidden_dependency";

// Codes: arch.naming_suffix
pub const CODE_MISSING_SUFFIX: &str = "missing_suffix";

// Built-in extensions
pub const EXTENSION_EVENT_LOG: &str = "archrule.event_log";
pub const EXTENSION_COVERAGE: &str = "archrule.coverage";

// Tool-level
pub const RULE_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";

/// All built-in rule IDs in catalog order.
pub fn all_rule_ids() -> &'static [&'static str] {
    &[
        RULE_NO_FIELD_INJECTION,
        RULE_NO_PACKAGE_CYCLES,
        RULE_FORBIDDEN_DEPENDENCY,
        RULE_NAMING_SUFFIX,
    ]
}
