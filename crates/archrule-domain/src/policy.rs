use archrule_types::Priority;
use std::collections::BTreeMap;

/// Settings for one built-in check after profile and file resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckPolicy {
    pub enabled: bool,
    pub priority: Priority,
    /// Class-name globs exempt from the check.
    pub allow: Vec<String>,
    /// Class-name globs the check applies to. Empty means every class.
    pub scope: Vec<String>,
    /// Dependency targets rejected by `arch.forbidden_dependency`.
    pub forbid: Vec<String>,
    /// Required simple-name suffix for `arch.naming_suffix`.
    pub suffix: Option<String>,
    pub because: Option<String>,
    pub description: Option<String>,
}

impl CheckPolicy {
    pub fn enabled(priority: Priority) -> Self {
        Self {
            enabled: true,
            priority,
            allow: Vec::new(),
            scope: Vec::new(),
            forbid: Vec::new(),
            suffix: None,
            because: None,
            description: None,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::enabled(Priority::Low)
        }
    }
}

/// A named conjunction of built-in checks, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositePolicy {
    pub name: String,
    pub rules: Vec<String>,
    pub description: Option<String>,
    pub because: Option<String>,
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    /// Lowest priority whose violations fail the run.
    pub fail_on: Priority,
    pub max_violations: usize,
    /// Regexes; violations whose message matches any of them are dropped.
    pub ignore_patterns: Vec<String>,
    pub checks: BTreeMap<String, CheckPolicy>,
    pub composites: Vec<CompositePolicy>,
}

impl EffectiveConfig {
    pub fn check_policy(&self, rule_id: &str) -> Option<&CheckPolicy> {
        self.checks.get(rule_id).filter(|p| p.enabled)
    }
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            profile: "strict".to_string(),
            fail_on: Priority::Low,
            max_violations: 200,
            ignore_patterns: Vec::new(),
            checks: BTreeMap::new(),
            composites: Vec::new(),
        }
    }
}
