//! Built-in primitive rules, configurable through a [`CheckPolicy`].

use crate::error::RuleError;
use crate::policy::CheckPolicy;
use crate::rule::ArchRule;
use archrule_types::ids;

pub mod forbidden_dependency;
pub mod naming_suffix;
pub mod no_field_injection;
pub mod no_package_cycles;
mod utils;


/// A built-in rule: stable id, default description, and how to build it.
#[derive(Clone, Copy)]
pub struct BuiltinCheck {
    pub id: &'static str,
    pub description: &'static str,
    build: fn(&CheckPolicy) -> Result<ArchRule, RuleError>,
}

impl BuiltinCheck {
    /// Build the rule from `policy`, applying priority, description override
    /// and justification.
    pub fn build(&self, policy: &CheckPolicy) -> Result<ArchRule, RuleError> {
        let mut rule = (self.build)(policy)?.with_priority(policy.priority);
        if let Some(description) = policy.description.as_deref() {
            rule = rule.described_as(description);
        }
        if let Some(reason) = policy.because.as_deref() {
            rule = rule.because(reason);
        }
        Ok(rule)
    }
}

static BUILTIN_CHECKS: [BuiltinCheck; 4] = [
    BuiltinCheck {
        id: ids::RULE_NO_FIELD_INJECTION,
        description: no_field_injection::DESCRIPTION,
        build: no_field_injection::rule,
    },
    BuiltinCheck {
        id: ids::RULE_NO_PACKAGE_CYCLES,
        description: no_package_cycles::DESCRIPTION,
        build: no_package_cycles::rule,
    },
    BuiltinCheck {
        id: ids::RULE_FORBIDDEN_DEPENDENCY,
        description: forbidden_dependency::DESCRIPTION,
        build: forbidden_dependency::rule,
    },
    BuiltinCheck {
        id: ids::RULE_NAMING_SUFFIX,
        description: naming_suffix::DESCRIPTION,
        build: naming_suffix::rule,
    },
];

/// Every built-in check in catalog order.
pub fn builtin_checks() -> &'static [BuiltinCheck] {
    &BUILTIN_CHECKS
}

pub fn find(id: &str) -> Option<&'static BuiltinCheck> {
    builtin_checks().iter().find(|c| c.id == id)
}

impl std::fmt::Debug for BuiltinCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinCheck")
            .field("id", &self.id)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
