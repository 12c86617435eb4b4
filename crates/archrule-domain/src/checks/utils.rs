use crate::error::RuleError;
use crate::policy::CheckPolicy;
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Class-name globs, case-sensitive. `None` for an empty pattern list.
pub fn build_globset(rule_id: &str, patterns: &[String]) -> Result<Option<GlobSet>, RuleError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let invalid = |pattern: &str, err: globset::Error| RuleError::InvalidPattern {
        rule: rule_id.to_string(),
        pattern: pattern.to_string(),
        message: err.to_string(),
    };

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| invalid(pattern, e))?;
        builder.add(glob);
    }
    let set = builder
        .build()
        .map_err(|e| invalid(&patterns.join(", "), e))?;
    Ok(Some(set))
}

pub fn matches(set: Option<&GlobSet>, value: &str) -> bool {
    set.is_some_and(|s| s.is_match(value))
}

/// Which classes a check looks at: inside `scope` (all when empty) and not in `allow`.
#[derive(Clone, Debug, Default)]
pub struct ClassFilter {
    allow: Option<GlobSet>,
    scope: Option<GlobSet>,
}

impl ClassFilter {
    pub fn from_policy(rule_id: &str, policy: &CheckPolicy) -> Result<Self, RuleError> {
        Ok(Self {
            allow: build_globset(rule_id, &policy.allow)?,
            scope: build_globset(rule_id, &policy.scope)?,
        })
    }

    pub fn applies_to(&self, class_name: &str) -> bool {
        let in_scope = self.scope.as_ref().is_none_or(|s| s.is_match(class_name));
        in_scope && !matches(self.allow.as_ref(), class_name)
    }
}
