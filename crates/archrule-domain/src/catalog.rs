use crate::checks;
use crate::composite::CompositeRule;
use crate::error::RuleError;
use crate::policy::{CompositePolicy, EffectiveConfig};
use crate::rule::{ArchRule, RuleRef};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Enabled built-in rules, built once from the effective configuration.
#[derive(Clone, Default)]
pub struct RuleCatalog {
    rules: Vec<(&'static str, RuleRef)>,
}

impl fmt::Debug for RuleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

impl RuleCatalog {
    pub fn from_config(cfg: &EffectiveConfig) -> Result<Self, RuleError> {
        let mut rules = Vec::new();
        for check in checks::builtin_checks() {
            let Some(policy) = cfg.check_policy(check.id) else {
                continue;
            };
            let rule: ArchRule = check.build(policy)?;
            rules.push((check.id, Arc::new(rule) as RuleRef));
        }
        Ok(Self { rules })
    }

    pub fn get(&self, id: &str) -> Option<&RuleRef> {
        self.rules.iter().find(|(rule_id, _)| *rule_id == id).map(|(_, r)| r)
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Build the composite named by `policy`. Every member must be an enabled rule.
    pub fn compose(&self, policy: &CompositePolicy) -> Result<CompositeRule, RuleError> {
        let members = policy
            .rules
            .iter()
            .map(|id| {
                self.get(id).cloned().ok_or_else(|| RuleError::UnknownRule {
                    composite: policy.name.clone(),
                    id: id.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut composite = CompositeRule::from_rules(&policy.name, members)?;
        if let Some(description) = policy.description.as_deref() {
            composite = composite.described_as(description);
        }
        if let Some(reason) = policy.because.as_deref() {
            composite = composite.because(reason);
        }
        Ok(composite)
    }

    /// Rules checked by a run, in order: every composite in declaration order,
    /// then each enabled built-in no composite consumed, in catalog order.
    pub fn rules_to_check(&self, composites: &[CompositePolicy]) -> Result<Vec<RuleRef>, RuleError> {
        let mut out: Vec<RuleRef> = Vec::with_capacity(composites.len() + self.rules.len());
        let mut consumed: BTreeSet<&str> = BTreeSet::new();

        for policy in composites {
            out.push(Arc::new(self.compose(policy)?));
            consumed.extend(policy.rules.iter().map(String::as_str));
        }
        for (id, rule) in &self.rules {
            if !consumed.contains(id) {
                out.push(Arc::clone(rule));
            }
        }
        Ok(out)
    }
}
