//! The `rules` use case: list the built-in rules.

use archrule_domain::checks::builtin_checks;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleListing {
    pub id: &'static str,
    pub description: &'static str,
}

pub fn list_builtin_rules() -> Vec<RuleListing> {
    builtin_checks()
        .iter()
        .map(|c| RuleListing {
            id: c.id,
            description: c.description,
        })
        .collect()
}

/// One `id<TAB>description` line per rule.
pub fn format_rule_listing(rules: &[RuleListing]) -> String {
    let mut out = String::new();
    for rule in rules {
        out.push_str(rule.id);
        out.push('\t');
        out.push_str(rule.description);
        out.push('\n');
    }
    out
}
