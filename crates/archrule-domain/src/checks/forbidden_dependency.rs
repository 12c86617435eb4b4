use super::utils::{ClassFilter, build_globset};
use crate::error::RuleError;
use crate::model::Classes;
use crate::policy::CheckPolicy;
use crate::rule::ArchRule;
use archrule_types::{Violation, ids};
use globset::GlobSet;
use serde_json::json;

pub const DESCRIPTION: &str = "no classes should depend on forbidden classes";

pub fn rule(policy: &CheckPolicy) -> Result<ArchRule, RuleError> {
    let filter = ClassFilter::from_policy(ids::RULE_FORBIDDEN_DEPENDENCY, policy)?;
    let forbid = build_globset(ids::RULE_FORBIDDEN_DEPENDENCY, &policy.forbid)?.ok_or_else(|| {
        RuleError::MissingSetting {
            rule: ids::RULE_FORBIDDEN_DEPENDENCY.to_string(),
            setting: "forbid".to_string(),
        }
    })?;
    Ok(ArchRule::new(
        ids::RULE_FORBIDDEN_DEPENDENCY,
        DESCRIPTION,
        move |classes, out| run(classes, &filter, &forbid, out),
    ))
}

pub fn run(classes: &Classes, filter: &ClassFilter, forbid: &GlobSet, out: &mut Vec<Violation>) {
    for class in classes.iter().filter(|c| filter.applies_to(&c.name)) {
        for dependency in &class.dependencies {
            if *dependency == class.name || !forbid.is_match(dependency) {
                continue;
            }
            out.push(
                Violation::new(
                    ids::RULE_FORBIDDEN_DEPENDENCY,
                    ids::CODE_FORBIDDEN_DEPENDENCY,
                    &class.name,
                    format!("Class <{}> depends on forbidden class <{}>", class.name, dependency),
                )
                .with_location(class.location())
                .with_data(json!({ "dependency": dependency })),
            );
        }
    }
}
