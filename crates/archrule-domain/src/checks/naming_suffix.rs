use super::utils::ClassFilter;
use crate::error::RuleError;
use crate::model::Classes;
use crate::policy::CheckPolicy;
use crate::rule::ArchRule;
use archrule_types::{Violation, ids};
use serde_json::json;

pub const DESCRIPTION: &str = "classes should be named with the required suffix";

pub fn rule(policy: &CheckPolicy) -> Result<ArchRule, RuleError> {
    let filter = ClassFilter::from_policy(ids::RULE_NAMING_SUFFIX, policy)?;
    let suffix = policy
        .suffix
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RuleError::MissingSetting {
            rule: ids::RULE_NAMING_SUFFIX.to_string(),
            setting: "suffix".to_string(),
        })?;
    Ok(ArchRule::new(ids::RULE_NAMING_SUFFIX, DESCRIPTION, move |classes, out| {
        run(classes, &filter, &suffix, out)
    }))
}

pub fn run(classes: &Classes, filter: &ClassFilter, suffix: &str, out: &mut Vec<Violation>) {
    for class in classes.iter().filter(|c| filter.applies_to(&c.name)) {
        if class.simple_name().ends_with(suffix) {
            continue;
        }
        out.push(
            Violation::new(
                ids::RULE_NAMING_SUFFIX,
                ids::CODE_MISSING_SUFFIX,
                &class.name,
                format!("Class <{}> does not have simple name ending with '{}'", class.name, suffix),
            )
            .with_location(class.location())
            .with_data(json!({ "suffix": suffix })),
        );
    }
}
