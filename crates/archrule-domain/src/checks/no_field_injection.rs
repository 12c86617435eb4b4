use super::utils::ClassFilter;
use crate::error::RuleError;
use crate::model::Classes;
use crate::policy::CheckPolicy;
use crate::rule::ArchRule;
use archrule_types::{Violation, ids};
use serde_json::json;

pub const DESCRIPTION: &str = "no classes should use field injection";

const INJECTION_ANNOTATIONS: [&str; 3] = ["Autowired", "Inject", "Resource"];

pub fn rule(policy: &CheckPolicy) -> Result<ArchRule, RuleError> {
    let filter = ClassFilter::from_policy(ids::RULE_NO_FIELD_INJECTION, policy)?;
    Ok(ArchRule::new(
        ids::RULE_NO_FIELD_INJECTION,
        DESCRIPTION,
        move |classes, out| run(classes, &filter, out),
    ))
}

pub fn run(classes: &Classes, filter: &ClassFilter, out: &mut Vec<Violation>) {
    for class in classes.iter().filter(|c| filter.applies_to(&c.name)) {
        for field in &class.fields {
            let Some(annotation) = INJECTION_ANNOTATIONS
                .iter()
                .find(|a| field.has_annotation(a))
            else {
                continue;
            };
            out.push(
                Violation::new(
                    ids::RULE_NO_FIELD_INJECTION,
                    ids::CODE_FIELD_INJECTION,
                    &class.name,
                    format!(
                        "Field <{}.{}> is annotated with @{}",
                        class.name, field.name, annotation
                    ),
                )
                .with_location(class.location_at(field.line.or(class.line)))
                .with_data(json!({
                    "field": field.name,
                    "annotation": annotation,
                })),
            );
        }
    }
}
