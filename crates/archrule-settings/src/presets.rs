use archrule_domain::policy::{CheckPolicy, EffectiveConfig};
use archrule_types::Priority;
use std::collections::BTreeMap;

const PROFILES: [&str; 2] = ["strict", "lenient"];

pub fn profile_names() -> &'static [&'static str] {
    &PROFILES
}

/// Preset profiles are opinionated defaults. `None` for an unknown profile name.
pub fn preset(profile: &str) -> Option<EffectiveConfig> {
    match profile {
        "strict" => Some(strict_profile()),
        "lenient" => Some(lenient_profile()),
        _ => None,
    }
}

fn strict_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "strict".to_string(),
        fail_on: Priority::Low,
        max_violations: 200,
        ignore_patterns: Vec::new(),
        checks: default_checks(),
        composites: Vec::new(),
    }
}

fn lenient_profile() -> EffectiveConfig {
    // Only high-priority rules fail the run; everything else is reported as a warning.
    EffectiveConfig {
        profile: "lenient".to_string(),
        fail_on: Priority::High,
        ..strict_profile()
    }
}

fn default_checks() -> BTreeMap<String, CheckPolicy> {
    use archrule_types::ids::*;
    let mut m = BTreeMap::new();

    m.insert(
        RULE_NO_FIELD_INJECTION.to_string(),
        CheckPolicy::enabled(Priority::Medium),
    );
    m.insert(
        RULE_NO_PACKAGE_CYCLES.to_string(),
        CheckPolicy::enabled(Priority::High),
    );
    // Off until `forbid` / `suffix` is configured.
    m.insert(
        RULE_FORBIDDEN_DEPENDENCY.to_string(),
        CheckPolicy {
            enabled: false,
            ..CheckPolicy::enabled(Priority::Medium)
        },
    );
    m.insert(
        RULE_NAMING_SUFFIX.to_string(),
        CheckPolicy {
            enabled: false,
            ..CheckPolicy::enabled(Priority::Low)
        },
    );

    m
}
