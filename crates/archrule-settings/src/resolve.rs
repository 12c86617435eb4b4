use crate::{model::ArchruleConfigV1, presets};
use anyhow::Context;
use archrule_domain::ExtensionConfig;
use archrule_domain::policy::{CheckPolicy, CompositePolicy, EffectiveConfig};
use archrule_types::{Priority, ids};
use globset::Glob;
use regex::Regex;
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub max_violations: Option<u32>,
    pub fail_on: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
    /// Properties of every enabled extension, keyed by identifier.
    pub extensions: ExtensionConfig,
    /// Identifiers whose entry sets `enabled = false`.
    pub disabled_extensions: BTreeSet<String>,
}

pub fn resolve_config(
    cfg: ArchruleConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "strict".to_string());

    let mut effective = presets::preset(&profile).with_context(|| {
        format!(
            "unknown profile: {profile} (expected {})",
            presets::profile_names().join("|")
        )
    })?;

    // max violations
    if let Some(mv) = overrides.max_violations.or(cfg.max_violations) {
        effective.max_violations = mv as usize;
    }

    // fail_on: CLI wins over file
    if let Some(fail_on) = overrides.fail_on.as_deref().or(cfg.fail_on.as_deref()) {
        effective.fail_on = parse_priority(fail_on).context("invalid fail_on")?;
    }

    for pattern in &cfg.ignore_patterns {
        Regex::new(pattern).with_context(|| format!("invalid ignore pattern: {pattern}"))?;
    }
    effective.ignore_patterns = cfg.ignore_patterns.clone();

    // per-check overrides
    for (rule_id, cc) in cfg.checks.iter() {
        if !ids::all_rule_ids().contains(&rule_id.as_str()) {
            anyhow::bail!("unknown rule id in [checks]: {rule_id}");
        }
        let entry = effective
            .checks
            .entry(rule_id.clone())
            .or_insert_with(CheckPolicy::disabled);

        // Supplying a check's target setting turns it on unless `enabled` says otherwise.
        match cc.enabled {
            Some(enabled) => entry.enabled = enabled,
            None if !cc.forbid.is_empty() || cc.suffix.is_some() => entry.enabled = true,
            None => {}
        }
        if let Some(p) = cc.priority.as_deref() {
            entry.priority =
                parse_priority(p).with_context(|| format!("invalid priority for {rule_id}"))?;
        }
        if cc.because.is_some() {
            entry.because = cc.because.clone();
        }
        if cc.description.is_some() {
            entry.description = cc.description.clone();
        }
        validate_globs(rule_id, "allow", &cc.allow)?;
        validate_globs(rule_id, "scope", &cc.scope)?;
        validate_globs(rule_id, "forbid", &cc.forbid)?;
        if !cc.allow.is_empty() {
            entry.allow = cc.allow.clone();
        }
        if !cc.scope.is_empty() {
            entry.scope = cc.scope.clone();
        }
        if !cc.forbid.is_empty() {
            entry.forbid = cc.forbid.clone();
        }
        if cc.suffix.is_some() {
            entry.suffix = cc.suffix.clone();
        }
    }

    effective.composites = cfg
        .composites
        .iter()
        .map(|c| CompositePolicy {
            name: c.name.clone(),
            rules: c.rules.clone(),
            description: c.description.clone(),
            because: c.because.clone(),
        })
        .collect();

    let (enabled, disabled): (Vec<_>, Vec<_>) = cfg
        .extensions
        .into_iter()
        .partition(|(_, ext)| ext.enabled.unwrap_or(true));
    let extensions = enabled
        .into_iter()
        .map(|(id, ext)| (id, ext.properties))
        .collect();
    let disabled_extensions = disabled.into_iter().map(|(id, _)| id).collect();

    Ok(ResolvedConfig {
        effective,
        extensions,
        disabled_extensions,
    })
}

fn validate_globs(rule_id: &str, key: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern)
            .with_context(|| format!("invalid {key} glob for {rule_id}: {pattern}"))?;
    }
    Ok(())
}

fn parse_priority(v: &str) -> anyhow::Result<Priority> {
    match v.to_ascii_lowercase().as_str() {
        "low" => Ok(Priority::Low),
        "medium" => Ok(Priority::Medium),
        "high" => Ok(Priority::High),
        _ => anyhow::bail!("unknown priority: {v} (expected low|medium|high)"),
    }
}
