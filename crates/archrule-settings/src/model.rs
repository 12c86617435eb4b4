use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable schema identifier for `archrule.toml`.
pub const SCHEMA_CONFIG_V1: &str = "archrule.config.v1";

/// `archrule.toml` schema v1.
///
/// This is a *user-facing* config model: every field is optional and falls
/// back to the selected profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ArchruleConfigV1 {
    /// Optional schema string for tooling (`archrule.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Preset profile: `strict` (default) or `lenient`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Lowest rule priority whose violations fail the run: `low`, `medium`, `high`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// How many violations to emit before truncating, in evaluation order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_violations: Option<u32>,

    /// Regexes; violations whose message matches any of them are dropped.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_patterns: Vec<String>,

    /// Map of rule_id -> config.
    #[serde(default)]
    pub checks: BTreeMap<String, CheckConfig>,

    /// Named conjunctions of built-in rules, checked in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub composites: Vec<CompositeConfig>,

    /// Map of extension identifier -> settings.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, ExtensionSettings>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckConfig {
    /// Override preset enable/disable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Override preset priority: `low`, `medium`, `high`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub because: Option<String>,

    /// Replaces the rule description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Class-name globs exempt from the rule.
    #[serde(default)]
    pub allow: Vec<String>,

    /// Class-name globs the rule applies to; empty means every class.
    #[serde(default)]
    pub scope: Vec<String>,

    /// Forbidden dependency targets (`arch.forbidden_dependency`).
    #[serde(default)]
    pub forbid: Vec<String>,

    /// Required simple-name suffix (`arch.naming_suffix`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompositeConfig {
    pub name: String,

    /// Member rule ids, in order.
    #[serde(default)]
    pub rules: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub because: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExtensionSettings {
    /// Defaults to `true` when the table is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Passed verbatim to the extension's `configure`.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}
