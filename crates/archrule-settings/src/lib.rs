//! Config parsing and profile/preset resolution.
//!
//! This crate is IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{ArchruleConfigV1, CheckConfig, CompositeConfig, ExtensionSettings, SCHEMA_CONFIG_V1};
pub use presets::profile_names;
pub use resolve::{Overrides, ResolvedConfig};

/// Parse `archrule.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<ArchruleConfigV1> {
    let cfg: ArchruleConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config used by the engine (profile, then file, then overrides).
pub fn resolve_config(
    cfg: ArchruleConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
