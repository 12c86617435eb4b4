//! Developer tasks (schema generation, golden fixture maintenance).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use archrule_app::{CheckInput, run_check, serialize_report};
use archrule_settings::Overrides;
use archrule_test_util::normalize_nondeterministic;
use camino::{Utf8Path, Utf8PathBuf};
use schemars::schema_for;
use std::fs;

const GOLDEN_FILE: &str = "expected.report.json";

fn project_root() -> Utf8PathBuf {
    let manifest_dir = Utf8Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir.parent().unwrap_or(manifest_dir).to_path_buf()
}

fn schemas_dir() -> Utf8PathBuf {
    project_root().join("schemas")
}

fn fixtures_dir() -> Utf8PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "archrule.report.v1.json",
            generate: || schema_for!(archrule_types::ArchruleReport),
        },
        SchemaSpec {
            filename: "archrule.config.v1.json",
            generate: || schema_for!(archrule_settings::ArchruleConfigV1),
        },
    ]
}

/// Pretty-printed JSON with trailing newline.
fn to_pretty_json<T: serde::Serialize>(value: &T) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(value).context("serialize json")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).with_context(|| format!("create {dir}"))?;

    for spec in schema_specs() {
        let json = to_pretty_json(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json).with_context(|| format!("write schema to {path}"))?;
        println!("Wrote {path}");
    }
    Ok(())
}

/// Fail when a schema under `schemas/` differs from the generated one.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut stale = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        let expected = to_pretty_json(&(spec.generate)())?;
        match fs::read_to_string(&path) {
            Ok(actual) if actual == expected => {}
            Ok(_) => stale.push(format!("{} (out of date)", spec.filename)),
            Err(_) => stale.push(format!("{} (missing)", spec.filename)),
        }
    }

    if stale.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    for name in &stale {
        eprintln!("  - {name}");
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("schema validation failed")
}

/// Fixture directories carrying a golden report, sorted by name.
fn golden_fixtures() -> anyhow::Result<Vec<Utf8PathBuf>> {
    let dir = fixtures_dir();
    let mut out = Vec::new();
    for entry in dir.read_dir_utf8().with_context(|| format!("read {dir}"))? {
        let path = entry.with_context(|| format!("read {dir}"))?.into_path();
        if path.join(GOLDEN_FILE).is_file() {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Run the check on a fixture and return the normalized report as JSON text.
fn render_fixture(fixture: &Utf8Path) -> anyhow::Result<String> {
    let config_path = fixture.join("archrule.toml");
    let config_text = fs::read_to_string(&config_path).unwrap_or_default();
    let classes_path = fixture.join("classes.json");
    let output = run_check(CheckInput {
        classes_path: &classes_path,
        config_text: &config_text,
        overrides: Overrides::default(),
    })
    .with_context(|| format!("check fixture {fixture}"))?;

    let bytes = serialize_report(&output.report)?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).context("reparse report")?;
    to_pretty_json(&normalize_nondeterministic(value))
}

fn update_golden() -> anyhow::Result<()> {
    for fixture in golden_fixtures()? {
        let path = fixture.join(GOLDEN_FILE);
        fs::write(&path, render_fixture(&fixture)?).with_context(|| format!("write {path}"))?;
        println!("Wrote {path}");
    }
    Ok(())
}

fn check_golden() -> anyhow::Result<()> {
    let mut mismatched = Vec::new();
    for fixture in golden_fixtures()? {
        let path = fixture.join(GOLDEN_FILE);
        let expected: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(&path).with_context(|| format!("read {path}"))?,
        )
        .with_context(|| format!("parse {path}"))?;
        let actual: serde_json::Value = serde_json::from_str(&render_fixture(&fixture)?)?;
        if normalize_nondeterministic(expected) != actual {
            mismatched.push(fixture);
        }
    }

    if mismatched.is_empty() {
        println!("All golden reports match.");
        return Ok(());
    }
    for fixture in &mismatched {
        eprintln!("  - {fixture}");
    }
    eprintln!("\nRun `cargo xtask update-golden` to regenerate.");
    bail!("golden report check failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  update-golden     Rewrite tests/fixtures/*/{GOLDEN_FILE}");
    eprintln!("  check-golden      Compare fixture reports with their golden files");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(String::as_str).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "update-golden" => update_golden(),
        "check-golden" => check_golden(),
        "print-schema-ids" => {
            println!("{}", archrule_types::SCHEMA_REPORT_V1);
            println!("{}", archrule_settings::SCHEMA_CONFIG_V1);
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
