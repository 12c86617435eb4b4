//! CLI entry point for archrule.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, logging setup and
//! exit codes. All business logic lives in the `archrule-app` crate.

use anyhow::Context;
use archrule_app::{
    CheckInput, format_rule_listing, list_builtin_rules, parse_report_json, render_annotations,
    render_markdown, run_check, runtime_error_report, serialize_report, to_renderable,
    verdict_exit_code,
};
use archrule_settings::Overrides;
use archrule_types::ArchruleReport;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "ARCHRULE_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "archrule",
    version,
    about = "Architecture rule checks over a class-model snapshot"
)]
struct Cli {
    /// Snapshot JSON file, or a directory searched for `*.classes.json` files.
    #[arg(long, default_value = ".")]
    classes: Utf8PathBuf,

    /// Path to archrule config TOML. A missing file means defaults.
    #[arg(long, default_value = "archrule.toml")]
    config: Utf8PathBuf,

    /// Override profile (strict|lenient).
    #[arg(long)]
    profile: Option<String>,

    /// Override maximum violations to emit.
    #[arg(long)]
    max_violations: Option<u32>,

    /// Override the lowest priority that fails the run (low|medium|high).
    #[arg(long)]
    fail_on: Option<String>,

    /// Log at debug level (otherwise `ARCHRULE_LOG`, default `warn`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check the configured rules and write artifacts.
    Check {
        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/archrule/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/archrule/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/archrule/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/archrule/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// List the built-in rules.
    Rules,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Commands::Check {
            ref report_out,
            write_markdown,
            ref markdown_out,
        } => cmd_check(&cli, report_out, write_markdown, markdown_out),
        Commands::Md {
            ref report,
            ref output,
        } => cmd_md(report, output.as_deref()),
        Commands::Annotations { ref report, max } => cmd_annotations(report, max),
        Commands::Rules => {
            print!("{}", format_rule_listing(&list_builtin_rules()));
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn cmd_check(
    cli: &Cli,
    report_out: &Utf8Path,
    write_markdown: bool,
    markdown_out: &Utf8Path,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let cfg_text = read_config(&cli.config)?;

        let input = CheckInput {
            classes_path: &cli.classes,
            config_text: &cfg_text,
            overrides: Overrides {
                profile: cli.profile.clone(),
                max_violations: cli.max_violations,
                fail_on: cli.fail_on.clone(),
            },
        };

        let output = run_check(input)?;

        write_report_file(report_out, &output.report).context("write report json")?;

        if write_markdown {
            let renderable = to_renderable(&output.report);
            let md = render_markdown(&renderable);
            write_text_file(markdown_out, &md).context("write markdown")?;
        }

        Ok(verdict_exit_code(output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(&format!("{err:#}"));
            if let Err(write_err) = write_report_file(report_out, &report) {
                tracing::warn!(error = %write_err, "could not write runtime error report");
            }
            eprintln!("archrule error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// Missing config is allowed (defaults apply); any other read error is not.
fn read_config(path: &Utf8Path) -> anyhow::Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(%path, "no config file, using defaults");
            Ok(String::new())
        }
        Err(err) => Err(err).with_context(|| format!("read config: {path}")),
    }
}

fn write_report_file(path: &Utf8Path, report: &ArchruleReport) -> anyhow::Result<()> {
    let data = serialize_report(report).context("serialize report")?;
    write_bytes(path, &data).with_context(|| format!("write report: {path}"))
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes()).with_context(|| format!("write text: {path}"))
}

fn write_bytes(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, data)?;
    Ok(())
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {report_path}"))?;
    let report = parse_report_json(&report_text)?;
    let md = render_markdown(&to_renderable(&report));

    if let Some(out_path) = output {
        write_text_file(out_path, &md).context("write markdown output")?;
    } else {
        print!("{md}");
    }

    Ok(())
}

fn cmd_annotations(report_path: &Utf8Path, max: usize) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {report_path}"))?;
    let report = parse_report_json(&report_text)?;
    for annotation in render_annotations(&to_renderable(&report), max) {
        println!("{annotation}");
    }

    Ok(())
}
