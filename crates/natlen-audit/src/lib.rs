//! CLI surface of the narrowing-boundary auditor.
//!
//! `check` loads a width manifest, runs the audit, and reports findings:
//! human-readable diagnostics on stderr, the machine-readable report JSON on
//! stdout with `--json`. Exit codes are pinned in `natlen-contracts`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use natlen::audit::{report, AuditOptions};
use natlen::boundary::CrossingPolicy;
use natlen::diagnostics::render_codes_md;
use natlen::manifest::WidthManifest;
use natlen_contracts::{EXIT_FINDINGS, EXIT_OK};

#[derive(Parser)]
#[command(name = "natlen-audit")]
#[command(about = "Narrowing-boundary auditor for width manifests.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Audit a width manifest for narrowing boundaries.
    Check(CheckArgs),
    /// Print the diagnostic code table.
    Codes,
}

#[derive(Args)]
pub struct CheckArgs {
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,

    #[arg(long, value_enum, default_value_t = CrossingPolicy::Forbid)]
    pub policy: CrossingPolicy,

    /// Admit the narrowing finding at this site id. Repeatable.
    #[arg(long = "allow-site", value_name = "SITE")]
    pub allow_site: Vec<String>,

    /// Emit the report as pretty JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

pub fn run(cli: Cli) -> Result<i32> {
    match cli.cmd {
        Command::Check(args) => run_check(&args),
        Command::Codes => {
            print!("{}", render_codes_md());
            Ok(EXIT_OK)
        }
    }
}

fn run_check(args: &CheckArgs) -> Result<i32> {
    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("read manifest: {}", args.input.display()))?;
    let manifest = WidthManifest::from_slice(&bytes)
        .with_context(|| format!("parse manifest: {}", args.input.display()))?;

    let opts = AuditOptions {
        policy: args.policy,
        allow_sites: args.allow_site.clone(),
    };
    let report = report(&bytes, &manifest, &opts);

    for diagnostic in &report.diagnostics {
        eprintln!("{diagnostic}");
    }
    eprintln!(
        "natlen-audit: {} error(s), {} warning(s), {} note(s)",
        report.counts.errors, report.counts.warnings, report.counts.infos
    );

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("encode report JSON")?
        );
    }

    Ok(if report.ok { EXIT_OK } else { EXIT_FINDINGS })
}
