//! antares-nr entry point: CLI wiring and config-driven test plan execution.

use std::process;

use anyhow::{Context, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use antares_nr::cli::Cli;
use antares_nr::config::{HarnessConfig, TestPlan};
use antares_nr::presets::preset_names;
use antares_nr::runner::run_plan;

fn load_plan(cli: &Cli) -> anyhow::Result<TestPlan> {
    if let Some(path) = &cli.plan {
        return Ok(TestPlan::from_toml_file(path)?);
    }
    match &cli.preset {
        Some(name) => Ok(TestPlan::from_preset(name)?),
        None => bail!("no test plan given; pass --plan <PATH> or --preset <NAME>"),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.list_presets {
        for name in preset_names() {
            println!("{name}");
        }
        return Ok(());
    }

    // --config first, then command-line overrides
    let mut config = match &cli.config {
        Some(path) => HarnessConfig::from_toml_file(path)?,
        None => HarnessConfig::default(),
    };
    cli.apply_overrides(&mut config);

    let plan = load_plan(&cli)?;

    let mut errors = config.validate_for(plan.run);
    errors.extend(plan.validate());
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(2);
    }

    let report = run_plan(&config, &plan)?;
    println!("{report}");

    if let Some(path) = &cli.report_json {
        report
            .write_json(path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "report written");
    }

    if !report.passed() {
        process::exit(1);
    }
    Ok(())
}
