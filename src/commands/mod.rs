//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `generate.rs` — run/generate/clean/plan.
//! - `inspect.rs` — flag/config queries, no filesystem side effects.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate generation logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod generate;
pub mod inspect;

use crate::cli::{Cli, Commands};
use crate::config::{self, Config, ConfigReport, Overrides};

fn load_config(cli: &Cli) -> anyhow::Result<(Config, ConfigReport)> {
    let overrides = Overrides {
        project_dir: cli.project_dir.clone(),
        python: cli.python.clone(),
        build_flags: cli.build_flags.clone(),
        include_mapping: cli.no_mapping.then_some(false),
    };
    let loaded = config::load_with_report(cli.config.clone(), overrides)?;
    tracing::debug!(
        project_dir = %loaded.config.project_dir.display(),
        python = %loaded.config.python,
        "configuration resolved"
    );
    Ok((loaded.config, loaded.report))
}

pub fn dispatch(cli: &Cli) -> anyhow::Result<()> {
    let (config, report) = load_config(cli)?;
    match &cli.command {
        Commands::Run => generate::handle_run(cli.json, &config),
        Commands::Generate => generate::handle_generate(cli.json, &config),
        Commands::Clean => generate::handle_clean(cli.json, &config),
        Commands::Plan => generate::handle_plan(cli.json, &config),
        Commands::Flag { name } => inspect::handle_flag(cli.json, &config, name),
        Commands::Config => inspect::handle_config(cli.json, &report),
    }
}
