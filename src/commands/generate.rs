use crate::config::Config;
use crate::domain::errors::GenerateError;
use crate::domain::models::{CleanReport, DeletionWarning, GenerationReport, PlanReport};
use crate::services::flags::{feature_is_set, BERRY_FEATURE_FLAG};
use crate::services::generator::{self, pending_deletions, ProcessRunner};
use crate::services::layout::BerryLayout;
use crate::services::output::emit;
use anyhow::Context;

fn layout(config: &Config) -> BerryLayout {
    BerryLayout::new(&config.project_dir, config.include_mapping)
}

fn clean_lines(clean: &CleanReport) -> Vec<String> {
    let mut lines: Vec<String> = clean
        .deleted
        .iter()
        .map(|p| format!("deleted {}", p.display()))
        .collect();
    lines.extend(clean.warnings.iter().map(warning_line));
    lines
}

fn warning_line(w: &DeletionWarning) -> String {
    format!("warning: could not delete {}: {}", w.path.display(), w.reason)
}

/// Surfaces cleanup warnings that would otherwise be lost with the error.
fn with_cleanup_warnings(err: GenerateError) -> GenerateError {
    for w in err.deletion_warnings() {
        eprintln!("{}", warning_line(w));
    }
    err
}

fn generation_lines(report: &GenerationReport) -> Vec<String> {
    if report.status == "skipped" {
        return vec![format!("{} not set to 1, skipping generation", report.flag)];
    }
    let mut lines = report.clean.as_ref().map(clean_lines).unwrap_or_default();
    if let Some(inv) = &report.invocation {
        lines.push(format!("ran {} (in {})", inv.command_line(), inv.cwd.display()));
    }
    lines.push("berry structures generated".to_string());
    lines
}

pub fn handle_run(json: bool, config: &Config) -> anyhow::Result<()> {
    let env = config.build_env();
    let report = generator::run(&env, &mut ProcessRunner)
        .map_err(with_cleanup_warnings)
        .context("berry generation failed")?;
    emit(json, &report, generation_lines)
}

pub fn handle_generate(json: bool, config: &Config) -> anyhow::Result<()> {
    let report =
        generator::build_berry_structures(&layout(config), &config.python, &mut ProcessRunner)
            .map_err(with_cleanup_warnings)
            .context("berry generation failed")?;
    emit(json, &report, generation_lines)
}

pub fn handle_clean(json: bool, config: &Config) -> anyhow::Result<()> {
    let report = generator::clean_generate_dir(&layout(config).generate_dir())?;
    emit(json, &report, |r| {
        let lines = clean_lines(r);
        if lines.is_empty() {
            vec!["generate directory already empty".to_string()]
        } else {
            lines
        }
    })
}

pub fn handle_plan(json: bool, config: &Config) -> anyhow::Result<()> {
    let layout = layout(config);
    let env = config.build_env();
    let report = PlanReport {
        flag: BERRY_FEATURE_FLAG.to_string(),
        flag_set: feature_is_set(&env.defines, BERRY_FEATURE_FLAG),
        pending_deletions: pending_deletions(&layout.generate_dir())?,
        invocation: layout.coc_invocation(&config.python),
    };
    emit(json, &report, |r| {
        let mut lines = vec![format!(
            "{}: {}",
            r.flag,
            if r.flag_set { "set" } else { "not set" }
        )];
        lines.extend(
            r.pending_deletions
                .iter()
                .map(|p| format!("would delete {}", p.display())),
        );
        lines.push(format!("cwd: {}", r.invocation.cwd.display()));
        lines.push(format!("command: {}", r.invocation.command_line()));
        lines
    })
}
