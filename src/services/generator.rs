use crate::domain::errors::GenerateError;
use crate::domain::models::{BuildEnv, CleanReport, DeletionWarning, GenerationReport, Invocation};
use crate::services::flags::{feature_is_set, BERRY_FEATURE_FLAG};
use crate::services::layout::BerryLayout;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Seam between the generation flow and the child process.
pub trait ToolRunner {
    /// Runs the invocation to completion. `None` means no exit code was
    /// reported (terminated by a signal).
    fn run(&mut self, invocation: &Invocation) -> Result<Option<i32>, GenerateError>;
}

pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<Option<i32>, GenerateError> {
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .status()
            .map_err(|source| GenerateError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;
        Ok(status.code())
    }
}

/// Entries directly inside the generate directory, sorted. A missing
/// directory has nothing to delete.
pub fn pending_deletions(generate_dir: &Path) -> Result<Vec<PathBuf>, GenerateError> {
    if !generate_dir.exists() {
        return Ok(Vec::new());
    }
    let read_err = |source| GenerateError::ReadGenerateDir {
        path: generate_dir.to_path_buf(),
        source,
    };
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(generate_dir).map_err(read_err)? {
        entries.push(entry.map_err(read_err)?.path());
    }
    entries.sort();
    Ok(entries)
}

fn remove_entry(path: &Path) -> std::io::Result<()> {
    if std::fs::symlink_metadata(path)?.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
}

/// Deletes each path. Every failure becomes a warning, none aborts.
pub fn delete_entries(paths: Vec<PathBuf>) -> CleanReport {
    let mut report = CleanReport::default();
    for path in paths {
        match remove_entry(&path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "deleted generated file");
                report.deleted.push(path);
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to delete generated file");
                report.warnings.push(DeletionWarning {
                    path,
                    reason: err.to_string(),
                });
            }
        }
    }
    report
}

pub fn clean_generate_dir(generate_dir: &Path) -> Result<CleanReport, GenerateError> {
    Ok(delete_entries(pending_deletions(generate_dir)?))
}

pub fn build_berry_structures(
    layout: &BerryLayout,
    interpreter: &str,
    runner: &mut dyn ToolRunner,
) -> Result<GenerationReport, GenerateError> {
    let berry_dir = layout.berry_dir();
    if !berry_dir.is_dir() {
        return Err(GenerateError::MissingBerryDir(berry_dir));
    }

    let clean = clean_generate_dir(&layout.generate_dir())?;
    invoke_generator(layout.coc_invocation(interpreter), clean, runner)
}

/// Runs the generator after cleanup. Cleanup warnings ride along on the
/// error when the generator fails.
fn invoke_generator(
    invocation: Invocation,
    clean: CleanReport,
    runner: &mut dyn ToolRunner,
) -> Result<GenerationReport, GenerateError> {
    tracing::info!(
        cwd = %invocation.cwd.display(),
        command = %invocation.command_line(),
        "running berry structure generator"
    );

    match runner.run(&invocation)? {
        Some(0) => Ok(GenerationReport {
            status: "generated".to_string(),
            flag: BERRY_FEATURE_FLAG.to_string(),
            clean: Some(clean),
            invocation: Some(invocation),
            exit_code: Some(0),
        }),
        Some(code) => Err(GenerateError::ToolFailed {
            code,
            warnings: clean.warnings,
        }),
        None => Err(GenerateError::ToolTerminated {
            warnings: clean.warnings,
        }),
    }
}

/// Regenerates only when `FT_BERRY=1` is among the defines.
pub fn run(env: &BuildEnv, runner: &mut dyn ToolRunner) -> Result<GenerationReport, GenerateError> {
    if !feature_is_set(&env.defines, BERRY_FEATURE_FLAG) {
        tracing::info!(flag = BERRY_FEATURE_FLAG, "feature not enabled, skipping generation");
        return Ok(GenerationReport::skipped(BERRY_FEATURE_FLAG));
    }
    let layout = BerryLayout::new(&env.project_dir, env.include_mapping);
    build_berry_structures(&layout, &env.interpreter, runner)
}
