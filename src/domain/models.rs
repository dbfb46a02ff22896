use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// A single preprocessor definition taken from the build flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Define {
    /// `-DNAME`
    Bare(String),
    /// `-DNAME=VALUE`
    Valued { name: String, value: String },
}

impl Define {
    pub fn name(&self) -> &str {
        match self {
            Define::Bare(name) => name,
            Define::Valued { name, .. } => name,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Define::Bare(_) => None,
            Define::Valued { value, .. } => Some(value),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BuildEnv {
    pub project_dir: PathBuf,
    pub interpreter: String,
    pub defines: Vec<Define>,
    pub include_mapping: bool,
}

/// Exact child process invocation, as handed to the process runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletionWarning {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanReport {
    pub deleted: Vec<PathBuf>,
    pub warnings: Vec<DeletionWarning>,
}

#[derive(Debug, Serialize)]
pub struct GenerationReport {
    /// `generated` or `skipped`.
    pub status: String,
    pub flag: String,
    pub clean: Option<CleanReport>,
    pub invocation: Option<Invocation>,
    pub exit_code: Option<i32>,
}

impl GenerationReport {
    pub fn skipped(flag: &str) -> Self {
        Self {
            status: "skipped".to_string(),
            flag: flag.to_string(),
            clean: None,
            invocation: None,
            exit_code: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub flag: String,
    pub flag_set: bool,
    pub pending_deletions: Vec<PathBuf>,
    pub invocation: Invocation,
}

#[derive(Debug, Serialize)]
pub struct FlagReport {
    pub name: String,
    pub set: bool,
    pub value: Option<String>,
}
