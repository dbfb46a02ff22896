use crate::domain::models::BuildEnv;
use crate::services::flags::parse_defines;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

const CONFIG_FILE_NAME: &str = "berrygen.toml";
const CONFIG_ENV_VAR: &str = "BERRYGEN_CONFIG_PATH";
const PROJECT_DIR_ENV_VAR: &str = "BERRYGEN_PROJECT_DIR";
const PYTHON_ENV_VAR: &str = "BERRYGEN_PYTHON";
const BUILD_FLAGS_ENV_VAR: &str = "BERRYGEN_BUILD_FLAGS";
const PLATFORMIO_BUILD_FLAGS_ENV_VAR: &str = "PLATFORMIO_BUILD_FLAGS";
const DEFAULT_INTERPRETER: &str = "python3";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    project_dir: Option<String>,
    python: Option<String>,
    build_flags: Option<Vec<String>>,
    mapping: Option<bool>,
}

#[derive(Debug)]
pub struct Config {
    pub project_dir: PathBuf,
    pub python: String,
    pub build_flags: Vec<String>,
    pub include_mapping: bool,
}

impl Config {
    pub fn build_env(&self) -> BuildEnv {
        BuildEnv {
            project_dir: self.project_dir.clone(),
            interpreter: self.python.clone(),
            defines: parse_defines(&self.build_flags.join(" ")),
            include_mapping: self.include_mapping,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Override,
    Env,
    #[serde(rename = "config")]
    ConfigFile,
    Default,
}

impl ConfigSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigSource::Override => "override",
            ConfigSource::Env => "env",
            ConfigSource::ConfigFile => "config",
            ConfigSource::Default => "default",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

#[derive(Debug, Serialize)]
pub struct ConfigReport {
    pub config_path: Option<PathBuf>,
    pub config_path_source: Option<ConfigSource>,
    pub config_file_present: bool,
    pub project_dir: ConfigValue<PathBuf>,
    pub python: ConfigValue<String>,
    pub build_flags: ConfigValue<Vec<String>>,
    pub include_mapping: ConfigValue<bool>,
}

#[derive(Debug)]
pub struct LoadResult {
    pub config: Config,
    pub report: ConfigReport,
}

#[derive(Debug, Default)]
pub struct Overrides {
    pub project_dir: Option<PathBuf>,
    pub python: Option<String>,
    pub build_flags: Vec<String>,
    pub include_mapping: Option<bool>,
}

/// Environment values consulted during resolution, captured once so the
/// resolution itself stays free of process-global reads.
#[derive(Debug, Default)]
pub struct EnvSnapshot {
    pub config_path: Option<String>,
    pub project_dir: Option<String>,
    pub python: Option<String>,
    pub build_flags: Vec<String>,
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl EnvSnapshot {
    pub fn from_process() -> Self {
        Self {
            config_path: std::env::var(CONFIG_ENV_VAR).ok(),
            project_dir: non_empty_var(PROJECT_DIR_ENV_VAR),
            python: non_empty_var(PYTHON_ENV_VAR),
            build_flags: [BUILD_FLAGS_ENV_VAR, PLATFORMIO_BUILD_FLAGS_ENV_VAR]
                .into_iter()
                .filter_map(non_empty_var)
                .collect(),
        }
    }
}

pub fn load_with_report(
    config_path_override: Option<PathBuf>,
    overrides: Overrides,
) -> Result<LoadResult> {
    resolve(config_path_override, overrides, EnvSnapshot::from_process())
}

pub fn resolve(
    config_path_override: Option<PathBuf>,
    overrides: Overrides,
    env: EnvSnapshot,
) -> Result<LoadResult> {
    // The default config file lives in the project dir, which the file
    // itself may not redirect.
    let search_dir = overrides
        .project_dir
        .clone()
        .or_else(|| env.project_dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));

    let (config_path, config_path_source, required) = match config_path_override {
        Some(path) => (Some(path), Some(ConfigSource::Override), true),
        None => match env.config_path.as_deref() {
            Some("") => anyhow::bail!("{CONFIG_ENV_VAR} is set but empty"),
            Some(path) => (Some(PathBuf::from(path)), Some(ConfigSource::Env), true),
            None => (
                Some(search_dir.join(CONFIG_FILE_NAME)),
                Some(ConfigSource::Default),
                false,
            ),
        },
    };
    let config_file_present = config_path
        .as_deref()
        .map(|path| path.exists())
        .unwrap_or(false);

    let file_config = match config_path.as_deref() {
        Some(path) => read_config_file(path, required)?,
        None => FileConfig::default(),
    };
    let file_dir = config_path.as_deref().and_then(|path| path.parent());

    let (project_dir, project_dir_source) = match overrides.project_dir {
        Some(path) => (path, ConfigSource::Override),
        None => match env.project_dir {
            Some(raw) => (PathBuf::from(raw), ConfigSource::Env),
            None => match file_config.project_dir {
                Some(raw) => (resolve_path(&raw, file_dir), ConfigSource::ConfigFile),
                None => (PathBuf::from("."), ConfigSource::Default),
            },
        },
    };

    let (python, python_source) = match overrides.python {
        Some(python) => (python, ConfigSource::Override),
        None => match env.python {
            Some(python) => (python, ConfigSource::Env),
            None => match file_config.python {
                Some(raw) => (resolve_interpreter(&raw, file_dir), ConfigSource::ConfigFile),
                None => (DEFAULT_INTERPRETER.to_string(), ConfigSource::Default),
            },
        },
    };
    if python.trim().is_empty() {
        anyhow::bail!("python interpreter must not be empty");
    }

    let (build_flags, build_flags_source) = if !overrides.build_flags.is_empty() {
        (overrides.build_flags, ConfigSource::Override)
    } else if !env.build_flags.is_empty() {
        (env.build_flags, ConfigSource::Env)
    } else {
        match file_config.build_flags {
            Some(flags) => (flags, ConfigSource::ConfigFile),
            None => (Vec::new(), ConfigSource::Default),
        }
    };

    let (include_mapping, include_mapping_source) = match overrides.include_mapping {
        Some(value) => (value, ConfigSource::Override),
        None => match file_config.mapping {
            Some(value) => (value, ConfigSource::ConfigFile),
            None => (true, ConfigSource::Default),
        },
    };

    let config = Config {
        project_dir,
        python,
        build_flags,
        include_mapping,
    };

    let report = ConfigReport {
        config_path,
        config_path_source,
        config_file_present,
        project_dir: ConfigValue {
            value: config.project_dir.clone(),
            source: project_dir_source,
        },
        python: ConfigValue {
            value: config.python.clone(),
            source: python_source,
        },
        build_flags: ConfigValue {
            value: config.build_flags.clone(),
            source: build_flags_source,
        },
        include_mapping: ConfigValue {
            value: config.include_mapping,
            source: include_mapping_source,
        },
    };

    Ok(LoadResult { config, report })
}

fn read_config_file(path: &Path, required: bool) -> Result<FileConfig> {
    if !path.exists() {
        if required {
            anyhow::bail!("config file not found at {}", path.display());
        }
        return Ok(FileConfig::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

fn resolve_path(raw: &str, base_dir: Option<&Path>) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        return path;
    }
    match base_dir {
        Some(dir) => dir.join(path),
        None => path,
    }
}

/// Bare program names stay as-is for PATH lookup; anything with a
/// separator is a path relative to the config file.
fn resolve_interpreter(raw: &str, base_dir: Option<&Path>) -> String {
    if Path::new(raw).components().count() > 1 {
        resolve_path(raw, base_dir).to_string_lossy().into_owned()
    } else {
        raw.to_string()
    }
}
