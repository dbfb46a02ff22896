use crate::config::{Config, ConfigReport};
use crate::domain::models::FlagReport;
use crate::services::flags::{feature_is_set, find_define};
use crate::services::output::emit;

pub fn handle_flag(json: bool, config: &Config, name: &str) -> anyhow::Result<()> {
    let env = config.build_env();
    let report = FlagReport {
        name: name.to_string(),
        set: feature_is_set(&env.defines, name),
        value: find_define(&env.defines, name).and_then(|d| d.value().map(str::to_string)),
    };
    emit(json, &report, |r| {
        vec![format!(
            "{}\t{}\t{}",
            r.name,
            if r.set { "set" } else { "not_set" },
            r.value.as_deref().unwrap_or("-")
        )]
    })
}

pub fn handle_config(json: bool, report: &ConfigReport) -> anyhow::Result<()> {
    emit(json, report, |r| {
        let config_path = match (&r.config_path, r.config_path_source) {
            (Some(path), Some(source)) => format!(
                "{} ({}{})",
                path.display(),
                source.as_str(),
                if r.config_file_present { "" } else { ", missing" }
            ),
            _ => "none".to_string(),
        };
        vec![
            format!("config_file: {}", config_path),
            format!(
                "project_dir: {} ({})",
                r.project_dir.value.display(),
                r.project_dir.source.as_str()
            ),
            format!("python: {} ({})", r.python.value, r.python.source.as_str()),
            format!(
                "build_flags: {} ({})",
                r.build_flags.value.join(" "),
                r.build_flags.source.as_str()
            ),
            format!(
                "mapping: {} ({})",
                r.include_mapping.value,
                r.include_mapping.source.as_str()
            ),
        ]
    })
}
