use std::env;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracing_subscriber::{EnvFilter, Registry};

const LOG_ENV_VAR: &str = "BERRYGEN_LOG";
const LOG_FORMAT_ENV_VAR: &str = "BERRYGEN_LOG_FORMAT";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum LogFormat {
    Json,
    Pretty,
    Compact,
}

/// Installs the global subscriber. Events go to stderr so `--json` output
/// on stdout stays parseable.
pub fn init(verbose: bool) {
    let filter = build_filter(verbose);
    let registry = Registry::default().with(filter);

    // a subscriber may already be installed when embedded in a larger tool
    let _ = match parse_format(env::var(LOG_FORMAT_ENV_VAR).ok().as_deref()) {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
}

fn build_filter(verbose: bool) -> EnvFilter {
    match env::var(LOG_ENV_VAR) {
        Ok(value) => EnvFilter::new(value),
        Err(_) => {
            if verbose {
                EnvFilter::new("debug")
            } else {
                EnvFilter::new("info")
            }
        }
    }
}

fn parse_format(raw: Option<&str>) -> LogFormat {
    match raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| value.to_ascii_lowercase())
    {
        Some(value) if value == "json" => LogFormat::Json,
        Some(value) if value == "pretty" => LogFormat::Pretty,
        _ => LogFormat::Compact,
    }
}
