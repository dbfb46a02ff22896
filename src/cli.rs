use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "berrygen",
    version,
    about = "Regenerates precompiled Berry structures for a firmware build"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(long, global = true, help = "Path to a berrygen.toml config file")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Firmware project root (contains lib/berry)")]
    pub project_dir: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Interpreter used to launch the coc generator"
    )]
    pub python: Option<String>,
    #[arg(
        long = "build-flags",
        global = true,
        allow_hyphen_values = true,
        help = "Build flags to read -D definitions from (repeatable)"
    )]
    pub build_flags: Vec<String>,
    #[arg(
        long,
        global = true,
        help = "Do not pass lib/berry_mapping/src to the generator"
    )]
    pub no_mapping: bool,
    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Regenerate structures when FT_BERRY=1 is defined, otherwise do nothing
    Run,
    /// Regenerate structures regardless of the feature flag
    Generate,
    /// Clear the generate directory without running the generator
    Clean,
    /// Show what generate would delete and run, without side effects
    Plan,
    /// Report whether a definition is set to "1"
    Flag { name: String },
    /// Print the resolved configuration and where each value came from
    Config,
}
