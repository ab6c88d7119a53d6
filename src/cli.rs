// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_CONFIG_FILE;

/// Command-line arguments for `pkgdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pkgdag",
    version,
    about = "Order package builds by their dependencies and run what is out of date.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Pkgdag.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Target architecture; overrides `[config].arch`.
    #[arg(long, value_name = "ARCH")]
    pub arch: Option<String>,

    /// Target distribution version; overrides `[config].distro`.
    #[arg(long, value_name = "DISTRO")]
    pub distro: Option<String>,

    /// Repository to scan for existing builds; overrides `[config].repository`.
    #[arg(long, value_name = "DIR")]
    pub repository: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PKGDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Compute and print the plan, but don't run any step.
    #[arg(long, conflicts_with = "emit")]
    pub dry_run: bool,

    /// Print the steps instead of running them.
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub emit: Option<EmitFormat>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Output format for `--emit`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum EmitFormat {
    /// One step per line.
    Text,
    /// JSON array of step objects.
    Json,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
