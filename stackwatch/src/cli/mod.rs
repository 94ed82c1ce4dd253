//! CLI module for stackwatch
//!
//! Provides command-line interface for running and inspecting health passes.

pub mod list;
pub mod run;
pub mod validate;

use clap::{Parser, Subcommand};

/// stackwatch - Consolidated health/alert aggregator for service stacks
#[derive(Parser, Debug)]
#[command(name = "stackwatch")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    STACKWATCH_CONFIG       Configuration file path (default: stackwatch.toml)
    STACKWATCH_LOG_LEVEL    Diagnostic log level (default: info)
    STACKWATCH_HOSTNAME     Host identity used in alert headers

EXIT CODES:
    0   All checks OK (WARN alone does not fail the pass)
    1   At least one check is FAIL
    2   Configuration or startup error
"#)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one health pass over all configured checks
    Run(run::RunArgs),
    /// Load and validate the configuration without running checks
    Validate(validate::ValidateArgs),
    /// List configured checks
    List(list::ListArgs),
}
