use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(
    name = "docval",
    version,
    about = "Upload Word documents to a validation service and show its report"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "DOCVAL_BASE_URL",
        help = "Base URL of the validation service, e.g. https://host or http://localhost:8000/api"
    )]
    pub base_url: Option<String>,
    #[arg(
        long,
        global = true,
        env = "DOCVAL_TIMEOUT_SECS",
        default_value_t = 120,
        help = "Overall request timeout in seconds"
    )]
    pub timeout_secs: u64,
    #[arg(
        long,
        global = true,
        env = "DOCVAL_CONNECT_TIMEOUT_SECS",
        default_value_t = 10,
        help = "Connect timeout in seconds"
    )]
    pub connect_timeout_secs: u64,
    #[arg(
        long,
        global = true,
        default_value_t = 5 * 1024 * 1024,
        help = "Largest response body accepted, in bytes"
    )]
    pub max_response_bytes: u64,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,
    #[arg(long, global = true, help = "Also write logs to this file")]
    pub log_file: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate one or more .doc/.docx files, one after another.
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Read or replace the service's prompt configuration (admin only).
    Prompt {
        #[command(flatten)]
        admin: AdminArgs,
        #[command(subcommand)]
        command: PromptCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum PromptCommands {
    /// Print the current prompt configuration.
    Show,
    /// Replace the prompt configuration with the JSON object in FILE.
    Set { file: PathBuf },
}

#[derive(Args, Debug)]
pub struct AdminArgs {
    #[arg(long, env = "DOCVAL_ADMIN_USER")]
    pub admin_user: String,
    #[arg(long, env = "DOCVAL_ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}
