use std::time::Duration;

use anyhow::{bail, Context};
use docval_engine::{parse_base_url, ServiceSettings};
use docval_logging::LogDestination;
use log::LevelFilter;

use crate::cli::Cli;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Everything the binary needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub service: ServiceSettings,
    pub output: OutputMode,
    pub log_level: LevelFilter,
    pub log_destination: LogDestination,
}

impl ClientConfig {
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let Some(raw_url) = cli.base_url.as_deref().filter(|url| !url.trim().is_empty()) else {
            bail!("no service URL configured; pass --base-url or set DOCVAL_BASE_URL");
        };
        if cli.timeout_secs == 0 {
            bail!("--timeout-secs must be at least 1");
        }

        let base_url = parse_base_url(raw_url).context("invalid --base-url")?;
        let service = ServiceSettings {
            connect_timeout: Duration::from_secs(cli.connect_timeout_secs.max(1)),
            request_timeout: Duration::from_secs(cli.timeout_secs),
            max_response_bytes: cli.max_response_bytes,
            ..ServiceSettings::new(base_url)
        };

        Ok(Self {
            service,
            output: if cli.json {
                OutputMode::Json
            } else {
                OutputMode::Human
            },
            log_level: cli.log_level.into(),
            log_destination: match &cli.log_file {
                Some(path) => LogDestination::TerminalAndFile(path.clone()),
                None => LogDestination::Terminal,
            },
        })
    }
}
