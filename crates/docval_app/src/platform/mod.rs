mod app;
mod effects;
mod interrupt;
mod prompt;
mod ui;

use std::process::ExitCode;

use docval_logging::docval_debug;

use crate::cli::{Cli, Commands};
use crate::config::ClientConfig;

pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = ClientConfig::from_cli(&cli)?;
    docval_logging::initialize(config.log_level, config.log_destination.clone());
    docval_debug!("service base url {}", config.service.base_url);

    match cli.command {
        Commands::Validate { files } => {
            let interrupts = interrupt::spawn_interrupt_listener();
            Ok(app::run_validate(&config, &files, interrupts)?)
        }
        Commands::Prompt { admin, command } => {
            prompt::run_prompt(&config, admin, command)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
