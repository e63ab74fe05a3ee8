use std::fs;
use std::path::Path;

use anyhow::Context;
use docval_engine::{AdminCredentials, PromptClient};
use docval_logging::docval_info;
use serde_json::Value;

use crate::cli::{AdminArgs, PromptCommands};
use crate::config::{ClientConfig, OutputMode};

pub fn run_prompt(
    config: &ClientConfig,
    admin: AdminArgs,
    command: PromptCommands,
) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    let client = PromptClient::new(
        config.service.clone(),
        AdminCredentials {
            username: admin.admin_user,
            password: admin.admin_password,
        },
    );

    match command {
        PromptCommands::Show => {
            let prompt = runtime.block_on(client.fetch())?;
            let text = match config.output {
                OutputMode::Json => serde_json::to_string(&prompt)?,
                OutputMode::Human => serde_json::to_string_pretty(&prompt)?,
            };
            println!("{text}");
        }
        PromptCommands::Set { file } => {
            let prompt = read_prompt_file(&file)?;
            let msg = runtime.block_on(client.replace(&prompt))?;
            docval_info!("prompt replaced from {}", file.display());
            match config.output {
                OutputMode::Json => println!("{}", serde_json::json!({ "msg": msg })),
                OutputMode::Human => println!("{msg}"),
            }
        }
    }
    Ok(())
}

fn read_prompt_file(path: &Path) -> anyhow::Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}
