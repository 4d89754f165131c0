//! Setup command - store the OMDb API key

use anyhow::Result;
use colored::Colorize;
use dialoguer::Input;

use cinelog_core::config::{Config, API_KEY_ENV};
use cinelog_core::services::LogEvent;

use super::{get_data_dir, get_logger, log_event};
use crate::output;

pub fn run(api_key: Option<String>) -> Result<()> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    let api_key = match api_key {
        Some(key) => key,
        None => Input::new()
            .with_prompt("OMDb API key")
            .interact_text()?,
    };
    if api_key.trim().is_empty() {
        anyhow::bail!("API key cannot be empty");
    }

    Config::save_api_key(&data_dir, &api_key)?;
    log_event(get_logger().as_ref(), LogEvent::new("api_key_saved").with_command("setup"));

    println!("{} OMDb API key saved", "Success!".green());
    if std::env::var(API_KEY_ENV).is_ok() {
        output::warning(&format!(
            "Note: {} is set and takes precedence over settings.json.",
            API_KEY_ENV
        ));
    }
    println!("Run 'cinelog add TITLE --user NAME' to look movies up.");
    Ok(())
}
