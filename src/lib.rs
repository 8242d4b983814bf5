pub mod cli;
pub mod core;
pub mod providers;
pub mod tui;

use crate::core::config::AppConfig;
use crate::core::theme::Theme;
use crate::providers::AlphaVantageProvider;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Search { keywords: String },
    Quote { symbol: String, theme: Option<Theme> },
    Dashboard { theme: Option<Theme> },
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        base_url = %config.providers.alpha_vantage.base_url,
        theme = %config.theme,
        dashboard = ?config.dashboard,
        "Loaded config"
    );
    Ok(config)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Stock-Lab starting...");

    let config = load_config(config_path)?;
    let api_key = config.resolve_api_key()?;
    let provider =
        AlphaVantageProvider::new(&config.providers.alpha_vantage.base_url, &api_key)?;
    let limits = config.dashboard.limits();

    match command {
        AppCommand::Search { keywords } => {
            cli::search::run(
                &provider,
                &keywords,
                config.dashboard.search_min_length,
                config.theme,
            )
            .await
        }
        AppCommand::Quote { symbol, theme } => {
            cli::quote::run(&provider, &symbol, &limits, theme.unwrap_or(config.theme)).await
        }
        AppCommand::Dashboard { theme } => {
            tui::run(
                Arc::new(provider),
                theme.unwrap_or(config.theme),
                config.dashboard.search_min_length,
                limits,
            )
            .await
        }
    }
}
