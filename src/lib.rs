pub mod cli;
pub mod core;
pub mod store;

use crate::cli::{
    business::BusinessCommand, cards::CardsCommand, goal::GoalCommand, loans::LoansCommand,
};
use crate::core::config::AppConfig;
use crate::core::store::Store;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use tracing::{debug, info};

pub enum AppCommand {
    Dashboard,
    Cards(CardsCommand),
    Loans(LoansCommand),
    Business(BusinessCommand),
    Analysis,
    Goal(GoalCommand),
}

/// Loads the configuration, opens the configured store and runs `command`
/// against the local date.
pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("agrofin starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = store::open(&config)?;
    let today = Local::now().date_naive();
    run_with_store(command, &config, store.as_ref(), today).await
}

pub async fn run_with_store(
    command: AppCommand,
    config: &AppConfig,
    store: &dyn Store,
    today: NaiveDate,
) -> Result<()> {
    let currency = config.currency.as_str();
    match command {
        AppCommand::Dashboard => {
            cli::dashboard::run(store, &config.dashboard, today, currency).await
        }
        AppCommand::Cards(cmd) => cli::cards::run(cmd, store, today, currency).await,
        AppCommand::Loans(cmd) => cli::loans::run(cmd, store, currency).await,
        AppCommand::Business(cmd) => cli::business::run(cmd, store, currency).await,
        AppCommand::Analysis => cli::analysis::run(store, currency).await,
        AppCommand::Goal(cmd) => cli::goal::run(cmd, store, currency).await,
    }
}
