use crate::cli::{Cli, Command};
use crate::commands::{CommandReport, execute};
use crate::error::AppError;
use crate::logger::initialize as LoggerInitialize;
use crate::settings;

use expense_core::config::load_dotenv;
use expense_core::{AggregationClient, SyncCoordinator};

use log::info;

/// Wires config, logger, client and coordinator, then runs the requested command.
pub async fn run(cli: Cli) -> Result<CommandReport, AppError> {
    let config_dir = settings::config_dir(cli.config_dir.as_deref())?;

    // Logger first so config problems end up in the log file
    LoggerInitialize(&config_dir, cli.verbose)?;
    info!("Config directory: {}", config_dir.display());

    load_dotenv();
    let config = settings::resolve(&config_dir, cli.api_url.as_deref())?;
    info!("Expense store: {}", config.server.base_url);

    let client = AggregationClient::with_timeout(&config.server.base_url, config.request_timeout())?;
    let coordinator = SyncCoordinator::new(client);

    let command = cli.command.unwrap_or_else(Command::default_view);
    execute(&coordinator, command).await
}
