//! import-companies - sync active SOC companies into `empresas`

use std::process::ExitCode;

use clap::Parser;
use soc_sync::db::PgStore;
use soc_sync::jobs::run_company_import;
use soc_sync::soc::SocClient;
use soc_sync::{Config, LogSettings, SyncResult};

/// Import active companies from the SOC export API
#[derive(Parser, Debug)]
#[command(name = "import-companies", version)]
struct Cli {}

#[tokio::main]
async fn main() -> ExitCode {
    let _cli = Cli::parse();
    let _ = dotenvy::dotenv();

    let log_settings = LogSettings::from_env();
    if let Err(e) = soc_sync::logger::init_logger(&log_settings, "company_import.log") {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(
                error = %e,
                body = e.body().unwrap_or_default(),
                "Company import failed"
            );
            ExitCode::FAILURE
        }
    }
}

async fn run() -> SyncResult<()> {
    let config = Config::from_env()?;
    let credentials = config.company_export()?;
    tracing::info!(database = %config.masked_database_url(), "Connecting to database");

    let store = PgStore::connect(&config.database_url, 1).await?;
    let client = SocClient::new(&config.soc_api_url, config.rate_limit)?
        .with_company_export(credentials);

    run_company_import(&client, &store).await?;
    Ok(())
}
