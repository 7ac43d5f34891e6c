//! import-employees - sync SOC employees of the stored companies into `funcionarios`

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use soc_sync::batch::WORKER_POOL_SIZE;
use soc_sync::db::PgStore;
use soc_sync::jobs::{EmployeeJobOptions, run_employee_import};
use soc_sync::soc::SocClient;
use soc_sync::{Config, LogSettings, SyncResult};

/// Import employees of every active company (or of one company)
#[derive(Parser, Debug)]
#[command(name = "import-employees", version)]
struct Cli {
    /// Include dismissed employees
    #[arg(long)]
    all: bool,

    /// Only sync this company code, active or not
    #[arg(long, visible_alias = "company", value_name = "CODE")]
    empresa: Option<i64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();

    let log_settings = LogSettings::from_env();
    if let Err(e) = soc_sync::logger::init_logger(&log_settings, "employee_import.log") {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let options = EmployeeJobOptions {
        include_inactive: cli.all,
        company_code: cli.empresa,
    };

    match run(options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(
                error = %e,
                body = e.body().unwrap_or_default(),
                "Employee import failed"
            );
            ExitCode::FAILURE
        }
    }
}

async fn run(options: EmployeeJobOptions) -> SyncResult<()> {
    let config = Config::from_env()?;
    let credentials = config.employee_export()?;
    tracing::info!(database = %config.masked_database_url(), "Connecting to database");

    // one connection per worker plus the company listing
    let store = PgStore::connect(&config.database_url, WORKER_POOL_SIZE as u32 + 1).await?;
    let client = SocClient::new(&config.soc_api_url, config.rate_limit)?
        .with_employee_export(credentials);

    run_employee_import(&client, Arc::new(store), options).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from(["import-employees", "--all", "--empresa", "42"]);
        assert!(cli.all);
        assert_eq!(cli.empresa, Some(42));

        let cli = Cli::parse_from(["import-employees", "--company", "7"]);
        assert!(!cli.all);
        assert_eq!(cli.empresa, Some(7));

        assert!(Cli::try_parse_from(["import-employees", "--empresa", "abc"]).is_err());
    }
}
