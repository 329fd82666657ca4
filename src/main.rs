use anyhow::{Context, Result};

use chronoledger::config::AppConfig;
use chronoledger::db::{Database, schema};
use chronoledger::{gateway, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env().context("Invalid configuration")?;
    let _guard = logging::init_logging(&config.log);

    let db = Database::connect(&config.database)
        .await
        .context("Failed to connect to PostgreSQL")?;

    schema::init_schema(db.pool())
        .await
        .context("Failed to initialize ledger schema")?;

    gateway::run_server(&config.gateway, db).await
}
