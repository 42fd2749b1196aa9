use chrono::Utc;
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::ports::{RecordStore, StoreError};

#[derive(Parser)]
#[command(name = "ledger-hook")]
#[command(about = "Ledger Hook - idempotent transaction webhook processor", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Transaction management commands
    #[command(subcommand)]
    Tx(TxCommands),

    /// Database management commands
    #[command(subcommand)]
    Db(DbCommands),

    /// Configuration validation
    Config,
}

#[derive(Subcommand)]
pub enum TxCommands {
    /// Print a stored transaction as JSON
    Show {
        #[arg(value_name = "TRANSACTION_ID")]
        transaction_id: String,
    },

    /// Mark a transaction stuck in PROCESSING as processed
    ForceComplete {
        #[arg(value_name = "TRANSACTION_ID")]
        transaction_id: String,
    },
}

#[derive(Subcommand)]
pub enum DbCommands {
    /// Run database migrations
    Migrate,
}

pub async fn handle_tx_show(store: &dyn RecordStore, transaction_id: &str) -> anyhow::Result<()> {
    match store.find(transaction_id).await? {
        Some(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        None => anyhow::bail!("Transaction {} not found", transaction_id),
    }
}

pub async fn handle_tx_force_complete(
    store: &dyn RecordStore,
    transaction_id: &str,
) -> anyhow::Result<()> {
    match store.update_to_processed(transaction_id, Utc::now()).await {
        Ok(true) => {
            tracing::info!(transaction_id = %transaction_id, "Transaction force-completed");
            println!("✓ Transaction {} marked as PROCESSED", transaction_id);
            Ok(())
        }
        Ok(false) => {
            println!("Transaction {} was already PROCESSED", transaction_id);
            Ok(())
        }
        Err(StoreError::NotFound(_)) => {
            tracing::warn!(transaction_id = %transaction_id, "Transaction not found");
            anyhow::bail!("Transaction {} not found", transaction_id)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn handle_db_migrate(config: &Config) -> anyhow::Result<()> {
    let pool = crate::db::create_pool(config).await?;

    tracing::info!("Running database migrations...");
    crate::db::run_migrations(&pool).await?;

    println!("✓ Database migrations completed");
    Ok(())
}

pub fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    println!("Configuration:");
    println!("  Server Port: {}", config.server_port);
    println!("  Database URL: {}", mask_password(&config.database_url));
    println!("  Max DB Connections: {}", config.db_max_connections);
    println!("  Store Backend: {:?}", config.store_backend);
    println!("  Processing Delay: {}s", config.processing_delay.as_secs());
    println!("  Log Format: {:?}", config.log_format);

    println!("✓ Configuration is valid");
    Ok(())
}

fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            if let Some(slash_pos) = url[..colon_pos].rfind("//") {
                let prefix = &url[..slash_pos + 2];
                let user = &url[slash_pos + 2..colon_pos];
                let suffix = &url[at_pos..];
                return format!("{}{}:****{}", prefix, user, suffix);
            }
        }
    }
    url.to_string()
}
