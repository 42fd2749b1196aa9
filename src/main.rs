use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledger_hook::adapters::{MemoryRecordStore, PostgresRecordStore};
use ledger_hook::cli::{self, Cli, Commands, DbCommands, TxCommands};
use ledger_hook::config::{Config, LogFormat, StoreBackend};
use ledger_hook::ports::RecordStore;
use ledger_hook::services::FixedDelay;
use ledger_hook::{create_app, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    init_tracing(config.log_format);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Tx(TxCommands::Show { transaction_id }) => {
            let store = build_store(&config).await?;
            cli::handle_tx_show(store.as_ref(), &transaction_id).await
        }
        Commands::Tx(TxCommands::ForceComplete { transaction_id }) => {
            let store = build_store(&config).await?;
            cli::handle_tx_force_complete(store.as_ref(), &transaction_id).await
        }
        Commands::Db(DbCommands::Migrate) => cli::handle_db_migrate(&config).await,
        Commands::Config => cli::handle_config_validate(&config),
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn RecordStore>> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let pool = db::create_pool(config).await?;
            db::run_migrations(&pool).await?;
            Ok(Arc::new(PostgresRecordStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory record store; records are lost on restart");
            Ok(Arc::new(MemoryRecordStore::new()))
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let store = build_store(&config).await?;
    let strategy = Arc::new(FixedDelay::new(config.processing_delay));
    tracing::info!(
        delay_secs = config.processing_delay.as_secs(),
        "Completion worker configured"
    );

    let app = create_app(AppState::with_strategy(store, strategy));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
