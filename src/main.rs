use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use sqlx::migrate::Migrator;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use account_service::adapters::{
    self, MemoryStore, PostgresAccountRepository, PostgresOwnerRepository,
    PostgresTransactionRepository,
};
use account_service::cli::{self, Cli, Commands, DbCommands, OwnerCommands};
use account_service::config::{Config, StoreBackend};
use account_service::services::{AccountService, TransactionService};
use account_service::{AppState, create_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&config).await,
        Commands::Db(DbCommands::Migrate) => cli::handle_db_migrate(&config).await,
        Commands::Owner(OwnerCommands::Create { name }) => {
            cli::handle_owner_create(&config, &name).await
        }
        Commands::Config => cli::handle_config_validate(&config),
    }
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    // The store handle is built here and handed to the gateways; nothing
    // initializes storage behind the caller's back.
    let (state, pool) = build_state(config).await?;

    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("database pool closed");
    }

    Ok(())
}

async fn build_state(config: &Config) -> anyhow::Result<(AppState, Option<sqlx::PgPool>)> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let pool = adapters::create_pool(config.require_database_url()?).await?;

            let migrator = Migrator::new(Path::new("./migrations")).await?;
            migrator.run(&pool).await?;
            tracing::info!("Database migrations completed");

            let owners = Arc::new(PostgresOwnerRepository::new(pool.clone()));
            let accounts = Arc::new(PostgresAccountRepository::new(pool.clone()));
            let transactions = Arc::new(PostgresTransactionRepository::new(pool.clone()));

            let state = AppState {
                accounts: AccountService::new(owners.clone(), accounts.clone()),
                transactions: TransactionService::new(owners, accounts, transactions),
            };
            Ok((state, Some(pool)))
        }
        StoreBackend::Memory => {
            let store = MemoryStore::new();
            let demo_owner = store.seed_owner("demo");
            tracing::info!(owner_id = %demo_owner.id, "memory store ready with demo owner");

            let owners = Arc::new(store.owners());
            let accounts = Arc::new(store.accounts());
            let transactions = Arc::new(store.transactions());

            let state = AppState {
                accounts: AccountService::new(owners.clone(), accounts.clone()),
                transactions: TransactionService::new(owners, accounts, transactions),
            };
            Ok((state, None))
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", err);
    }
}
