use clap::{Parser, Subcommand};
use sqlx::migrate::Migrator;
use std::path::Path;

use crate::adapters::{self, PostgresOwnerRepository};
use crate::config::{Config, StoreBackend};
use crate::domain::AccountOwner;
use crate::ports::OwnerRepository;

#[derive(Parser)]
#[command(name = "account-service")]
#[command(about = "Banking back-office account and balance service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Database management commands
    #[command(subcommand)]
    Db(DbCommands),

    /// Owner provisioning commands
    #[command(subcommand)]
    Owner(OwnerCommands),

    /// Configuration validation
    Config,
}

#[derive(Subcommand)]
pub enum DbCommands {
    /// Run database migrations
    Migrate,
}

#[derive(Subcommand)]
pub enum OwnerCommands {
    /// Provision a new account owner
    Create {
        /// Display name of the owner
        #[arg(value_name = "NAME")]
        name: String,
    },
}

pub async fn handle_db_migrate(config: &Config) -> anyhow::Result<()> {
    let pool = adapters::create_pool(config.require_database_url()?).await?;
    let migrator = Migrator::new(Path::new("./migrations")).await?;

    tracing::info!("Running database migrations...");
    migrator.run(&pool).await?;
    pool.close().await;

    println!("✓ Database migrations completed");
    Ok(())
}

pub async fn handle_owner_create(config: &Config, name: &str) -> anyhow::Result<()> {
    if config.store_backend != StoreBackend::Postgres {
        anyhow::bail!("owner provisioning requires the postgres backend");
    }

    let pool = adapters::create_pool(config.require_database_url()?).await?;
    let owners = PostgresOwnerRepository::new(pool.clone());

    let owner = AccountOwner::new(name);
    owners.insert(&owner).await?;
    pool.close().await;

    tracing::info!(owner_id = %owner.id, "owner provisioned");
    println!("✓ Owner {} created with id {}", owner.name, owner.id);
    Ok(())
}

pub fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    println!("Configuration:");
    println!("  Server Port:   {}", config.server_port);
    println!("  Store Backend: {:?}", config.store_backend);
    match &config.database_url {
        Some(url) => println!("  Database URL:  {}", mask_password(url)),
        None => println!("  Database URL:  (not set)"),
    }

    println!("✓ Configuration is valid");
    Ok(())
}

fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            if let Some(slash_pos) = url[..colon_pos].rfind("//") {
                let prefix = &url[..slash_pos + 2];
                let user_start = slash_pos + 2;
                let user = &url[user_start..colon_pos];
                let suffix = &url[at_pos..];
                return format!("{}{}:****{}", prefix, user, suffix);
            }
        }
    }
    url.to_string()
}
