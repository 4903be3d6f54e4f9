//! Gateway implementations: Postgres for production, in-memory for
//! development and tests.

pub mod memory;
pub mod postgres_account_repository;
pub mod postgres_owner_repository;
pub mod postgres_transaction_repository;

pub use memory::MemoryStore;
pub use postgres_account_repository::PostgresAccountRepository;
pub use postgres_owner_repository::PostgresOwnerRepository;
pub use postgres_transaction_repository::PostgresTransactionRepository;

use sqlx::postgres::{PgPool, PgPoolOptions};

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}
