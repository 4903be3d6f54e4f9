//! Persistence gateway traits.
//!
//! One small trait per entity; implementations live in `adapters`.
//! Gateways hand back plain domain values — row types never cross this
//! boundary.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Account, AccountOwner, Transaction};

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("conflicting update of {entity} {key}")]
    Conflict { entity: &'static str, key: String },

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Storage(err.to_string())
    }
}

#[async_trait]
pub trait OwnerRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<AccountOwner>>;

    /// Provisioning only; owners are never created through the transport
    /// layer.
    async fn insert(&self, owner: &AccountOwner) -> RepositoryResult<()>;
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_number(&self, account_number: &str) -> RepositoryResult<Option<Account>>;

    async fn list_by_owner(&self, owner_id: Uuid) -> RepositoryResult<Vec<Account>>;

    /// Highest account number currently assigned, by numeric value.
    async fn highest_account_number(&self) -> RepositoryResult<Option<String>>;

    async fn count_by_owner(&self, owner_id: Uuid) -> RepositoryResult<i64>;

    async fn insert(&self, account: &Account) -> RepositoryResult<()>;

    /// Version-checked update. The stored row must still carry
    /// `account.version`; the returned account carries the bumped one.
    async fn update(&self, account: &Account) -> RepositoryResult<Account>;
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> RepositoryResult<Option<Transaction>>;

    /// Failure records; the account itself is untouched.
    async fn insert(&self, transaction: &Transaction) -> RepositoryResult<()>;

    /// Success records: persists the transaction and the updated account
    /// in one store transaction, so a balance never moves without its
    /// audit record. Version-checked like [`AccountRepository::update`].
    async fn insert_with_account(
        &self,
        transaction: &Transaction,
        account: &Account,
    ) -> RepositoryResult<Account>;
}
