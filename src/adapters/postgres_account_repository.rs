//! Postgres implementation of AccountRepository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Account, AccountStatus};
use crate::ports::{AccountRepository, RepositoryError, RepositoryResult};

#[derive(Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_ACCOUNT: &str = "SELECT id, owner_id, account_number, status, balance, \
     registered_at, unregistered_at, version FROM accounts";

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_by_number(&self, account_number: &str) -> RepositoryResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "{SELECT_ACCOUNT} WHERE account_number = $1"
        ))
        .bind(account_number)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_domain).transpose()
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> RepositoryResult<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "{SELECT_ACCOUNT} WHERE owner_id = $1 ORDER BY registered_at"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AccountRow::into_domain).collect()
    }

    async fn highest_account_number(&self) -> RepositoryResult<Option<String>> {
        let number: Option<String> = sqlx::query_scalar(
            "SELECT account_number FROM accounts ORDER BY account_number::bigint DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(number)
    }

    async fn count_by_owner(&self, owner_id: Uuid) -> RepositoryResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn insert(&self, account: &Account) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, owner_id, account_number, status, balance,
                registered_at, unregistered_at, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.id)
        .bind(account.owner_id)
        .bind(&account.account_number)
        .bind(account.status.as_str())
        .bind(account.balance)
        .bind(account.registered_at)
        .bind(account.unregistered_at)
        .bind(account.version)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, account: &Account) -> RepositoryResult<Account> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET status = $1, balance = $2, unregistered_at = $3, version = version + 1
            WHERE id = $4 AND version = $5
            "#,
        )
        .bind(account.status.as_str())
        .bind(account.balance)
        .bind(account.unregistered_at)
        .bind(account.id)
        .bind(account.version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Conflict {
                entity: "account",
                key: account.account_number.clone(),
            });
        }

        let mut updated = account.clone();
        updated.version += 1;
        Ok(updated)
    }
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    owner_id: Uuid,
    account_number: String,
    status: String,
    balance: i64,
    registered_at: chrono::DateTime<chrono::Utc>,
    unregistered_at: Option<chrono::DateTime<chrono::Utc>>,
    version: i64,
}

impl AccountRow {
    fn into_domain(self) -> RepositoryResult<Account> {
        let status = AccountStatus::parse(&self.status).ok_or_else(|| {
            RepositoryError::Corrupt(format!(
                "unknown account status `{}` on account {}",
                self.status, self.account_number
            ))
        })?;

        Ok(Account {
            id: self.id,
            owner_id: self.owner_id,
            account_number: self.account_number,
            status,
            balance: self.balance,
            registered_at: self.registered_at,
            unregistered_at: self.unregistered_at,
            version: self.version,
        })
    }
}
