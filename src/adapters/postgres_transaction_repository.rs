//! Postgres implementation of TransactionRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction as SqlxTransaction};
use uuid::Uuid;

use crate::domain::{Account, Transaction, TransactionResult, TransactionType};
use crate::ports::{RepositoryError, RepositoryResult, TransactionRepository};

#[derive(Clone)]
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_transaction(
    executor: &mut SqlxTransaction<'_, Postgres>,
    transaction: &Transaction,
) -> RepositoryResult<()> {
    sqlx::query(
        r#"
        INSERT INTO transactions (
            id, account_id, account_number, transaction_type, result,
            amount, balance_snapshot, transaction_id, transacted_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(transaction.id)
    .bind(transaction.account_id)
    .bind(&transaction.account_number)
    .bind(transaction.transaction_type.as_str())
    .bind(transaction.result.as_str())
    .bind(transaction.amount)
    .bind(transaction.balance_snapshot)
    .bind(&transaction.transaction_id)
    .bind(transaction.transacted_at)
    .execute(&mut **executor)
    .await?;

    Ok(())
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> RepositoryResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, account_id, account_number, transaction_type, result,
                   amount, balance_snapshot, transaction_id, transacted_at
            FROM transactions WHERE transaction_id = $1
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TransactionRow::into_domain).transpose()
    }

    async fn insert(&self, transaction: &Transaction) -> RepositoryResult<()> {
        let mut db_tx = self.pool.begin().await?;
        insert_transaction(&mut db_tx, transaction).await?;
        db_tx.commit().await?;

        Ok(())
    }

    async fn insert_with_account(
        &self,
        transaction: &Transaction,
        account: &Account,
    ) -> RepositoryResult<Account> {
        let mut db_tx = self.pool.begin().await?;

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
        .execute(&mut *db_tx)
        .await?;

        if result.rows_affected() == 0 {
            db_tx.rollback().await?;
            return Err(RepositoryError::Conflict {
                entity: "account",
                key: account.account_number.clone(),
            });
        }

        insert_transaction(&mut db_tx, transaction).await?;
        db_tx.commit().await?;

        let mut updated = account.clone();
        updated.version += 1;
        Ok(updated)
    }
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    account_id: Uuid,
    account_number: String,
    transaction_type: String,
    result: String,
    amount: i64,
    balance_snapshot: i64,
    transaction_id: String,
    transacted_at: chrono::DateTime<chrono::Utc>,
}

impl TransactionRow {
    fn into_domain(self) -> RepositoryResult<Transaction> {
        let transaction_type = TransactionType::parse(&self.transaction_type).ok_or_else(|| {
            RepositoryError::Corrupt(format!(
                "unknown transaction type `{}` on transaction {}",
                self.transaction_type, self.transaction_id
            ))
        })?;
        let result = TransactionResult::parse(&self.result).ok_or_else(|| {
            RepositoryError::Corrupt(format!(
                "unknown transaction result `{}` on transaction {}",
                self.result, self.transaction_id
            ))
        })?;

        Ok(Transaction {
            id: self.id,
            account_id: self.account_id,
            account_number: self.account_number,
            transaction_type,
            result,
            amount: self.amount,
            balance_snapshot: self.balance_snapshot,
            transaction_id: self.transaction_id,
            transacted_at: self.transacted_at,
        })
    }
}
