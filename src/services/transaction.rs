//! Transaction lifecycle manager.
//!
//! A balance operation is validated, applied to the account, and
//! recorded as a transaction in one store transaction. Rejected attempts
//! are recorded separately by the boundary layer through the
//! `record_failed_*` operations, so every attempt stays auditable.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::{Transaction, TransactionType};
use crate::error::AppError;
use crate::ports::{AccountRepository, OwnerRepository, TransactionRepository};

/// Transactions older than this may no longer be cancelled.
const CANCEL_WINDOW_DAYS: i64 = 365;

#[derive(Clone)]
pub struct TransactionService {
    owners: Arc<dyn OwnerRepository>,
    accounts: Arc<dyn AccountRepository>,
    transactions: Arc<dyn TransactionRepository>,
}

impl TransactionService {
    pub fn new(
        owners: Arc<dyn OwnerRepository>,
        accounts: Arc<dyn AccountRepository>,
        transactions: Arc<dyn TransactionRepository>,
    ) -> Self {
        Self {
            owners,
            accounts,
            transactions,
        }
    }

    /// Debits `amount` from the account and records the applied
    /// transaction.
    pub async fn use_balance(
        &self,
        owner_id: Uuid,
        account_number: &str,
        amount: i64,
    ) -> Result<Transaction, AppError> {
        let owner = self
            .owners
            .find_by_id(owner_id)
            .await?
            .ok_or(AppError::OwnerNotFound)?;
        let mut account = self
            .accounts
            .find_by_number(account_number)
            .await?
            .ok_or(AppError::AccountNotFound)?;

        if account.owner_id != owner.id {
            return Err(AppError::OwnershipMismatch);
        }
        if !account.is_in_use() {
            return Err(AppError::AccountClosed);
        }

        account.debit(amount)?;

        let transaction = Transaction::success(TransactionType::Use, &account, amount);
        self.transactions
            .insert_with_account(&transaction, &account)
            .await?;

        tracing::info!(
            account_number = %account.account_number,
            amount,
            transaction_id = %transaction.transaction_id,
            "balance used"
        );
        Ok(transaction)
    }

    /// Reverses an applied debit. Only full cancellation of a
    /// transaction younger than the cancel window is allowed.
    pub async fn cancel_balance(
        &self,
        transaction_id: &str,
        account_number: &str,
        amount: i64,
    ) -> Result<Transaction, AppError> {
        let original = self
            .transactions
            .find_by_transaction_id(transaction_id)
            .await?
            .ok_or(AppError::TransactionNotFound)?;
        let mut account = self
            .accounts
            .find_by_number(account_number)
            .await?
            .ok_or(AppError::AccountNotFound)?;

        if original.account_id != account.id {
            return Err(AppError::TransactionAccountMismatch);
        }
        if original.amount != amount {
            return Err(AppError::PartialCancelNotAllowed);
        }
        if original.transacted_at < Utc::now() - Duration::days(CANCEL_WINDOW_DAYS) {
            return Err(AppError::CancelWindowExpired);
        }

        account.credit(amount)?;

        let transaction = Transaction::success(TransactionType::Cancel, &account, amount);
        self.transactions
            .insert_with_account(&transaction, &account)
            .await?;

        tracing::info!(
            account_number = %account.account_number,
            amount,
            cancelled = %original.transaction_id,
            transaction_id = %transaction.transaction_id,
            "balance use cancelled"
        );
        Ok(transaction)
    }

    /// Records the audit trail for a use attempt some upstream check
    /// already rejected. Runs none of the `use_balance` validations.
    pub async fn record_failed_use(
        &self,
        account_number: &str,
        amount: i64,
    ) -> Result<(), AppError> {
        self.record_failure(TransactionType::Use, account_number, amount)
            .await
    }

    /// Symmetric to [`Self::record_failed_use`] for cancel attempts.
    pub async fn record_failed_cancel(
        &self,
        account_number: &str,
        amount: i64,
    ) -> Result<(), AppError> {
        self.record_failure(TransactionType::Cancel, account_number, amount)
            .await
    }

    async fn record_failure(
        &self,
        transaction_type: TransactionType,
        account_number: &str,
        amount: i64,
    ) -> Result<(), AppError> {
        let account = self
            .accounts
            .find_by_number(account_number)
            .await?
            .ok_or(AppError::AccountNotFound)?;

        let transaction = Transaction::failure(transaction_type, &account, amount);
        self.transactions.insert(&transaction).await?;

        tracing::warn!(
            account_number = %account.account_number,
            amount,
            kind = transaction_type.as_str(),
            "rejected attempt recorded"
        );
        Ok(())
    }

    pub async fn query_transaction(&self, transaction_id: &str) -> Result<Transaction, AppError> {
        self.transactions
            .find_by_transaction_id(transaction_id)
            .await?
            .ok_or(AppError::TransactionNotFound)
    }
}
