//! Account lifecycle manager.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Account, AccountStatus, MAX_ACCOUNTS_PER_OWNER};
use crate::error::AppError;
use crate::ports::{AccountRepository, OwnerRepository};

#[derive(Clone)]
pub struct AccountService {
    owners: Arc<dyn OwnerRepository>,
    accounts: Arc<dyn AccountRepository>,
}

impl AccountService {
    pub fn new(owners: Arc<dyn OwnerRepository>, accounts: Arc<dyn AccountRepository>) -> Self {
        Self { owners, accounts }
    }

    /// Opens a new account for `owner_id` under the next sequential
    /// account number.
    pub async fn create_account(
        &self,
        owner_id: Uuid,
        initial_balance: i64,
    ) -> Result<Account, AppError> {
        let owner = self
            .owners
            .find_by_id(owner_id)
            .await?
            .ok_or(AppError::OwnerNotFound)?;

        let held = self.accounts.count_by_owner(owner.id).await?;
        if held >= MAX_ACCOUNTS_PER_OWNER {
            return Err(AppError::TooManyAccounts);
        }

        let highest = self.accounts.highest_account_number().await?;
        let account_number = Account::next_account_number(highest.as_deref())?;

        let account = Account::open(owner.id, account_number, initial_balance);
        self.accounts.insert(&account).await?;

        tracing::info!(
            owner_id = %owner.id,
            account_number = %account.account_number,
            "account created"
        );
        Ok(account)
    }

    /// Closes an account. The balance must already be empty; it stays
    /// frozen afterwards.
    pub async fn close_account(
        &self,
        owner_id: Uuid,
        account_number: &str,
    ) -> Result<Account, AppError> {
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
        if account.status == AccountStatus::Unregistered {
            return Err(AppError::AlreadyClosed);
        }
        if account.balance > 0 {
            return Err(AppError::BalanceNotEmpty);
        }

        account.close();
        let account = self.accounts.update(&account).await?;

        tracing::info!(
            owner_id = %owner.id,
            account_number = %account.account_number,
            "account closed"
        );
        Ok(account)
    }

    pub async fn list_accounts(&self, owner_id: Uuid) -> Result<Vec<Account>, AppError> {
        let owner = self
            .owners
            .find_by_id(owner_id)
            .await?
            .ok_or(AppError::OwnerNotFound)?;

        Ok(self.accounts.list_by_owner(owner.id).await?)
    }
}
