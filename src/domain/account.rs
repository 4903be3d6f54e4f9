//! Account domain entity.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AppError;

/// Account number handed out when no accounts exist yet.
pub const ACCOUNT_NUMBER_SEED: &str = "1000000000";

/// How many accounts a single owner may hold, counting all statuses.
pub const MAX_ACCOUNTS_PER_OWNER: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    InUse,
    Unregistered,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::InUse => "IN_USE",
            AccountStatus::Unregistered => "UNREGISTERED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "IN_USE" => Some(AccountStatus::InUse),
            "UNREGISTERED" => Some(AccountStatus::Unregistered),
            _ => None,
        }
    }
}

/// Domain entity representing a single account.
///
/// Invariant: `balance` never goes below zero. A closed account keeps the
/// balance it had at closing time.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub account_number: String,
    pub status: AccountStatus,
    pub balance: i64,
    pub registered_at: DateTime<Utc>,
    pub unregistered_at: Option<DateTime<Utc>>,
    /// Optimistic concurrency counter, bumped by every successful update.
    pub version: i64,
}

impl Account {
    pub fn open(owner_id: Uuid, account_number: String, initial_balance: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            account_number,
            status: AccountStatus::InUse,
            balance: initial_balance,
            registered_at: Utc::now(),
            unregistered_at: None,
            version: 0,
        }
    }

    /// Account number following `highest`, or the seed when no accounts
    /// exist yet. Numbers are compared by numeric value.
    pub fn next_account_number(highest: Option<&str>) -> Result<String, AppError> {
        match highest {
            None => Ok(ACCOUNT_NUMBER_SEED.to_string()),
            Some(number) => {
                let value: i64 = number.parse().map_err(|_| {
                    AppError::Internal(format!("non-numeric account number in store: {number}"))
                })?;
                Ok((value + 1).to_string())
            }
        }
    }

    pub fn is_in_use(&self) -> bool {
        self.status == AccountStatus::InUse
    }

    pub fn debit(&mut self, amount: i64) -> Result<(), AppError> {
        if amount > self.balance {
            return Err(AppError::InsufficientBalance);
        }
        self.balance -= amount;
        Ok(())
    }

    pub fn credit(&mut self, amount: i64) -> Result<(), AppError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| AppError::Internal("account balance overflow".to_string()))?;
        Ok(())
    }

    /// Marks the account closed; the balance is frozen from this point on.
    pub fn close(&mut self) {
        self.status = AccountStatus::Unregistered;
        self.unregistered_at = Some(Utc::now());
    }
}
