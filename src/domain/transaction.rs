//! Balance transaction domain entity.
//!
//! A transaction records one attempted balance operation, successful or
//! not. Records are immutable once created; a cancellation is a new
//! record, never an edit of the original.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::Account;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Use,
    Cancel,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Use => "USE",
            TransactionType::Cancel => "CANCEL",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "USE" => Some(TransactionType::Use),
            "CANCEL" => Some(TransactionType::Cancel),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionResult {
    Success,
    Fail,
}

impl TransactionResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionResult::Success => "SUCCESS",
            TransactionResult::Fail => "FAIL",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "SUCCESS" => Some(TransactionResult::Success),
            "FAIL" => Some(TransactionResult::Fail),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    /// Denormalized so query responses can echo the number without a join.
    pub account_number: String,
    pub transaction_type: TransactionType,
    pub result: TransactionResult,
    pub amount: i64,
    /// Account balance after applying the operation, or the unchanged
    /// balance for rejected attempts.
    pub balance_snapshot: i64,
    /// Opaque unique token identifying this transaction to callers.
    pub transaction_id: String,
    pub transacted_at: DateTime<Utc>,
}

impl Transaction {
    /// Records an applied operation. `account` carries the post-operation
    /// balance.
    pub fn success(transaction_type: TransactionType, account: &Account, amount: i64) -> Self {
        Self::record(transaction_type, TransactionResult::Success, account, amount)
    }

    /// Records a rejected attempt; the snapshot is the unchanged balance.
    pub fn failure(transaction_type: TransactionType, account: &Account, amount: i64) -> Self {
        Self::record(transaction_type, TransactionResult::Fail, account, amount)
    }

    fn record(
        transaction_type: TransactionType,
        result: TransactionResult,
        account: &Account,
        amount: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id: account.id,
            account_number: account.account_number.clone(),
            transaction_type,
            result,
            amount,
            balance_snapshot: account.balance,
            transaction_id: new_transaction_token(),
            transacted_at: Utc::now(),
        }
    }
}

fn new_transaction_token() -> String {
    Uuid::new_v4().simple().to_string()
}
