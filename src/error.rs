use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::ports::RepositoryError;
use crate::validation::ValidationError;

/// Every way a single request can be rejected. None of these are
/// process-fatal; each aborts the enclosing operation and surfaces
/// verbatim to the caller.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Owner not found")]
    OwnerNotFound,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Transaction not found")]
    TransactionNotFound,

    #[error("Owner already holds the maximum number of accounts")]
    TooManyAccounts,

    #[error("Account is not held by the requesting owner")]
    OwnershipMismatch,

    #[error("Account is already closed")]
    AlreadyClosed,

    #[error("Account balance is not empty")]
    BalanceNotEmpty,

    #[error("Account is closed")]
    AccountClosed,

    #[error("Amount exceeds the account balance")]
    InsufficientBalance,

    #[error("Transaction was made against a different account")]
    TransactionAccountMismatch,

    #[error("Partial cancellation is not allowed")]
    PartialCancelNotAllowed,

    #[error("Transaction is too old to cancel")]
    CancelWindowExpired,

    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Conflicting update, retry the request")]
    Conflict,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code, part of the API contract.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::OwnerNotFound => "OWNER_NOT_FOUND",
            AppError::AccountNotFound => "ACCOUNT_NOT_FOUND",
            AppError::TransactionNotFound => "TRANSACTION_NOT_FOUND",
            AppError::TooManyAccounts => "TOO_MANY_ACCOUNTS",
            AppError::OwnershipMismatch => "OWNERSHIP_MISMATCH",
            AppError::AlreadyClosed => "ALREADY_CLOSED",
            AppError::BalanceNotEmpty => "BALANCE_NOT_EMPTY",
            AppError::AccountClosed => "ACCOUNT_CLOSED",
            AppError::InsufficientBalance => "INSUFFICIENT_BALANCE",
            AppError::TransactionAccountMismatch => "TRANSACTION_ACCOUNT_MISMATCH",
            AppError::PartialCancelNotAllowed => "PARTIAL_CANCEL_NOT_ALLOWED",
            AppError::CancelWindowExpired => "CANCEL_WINDOW_EXPIRED",
            AppError::Validation(_) => "INVALID_REQUEST",
            AppError::Conflict => "CONFLICT",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True for business rejections the boundary layer turns into FAIL
    /// transaction records.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            AppError::Validation(_)
                | AppError::Conflict
                | AppError::Storage(_)
                | AppError::Internal(_)
        )
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::OwnerNotFound
            | AppError::AccountNotFound
            | AppError::TransactionNotFound => StatusCode::NOT_FOUND,
            AppError::TooManyAccounts
            | AppError::OwnershipMismatch
            | AppError::AlreadyClosed
            | AppError::BalanceNotEmpty
            | AppError::AccountClosed
            | AppError::InsufficientBalance
            | AppError::TransactionAccountMismatch
            | AppError::PartialCancelNotAllowed
            | AppError::CancelWindowExpired
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict { .. } => AppError::Conflict,
            RepositoryError::Storage(message) | RepositoryError::Corrupt(message) => {
                AppError::Storage(message)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "code": self.code(),
            "message": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
