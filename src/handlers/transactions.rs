use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::domain::{Transaction, TransactionType};
use crate::error::AppError;
use crate::validation;

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub account_number: String,
    pub transaction_type: &'static str,
    pub result: &'static str,
    pub transaction_id: String,
    pub amount: i64,
    pub transacted_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            account_number: transaction.account_number,
            transaction_type: transaction.transaction_type.as_str(),
            result: transaction.result.as_str(),
            transaction_id: transaction.transaction_id,
            amount: transaction.amount,
            transacted_at: transaction.transacted_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UseBalanceRequest {
    pub owner_id: Uuid,
    pub account_number: String,
    pub amount: i64,
}

pub async fn use_balance(
    State(state): State<AppState>,
    Json(payload): Json<UseBalanceRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_account_number(&payload.account_number)?;
    validation::validate_amount(payload.amount)?;

    match state
        .transactions
        .use_balance(payload.owner_id, &payload.account_number, payload.amount)
        .await
    {
        Ok(transaction) => Ok(Json(TransactionResponse::from(transaction))),
        Err(err) => Err(record_rejection(
            &state,
            TransactionType::Use,
            &payload.account_number,
            payload.amount,
            err,
        )
        .await),
    }
}

#[derive(Debug, Deserialize)]
pub struct CancelBalanceRequest {
    pub transaction_id: String,
    pub account_number: String,
    pub amount: i64,
}

pub async fn cancel_balance(
    State(state): State<AppState>,
    Json(payload): Json<CancelBalanceRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_account_number(&payload.account_number)?;
    validation::validate_amount(payload.amount)?;

    match state
        .transactions
        .cancel_balance(
            &payload.transaction_id,
            &payload.account_number,
            payload.amount,
        )
        .await
    {
        Ok(transaction) => Ok(Json(TransactionResponse::from(transaction))),
        Err(err) => Err(record_rejection(
            &state,
            TransactionType::Cancel,
            &payload.account_number,
            payload.amount,
            err,
        )
        .await),
    }
}

pub async fn query_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let transaction = state.transactions.query_transaction(&transaction_id).await?;

    Ok(Json(TransactionResponse::from(transaction)))
}

/// Business rejections still leave an audit record; everything else
/// passes through untouched.
async fn record_rejection(
    state: &AppState,
    kind: TransactionType,
    account_number: &str,
    amount: i64,
    err: AppError,
) -> AppError {
    if !err.is_rejection() {
        return err;
    }

    tracing::warn!(
        code = err.code(),
        account_number,
        amount,
        kind = kind.as_str(),
        "balance operation rejected"
    );

    let recorded = match kind {
        TransactionType::Use => {
            state
                .transactions
                .record_failed_use(account_number, amount)
                .await
        }
        TransactionType::Cancel => {
            state
                .transactions
                .record_failed_cancel(account_number, amount)
                .await
        }
    };

    if let Err(record_err) = recorded {
        tracing::warn!(
            code = record_err.code(),
            account_number,
            "failed to record rejected attempt"
        );
    }

    err
}
