use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::domain::Account;
use crate::error::AppError;
use crate::validation;

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub owner_id: Uuid,
    pub initial_balance: i64,
}

#[derive(Debug, Serialize)]
pub struct CreateAccountResponse {
    pub owner_id: Uuid,
    pub account_number: String,
    pub registered_at: DateTime<Utc>,
}

pub async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_initial_balance(payload.initial_balance)?;

    let account = state
        .accounts
        .create_account(payload.owner_id, payload.initial_balance)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateAccountResponse {
            owner_id: account.owner_id,
            account_number: account.account_number,
            registered_at: account.registered_at,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct CloseAccountRequest {
    pub owner_id: Uuid,
    pub account_number: String,
}

#[derive(Debug, Serialize)]
pub struct CloseAccountResponse {
    pub owner_id: Uuid,
    pub account_number: String,
    pub unregistered_at: Option<DateTime<Utc>>,
}

pub async fn close_account(
    State(state): State<AppState>,
    Json(payload): Json<CloseAccountRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_account_number(&payload.account_number)?;

    let account = state
        .accounts
        .close_account(payload.owner_id, &payload.account_number)
        .await?;

    Ok(Json(CloseAccountResponse {
        owner_id: account.owner_id,
        account_number: account.account_number,
        unregistered_at: account.unregistered_at,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    pub owner_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub account_number: String,
    pub balance: i64,
}

impl From<Account> for AccountSummary {
    fn from(account: Account) -> Self {
        Self {
            account_number: account.account_number,
            balance: account.balance,
        }
    }
}

pub async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let accounts = state.accounts.list_accounts(query.owner_id).await?;

    Ok(Json(
        accounts
            .into_iter()
            .map(AccountSummary::from)
            .collect::<Vec<_>>(),
    ))
}
