pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod ports;
pub mod services;
pub mod validation;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use crate::services::{AccountService, TransactionService};

#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub transactions: TransactionService,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/accounts",
            post(handlers::accounts::create_account)
                .delete(handlers::accounts::close_account)
                .get(handlers::accounts::list_accounts),
        )
        .route("/transactions/use", post(handlers::transactions::use_balance))
        .route(
            "/transactions/cancel",
            post(handlers::transactions::cancel_balance),
        )
        .route(
            "/transactions/:transaction_id",
            get(handlers::transactions::query_transaction),
        )
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
