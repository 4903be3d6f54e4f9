use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use account_service::adapters::MemoryStore;
use account_service::domain::{TransactionResult, TransactionType};
use account_service::services::{AccountService, TransactionService};
use account_service::{AppState, create_app};

fn app(store: &MemoryStore) -> axum::Router {
    let owners = Arc::new(store.owners());
    let accounts = Arc::new(store.accounts());
    let transactions = Arc::new(store.transactions());

    create_app(AppState {
        accounts: AccountService::new(owners.clone(), accounts.clone()),
        transactions: TransactionService::new(owners, accounts, transactions),
    })
}

async fn send(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let store = MemoryStore::new();
    let router = app(&store);

    let (status, body) = send(&router, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn creating_an_account_returns_created() {
    let store = MemoryStore::new();
    let owner = store.seed_owner("dana");
    let router = app(&store);

    let (status, body) = send(
        &router,
        "POST",
        "/accounts",
        Some(json!({"owner_id": owner.id, "initial_balance": 500})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["owner_id"], json!(owner.id));
    assert_eq!(body["account_number"], "1000000000");
}

#[tokio::test]
async fn creating_for_an_unknown_owner_is_not_found() {
    let store = MemoryStore::new();
    let router = app(&store);

    let (status, body) = send(
        &router,
        "POST",
        "/accounts",
        Some(json!({"owner_id": Uuid::new_v4(), "initial_balance": 0})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "OWNER_NOT_FOUND");
}

#[tokio::test]
async fn negative_initial_balance_is_an_invalid_request() {
    let store = MemoryStore::new();
    let owner = store.seed_owner("dana");
    let router = app(&store);

    let (status, body) = send(
        &router,
        "POST",
        "/accounts",
        Some(json!({"owner_id": owner.id, "initial_balance": -1})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn closing_an_account_round_trips() {
    let store = MemoryStore::new();
    let owner = store.seed_owner("dana");
    let router = app(&store);

    let (_, created) = send(
        &router,
        "POST",
        "/accounts",
        Some(json!({"owner_id": owner.id, "initial_balance": 0})),
    )
    .await;

    let (status, body) = send(
        &router,
        "DELETE",
        "/accounts",
        Some(json!({
            "owner_id": owner.id,
            "account_number": created["account_number"],
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["account_number"], created["account_number"]);
    assert!(!body["unregistered_at"].is_null());
}

#[tokio::test]
async fn listing_accounts_shows_balances() {
    let store = MemoryStore::new();
    let owner = store.seed_owner("dana");
    let router = app(&store);

    send(
        &router,
        "POST",
        "/accounts",
        Some(json!({"owner_id": owner.id, "initial_balance": 100})),
    )
    .await;
    send(
        &router,
        "POST",
        "/accounts",
        Some(json!({"owner_id": owner.id, "initial_balance": 200})),
    )
    .await;

    let (status, body) = send(
        &router,
        "GET",
        &format!("/accounts?owner_id={}", owner.id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[0]["balance"], 100);
    assert_eq!(body[1]["balance"], 200);
}

#[tokio::test]
async fn use_and_cancel_round_trip_through_the_api() {
    let store = MemoryStore::new();
    let owner = store.seed_owner("dana");
    let router = app(&store);

    let (_, created) = send(
        &router,
        "POST",
        "/accounts",
        Some(json!({"owner_id": owner.id, "initial_balance": 1000})),
    )
    .await;
    let account_number = created["account_number"].clone();

    let (status, used) = send(
        &router,
        "POST",
        "/transactions/use",
        Some(json!({
            "owner_id": owner.id,
            "account_number": account_number,
            "amount": 300,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(used["result"], "SUCCESS");
    assert_eq!(used["transaction_type"], "USE");

    let (status, cancelled) = send(
        &router,
        "POST",
        "/transactions/cancel",
        Some(json!({
            "transaction_id": used["transaction_id"],
            "account_number": account_number,
            "amount": 300,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["transaction_type"], "CANCEL");

    let (status, listed) = send(
        &router,
        "GET",
        &format!("/accounts?owner_id={}", owner.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["balance"], 1000);
}

#[tokio::test]
async fn a_rejected_use_records_a_fail_transaction() {
    let store = MemoryStore::new();
    let owner = store.seed_owner("dana");
    let router = app(&store);

    let (_, created) = send(
        &router,
        "POST",
        "/accounts",
        Some(json!({"owner_id": owner.id, "initial_balance": 100})),
    )
    .await;

    let (status, body) = send(
        &router,
        "POST",
        "/transactions/use",
        Some(json!({
            "owner_id": owner.id,
            "account_number": created["account_number"],
            "amount": 500,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INSUFFICIENT_BALANCE");

    let recorded = store.transactions_snapshot();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].transaction_type, TransactionType::Use);
    assert_eq!(recorded[0].result, TransactionResult::Fail);
    assert_eq!(recorded[0].balance_snapshot, 100);
}

#[tokio::test]
async fn shape_violations_record_no_fail_transaction() {
    let store = MemoryStore::new();
    let owner = store.seed_owner("dana");
    let router = app(&store);

    let (_, created) = send(
        &router,
        "POST",
        "/accounts",
        Some(json!({"owner_id": owner.id, "initial_balance": 100})),
    )
    .await;

    let (status, body) = send(
        &router,
        "POST",
        "/transactions/use",
        Some(json!({
            "owner_id": owner.id,
            "account_number": created["account_number"],
            "amount": 0,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");
    assert!(store.transactions_snapshot().is_empty());
}

#[tokio::test]
async fn querying_a_transaction_echoes_the_record() {
    let store = MemoryStore::new();
    let owner = store.seed_owner("dana");
    let router = app(&store);

    let (_, created) = send(
        &router,
        "POST",
        "/accounts",
        Some(json!({"owner_id": owner.id, "initial_balance": 1000})),
    )
    .await;

    let (_, used) = send(
        &router,
        "POST",
        "/transactions/use",
        Some(json!({
            "owner_id": owner.id,
            "account_number": created["account_number"],
            "amount": 250,
        })),
    )
    .await;

    let (status, queried) = send(
        &router,
        "GET",
        &format!("/transactions/{}", used["transaction_id"].as_str().unwrap()),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(queried["transaction_id"], used["transaction_id"]);
    assert_eq!(queried["account_number"], created["account_number"]);
    assert_eq!(queried["transaction_type"], "USE");
    assert_eq!(queried["amount"], 250);
}

#[tokio::test]
async fn querying_an_unknown_transaction_is_not_found() {
    let store = MemoryStore::new();
    let router = app(&store);

    let (status, body) = send(&router, "GET", "/transactions/missing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "TRANSACTION_NOT_FOUND");
}
