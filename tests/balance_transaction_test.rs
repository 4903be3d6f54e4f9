use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use account_service::adapters::MemoryStore;
use account_service::domain::{
    Account, AccountOwner, Transaction, TransactionResult, TransactionType,
};
use account_service::error::AppError;
use account_service::ports::AccountRepository;
use account_service::services::{AccountService, TransactionService};

struct Fixture {
    store: MemoryStore,
    accounts: AccountService,
    transactions: TransactionService,
}

fn fixture() -> Fixture {
    let store = MemoryStore::new();
    let owners = Arc::new(store.owners());
    let account_repo = Arc::new(store.accounts());
    let transaction_repo = Arc::new(store.transactions());

    Fixture {
        store: store.clone(),
        accounts: AccountService::new(owners.clone(), account_repo.clone()),
        transactions: TransactionService::new(owners, account_repo, transaction_repo),
    }
}

impl Fixture {
    async fn owner_with_account(&self, name: &str, balance: i64) -> (AccountOwner, Account) {
        let owner = self.store.seed_owner(name);
        let account = self.accounts.create_account(owner.id, balance).await.unwrap();
        (owner, account)
    }

    async fn stored_balance(&self, account_number: &str) -> i64 {
        self.store
            .accounts()
            .find_by_number(account_number)
            .await
            .unwrap()
            .unwrap()
            .balance
    }
}

#[tokio::test]
async fn use_balance_debits_and_snapshots() {
    let fx = fixture();
    let (owner, account) = fx.owner_with_account("dana", 1_000).await;

    let tx = fx
        .transactions
        .use_balance(owner.id, &account.account_number, 300)
        .await
        .unwrap();

    assert_eq!(tx.transaction_type, TransactionType::Use);
    assert_eq!(tx.result, TransactionResult::Success);
    assert_eq!(tx.amount, 300);
    assert_eq!(tx.balance_snapshot, 700);
    assert_eq!(fx.stored_balance(&account.account_number).await, 700);
}

#[tokio::test]
async fn use_balance_rejects_overdraw() {
    let fx = fixture();
    let (owner, account) = fx.owner_with_account("dana", 100).await;

    let err = fx
        .transactions
        .use_balance(owner.id, &account.account_number, 101)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InsufficientBalance));
    assert_eq!(fx.stored_balance(&account.account_number).await, 100);
}

#[tokio::test]
async fn use_balance_rejects_closed_accounts() {
    let fx = fixture();
    let (owner, account) = fx.owner_with_account("dana", 0).await;
    fx.accounts
        .close_account(owner.id, &account.account_number)
        .await
        .unwrap();

    let err = fx
        .transactions
        .use_balance(owner.id, &account.account_number, 1)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::AccountClosed));
}

#[tokio::test]
async fn use_balance_rejects_foreign_owner() {
    let fx = fixture();
    let (_, account) = fx.owner_with_account("dana", 500).await;
    let other = fx.store.seed_owner("eve");

    let err = fx
        .transactions
        .use_balance(other.id, &account.account_number, 100)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::OwnershipMismatch));
}

#[tokio::test]
async fn use_balance_rejects_unknown_owner_and_account() {
    let fx = fixture();
    let (owner, _) = fx.owner_with_account("dana", 500).await;

    let err = fx
        .transactions
        .use_balance(Uuid::new_v4(), "1000000000", 100)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::OwnerNotFound));

    let err = fx
        .transactions
        .use_balance(owner.id, "9999999999", 100)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AccountNotFound));
}

#[tokio::test]
async fn cancel_restores_the_pre_use_balance() {
    let fx = fixture();
    let (owner, account) = fx.owner_with_account("dana", 1_000).await;

    let used = fx
        .transactions
        .use_balance(owner.id, &account.account_number, 300)
        .await
        .unwrap();

    let cancelled = fx
        .transactions
        .cancel_balance(&used.transaction_id, &account.account_number, 300)
        .await
        .unwrap();

    assert_eq!(cancelled.transaction_type, TransactionType::Cancel);
    assert_eq!(cancelled.result, TransactionResult::Success);
    assert_eq!(cancelled.balance_snapshot, 1_000);
    assert_eq!(fx.stored_balance(&account.account_number).await, 1_000);
}

#[tokio::test]
async fn partial_cancellation_is_rejected() {
    let fx = fixture();
    let (owner, account) = fx.owner_with_account("dana", 1_000).await;

    let used = fx
        .transactions
        .use_balance(owner.id, &account.account_number, 300)
        .await
        .unwrap();

    let err = fx
        .transactions
        .cancel_balance(&used.transaction_id, &account.account_number, 100)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::PartialCancelNotAllowed));
    assert_eq!(fx.stored_balance(&account.account_number).await, 700);
}

#[tokio::test]
async fn cancel_rejects_transactions_past_the_window() {
    let fx = fixture();
    let (_, account) = fx.owner_with_account("dana", 1_000).await;

    let mut old = Transaction::success(TransactionType::Use, &account, 300);
    old.transacted_at = Utc::now() - Duration::days(400);
    fx.store.seed_transaction(old.clone());

    let err = fx
        .transactions
        .cancel_balance(&old.transaction_id, &account.account_number, 300)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::CancelWindowExpired));
}

#[tokio::test]
async fn cancel_rejects_a_mismatched_account() {
    let fx = fixture();
    let (owner, account) = fx.owner_with_account("dana", 1_000).await;
    let (_, other_account) = fx.owner_with_account("eve", 1_000).await;

    let used = fx
        .transactions
        .use_balance(owner.id, &account.account_number, 300)
        .await
        .unwrap();

    let err = fx
        .transactions
        .cancel_balance(&used.transaction_id, &other_account.account_number, 300)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::TransactionAccountMismatch));
}

#[tokio::test]
async fn cancel_rejects_unknown_transactions() {
    let fx = fixture();
    let (_, account) = fx.owner_with_account("dana", 1_000).await;

    let err = fx
        .transactions
        .cancel_balance("no-such-token", &account.account_number, 300)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::TransactionNotFound));
}

#[tokio::test]
async fn failed_use_is_recorded_without_touching_the_balance() {
    let fx = fixture();
    let (_, account) = fx.owner_with_account("dana", 100).await;

    fx.transactions
        .record_failed_use(&account.account_number, 10_000)
        .await
        .unwrap();

    let recorded = fx.store.transactions_snapshot();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].transaction_type, TransactionType::Use);
    assert_eq!(recorded[0].result, TransactionResult::Fail);
    assert_eq!(recorded[0].amount, 10_000);
    assert_eq!(recorded[0].balance_snapshot, 100);
    assert_eq!(fx.stored_balance(&account.account_number).await, 100);
}

#[tokio::test]
async fn failed_cancel_is_recorded_symmetrically() {
    let fx = fixture();
    let (_, account) = fx.owner_with_account("dana", 100).await;

    fx.transactions
        .record_failed_cancel(&account.account_number, 55)
        .await
        .unwrap();

    let recorded = fx.store.transactions_snapshot();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].transaction_type, TransactionType::Cancel);
    assert_eq!(recorded[0].result, TransactionResult::Fail);
}

#[tokio::test]
async fn recording_a_failure_needs_an_existing_account() {
    let fx = fixture();

    let err = fx
        .transactions
        .record_failed_use("1234567890", 100)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::AccountNotFound));
}

#[tokio::test]
async fn query_returns_the_persisted_record_unchanged() {
    let fx = fixture();
    let (owner, account) = fx.owner_with_account("dana", 1_000).await;

    let used = fx
        .transactions
        .use_balance(owner.id, &account.account_number, 300)
        .await
        .unwrap();

    let queried = fx
        .transactions
        .query_transaction(&used.transaction_id)
        .await
        .unwrap();

    assert_eq!(queried, used);
}

#[tokio::test]
async fn query_fails_for_unknown_transactions() {
    let fx = fixture();

    let err = fx
        .transactions
        .query_transaction("missing")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::TransactionNotFound));
}
