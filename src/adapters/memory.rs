//! In-memory gateway set.
//!
//! Development and test double for the Postgres adapters: one shared
//! store handle, one facade per gateway trait. The store is constructed
//! explicitly and dies with the process; nothing is initialized behind
//! the caller's back. Locks are never held across an await point.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Account, AccountOwner, Transaction};
use crate::ports::{
    AccountRepository, OwnerRepository, RepositoryError, RepositoryResult, TransactionRepository,
};

#[derive(Default)]
struct StoreInner {
    owners: Vec<AccountOwner>,
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
}

/// Shared handle over the in-memory tables. Cheap to clone; every
/// facade created from it sees the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owners(&self) -> MemoryOwnerRepository {
        MemoryOwnerRepository {
            store: self.clone(),
        }
    }

    pub fn accounts(&self) -> MemoryAccountRepository {
        MemoryAccountRepository {
            store: self.clone(),
        }
    }

    pub fn transactions(&self) -> MemoryTransactionRepository {
        MemoryTransactionRepository {
            store: self.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seeds an owner directly, bypassing the gateways.
    pub fn seed_owner(&self, name: &str) -> AccountOwner {
        let owner = AccountOwner::new(name);
        self.lock().owners.push(owner.clone());
        owner
    }

    /// Seeds an account directly, bypassing the gateways.
    pub fn seed_account(&self, account: Account) {
        self.lock().accounts.push(account);
    }

    /// Seeds a transaction record directly, bypassing the gateways.
    pub fn seed_transaction(&self, transaction: Transaction) {
        self.lock().transactions.push(transaction);
    }

    /// Snapshot of every stored transaction, insertion order.
    pub fn transactions_snapshot(&self) -> Vec<Transaction> {
        self.lock().transactions.clone()
    }
}

fn apply_versioned_update(inner: &mut StoreInner, account: &Account) -> RepositoryResult<Account> {
    let stored = inner
        .accounts
        .iter_mut()
        .find(|candidate| candidate.id == account.id)
        .ok_or_else(|| {
            RepositoryError::Storage(format!("account {} not stored", account.account_number))
        })?;

    if stored.version != account.version {
        return Err(RepositoryError::Conflict {
            entity: "account",
            key: account.account_number.clone(),
        });
    }

    *stored = account.clone();
    stored.version += 1;
    Ok(stored.clone())
}

#[derive(Clone)]
pub struct MemoryOwnerRepository {
    store: MemoryStore,
}

#[async_trait]
impl OwnerRepository for MemoryOwnerRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<AccountOwner>> {
        Ok(self
            .store
            .lock()
            .owners
            .iter()
            .find(|owner| owner.id == id)
            .cloned())
    }

    async fn insert(&self, owner: &AccountOwner) -> RepositoryResult<()> {
        self.store.lock().owners.push(owner.clone());
        Ok(())
    }
}

#[derive(Clone)]
pub struct MemoryAccountRepository {
    store: MemoryStore,
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_by_number(&self, account_number: &str) -> RepositoryResult<Option<Account>> {
        Ok(self
            .store
            .lock()
            .accounts
            .iter()
            .find(|account| account.account_number == account_number)
            .cloned())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> RepositoryResult<Vec<Account>> {
        Ok(self
            .store
            .lock()
            .accounts
            .iter()
            .filter(|account| account.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn highest_account_number(&self) -> RepositoryResult<Option<String>> {
        Ok(self
            .store
            .lock()
            .accounts
            .iter()
            .filter_map(|account| account.account_number.parse::<i64>().ok())
            .max()
            .map(|value| value.to_string()))
    }

    async fn count_by_owner(&self, owner_id: Uuid) -> RepositoryResult<i64> {
        Ok(self
            .store
            .lock()
            .accounts
            .iter()
            .filter(|account| account.owner_id == owner_id)
            .count() as i64)
    }

    async fn insert(&self, account: &Account) -> RepositoryResult<()> {
        let mut inner = self.store.lock();
        if inner
            .accounts
            .iter()
            .any(|stored| stored.account_number == account.account_number)
        {
            return Err(RepositoryError::Storage(format!(
                "duplicate account number {}",
                account.account_number
            )));
        }
        inner.accounts.push(account.clone());
        Ok(())
    }

    async fn update(&self, account: &Account) -> RepositoryResult<Account> {
        apply_versioned_update(&mut self.store.lock(), account)
    }
}

#[derive(Clone)]
pub struct MemoryTransactionRepository {
    store: MemoryStore,
}

#[async_trait]
impl TransactionRepository for MemoryTransactionRepository {
    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> RepositoryResult<Option<Transaction>> {
        Ok(self
            .store
            .lock()
            .transactions
            .iter()
            .find(|transaction| transaction.transaction_id == transaction_id)
            .cloned())
    }

    async fn insert(&self, transaction: &Transaction) -> RepositoryResult<()> {
        self.store.lock().transactions.push(transaction.clone());
        Ok(())
    }

    async fn insert_with_account(
        &self,
        transaction: &Transaction,
        account: &Account,
    ) -> RepositoryResult<Account> {
        let mut inner = self.store.lock();
        let updated = apply_versioned_update(&mut inner, account)?;
        inner.transactions.push(transaction.clone());
        Ok(updated)
    }
}
