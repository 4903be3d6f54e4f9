//! Framework-agnostic domain entities.

pub mod account;
pub mod owner;
pub mod transaction;

pub use account::{Account, AccountStatus, ACCOUNT_NUMBER_SEED, MAX_ACCOUNTS_PER_OWNER};
pub use owner::AccountOwner;
pub use transaction::{Transaction, TransactionResult, TransactionType};
