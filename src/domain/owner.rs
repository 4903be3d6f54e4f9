//! Account owner domain entity.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// The end-user entity holding one or more accounts. Owners are
/// provisioned out-of-band and never change through this service.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountOwner {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl AccountOwner {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}
