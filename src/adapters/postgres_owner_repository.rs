//! Postgres implementation of OwnerRepository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::AccountOwner;
use crate::ports::{OwnerRepository, RepositoryResult};

#[derive(Clone)]
pub struct PostgresOwnerRepository {
    pool: PgPool,
}

impl PostgresOwnerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OwnerRepository for PostgresOwnerRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<AccountOwner>> {
        let row = sqlx::query_as::<_, OwnerRow>(
            "SELECT id, name, created_at FROM owners WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(OwnerRow::into_domain))
    }

    async fn insert(&self, owner: &AccountOwner) -> RepositoryResult<()> {
        sqlx::query("INSERT INTO owners (id, name, created_at) VALUES ($1, $2, $3)")
            .bind(owner.id)
            .bind(&owner.name)
            .bind(owner.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct OwnerRow {
    id: Uuid,
    name: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl OwnerRow {
    fn into_domain(self) -> AccountOwner {
        AccountOwner {
            id: self.id,
            name: self.name,
            created_at: self.created_at,
        }
    }
}
