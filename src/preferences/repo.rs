use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::StoreError;

/// A favorite city, owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Preference {
    pub id: Uuid,
    pub city: String,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Persistence for preferences. Mutations are keyed by `(id, user_id)` so a
/// write can never touch another user's row, whatever the caller checked before.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Preference>, StoreError>;
    async fn insert(&self, user_id: Uuid, city: &str) -> Result<Preference, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Preference>, StoreError>;
    async fn update_city(
        &self,
        id: Uuid,
        user_id: Uuid,
        city: &str,
    ) -> Result<Option<Preference>, StoreError>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;
}

pub struct PgPreferenceStore {
    db: PgPool,
}

impl PgPreferenceStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PreferenceStore for PgPreferenceStore {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Preference>, StoreError> {
        let rows = sqlx::query_as::<_, Preference>(
            r#"
            SELECT id, city, user_id, created_at
            FROM preferences
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn insert(&self, user_id: Uuid, city: &str) -> Result<Preference, StoreError> {
        let row = sqlx::query_as::<_, Preference>(
            r#"
            INSERT INTO preferences (id, user_id, city)
            VALUES ($1, $2, $3)
            RETURNING id, city, user_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(city)
        .fetch_one(&self.db)
        .await
        .map_err(StoreError::from_write)?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Preference>, StoreError> {
        let row = sqlx::query_as::<_, Preference>(
            r#"SELECT id, city, user_id, created_at FROM preferences WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn update_city(
        &self,
        id: Uuid,
        user_id: Uuid,
        city: &str,
    ) -> Result<Option<Preference>, StoreError> {
        let row = sqlx::query_as::<_, Preference>(
            r#"
            UPDATE preferences
               SET city = $3
             WHERE id = $1 AND user_id = $2
            RETURNING id, city, user_id, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(city)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(r#"DELETE FROM preferences WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
