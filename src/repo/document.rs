use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use std::time::Duration;
use uuid::Uuid;

use super::{new_record, revise, write_error, RepoError, Repository, StoreHealth};
use crate::content::Entity;
use crate::db;

/// Postgres-backed document store: every record is one JSONB document in
/// `content_documents`, keyed by collection and id.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    pool: PgPool,
}

impl DocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for DocumentStore {
    async fn get_all(&self) -> Result<Vec<T>, RepoError> {
        let docs = sqlx::query_scalar::<_, Json<T>>(
            r#"
            SELECT document
            FROM content_documents
            WHERE collection = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(T::COLLECTION)
        .fetch_all(&self.pool)
        .await?;

        Ok(docs.into_iter().map(|Json(doc)| doc).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let doc = sqlx::query_scalar::<_, Json<T>>(
            "SELECT document FROM content_documents WHERE collection = $1 AND id = $2",
        )
        .bind(T::COLLECTION)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(doc.map(|Json(doc)| doc))
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<T>, RepoError> {
        let doc = sqlx::query_scalar::<_, Json<T>>(
            "SELECT document FROM content_documents WHERE collection = $1 AND slug = $2",
        )
        .bind(T::COLLECTION)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(doc.map(|Json(doc)| doc))
    }

    async fn create(&self, draft: T::Draft) -> Result<T, RepoError> {
        let record: T = new_record(draft)?;

        sqlx::query(
            r#"
            INSERT INTO content_documents (collection, id, slug, document, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(T::COLLECTION)
        .bind(record.id())
        .bind(record.slug())
        .bind(Json(&record))
        .bind(record.created_at())
        .bind(record.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(&record, e))?;

        Ok(record)
    }

    async fn update(&self, id: Uuid, draft: T::Draft) -> Result<T, RepoError> {
        let mut record = <Self as Repository<T>>::get_by_id(self, id)
            .await?
            .ok_or(RepoError::NotFound)?;
        revise(&mut record, draft)?;

        let result = sqlx::query(
            r#"
            UPDATE content_documents
            SET slug = $3, document = $4, updated_at = $5
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(T::COLLECTION)
        .bind(id)
        .bind(record.slug())
        .bind(Json(&record))
        .bind(record.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(&record, e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM content_documents WHERE collection = $1 AND id = $2")
            .bind(T::COLLECTION)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl StoreHealth for DocumentStore {
    fn backend(&self) -> &'static str {
        "document"
    }

    async fn ping(&self) -> Result<Duration, RepoError> {
        Ok(db::health_check(&self.pool).await?)
    }
}
