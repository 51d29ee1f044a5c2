use async_trait::async_trait;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use super::{new_record, revise, write_error, RepoError, Repository, StoreHealth};
use crate::db::{self, models::Relational};

/// Postgres store with one table per content type.
#[derive(Debug, Clone)]
pub struct RelationalStore {
    pool: PgPool,
}

impl RelationalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn select_sql<T: Relational>(filter: &str) -> String {
    format!(
        "SELECT {} FROM {} {} ORDER BY created_at ASC",
        T::COLUMNS.join(", "),
        T::TABLE,
        filter
    )
}

fn insert_sql<T: Relational>() -> String {
    let placeholders: Vec<String> = (1..=T::COLUMNS.len()).map(|i| format!("${}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        T::TABLE,
        T::COLUMNS.join(", "),
        placeholders.join(", ")
    )
}

/// Binds in `COLUMNS` order, so `$1` is the id used by the WHERE clause.
fn update_sql<T: Relational>() -> String {
    let assignments: Vec<String> = T::COLUMNS
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, column)| format!("{} = ${}", column, i + 1))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE id = $1",
        T::TABLE,
        assignments.join(", ")
    )
}

#[async_trait]
impl<T: Relational> Repository<T> for RelationalStore {
    async fn get_all(&self) -> Result<Vec<T>, RepoError> {
        let sql = select_sql::<T>("");
        Ok(sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let sql = select_sql::<T>("WHERE id = $1");
        Ok(sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<T>, RepoError> {
        if !T::HAS_SLUG {
            return Ok(None);
        }
        let sql = select_sql::<T>("WHERE slug = $1");
        Ok(sqlx::query_as::<_, T>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create(&self, draft: T::Draft) -> Result<T, RepoError> {
        let record: T = new_record(draft)?;
        let sql = insert_sql::<T>();
        record
            .bind_columns(sqlx::query(&sql))
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

        let sql = update_sql::<T>();
        let result = record
            .bind_columns(sqlx::query(&sql))
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(&record, e))?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", T::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl StoreHealth for RelationalStore {
    fn backend(&self) -> &'static str {
        "relational"
    }

    async fn ping(&self) -> Result<Duration, RepoError> {
        Ok(db::health_check(&self.pool).await?)
    }
}
