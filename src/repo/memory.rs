use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{new_record, revise, RepoError, Repository, StoreHealth};
use crate::content::Entity;

type Collection = HashMap<Uuid, Value>;

/// In-process document store. Each collection maps ids to JSON documents,
/// the same shape the document backend writes to Postgres.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<&'static str, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn decode<T: Entity>(doc: &Value) -> Result<T, RepoError> {
    Ok(serde_json::from_value(doc.clone())?)
}

/// Reject a slug already used by a different record of the same collection.
fn ensure_slug_free<T: Entity>(docs: &Collection, record: &T) -> Result<(), RepoError> {
    let Some(slug) = record.slug() else {
        return Ok(());
    };
    for (id, doc) in docs {
        if *id == record.id() {
            continue;
        }
        if decode::<T>(doc)?.slug() == Some(slug) {
            return Err(RepoError::Conflict(slug.to_string()));
        }
    }
    Ok(())
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryStore {
    async fn get_all(&self) -> Result<Vec<T>, RepoError> {
        let collections = self.collections.read().await;
        let mut records = match collections.get(T::COLLECTION) {
            Some(docs) => docs.values().map(decode).collect::<Result<Vec<T>, _>>()?,
            None => Vec::new(),
        };
        records.sort_by_key(|r| r.created_at());
        Ok(records)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let collections = self.collections.read().await;
        collections
            .get(T::COLLECTION)
            .and_then(|docs| docs.get(&id))
            .map(decode)
            .transpose()
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<T>, RepoError> {
        let records = <Self as Repository<T>>::get_all(self).await?;
        Ok(records.into_iter().find(|r| r.slug() == Some(slug)))
    }

    async fn create(&self, draft: T::Draft) -> Result<T, RepoError> {
        let record: T = new_record(draft)?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(T::COLLECTION).or_default();
        ensure_slug_free(docs, &record)?;
        docs.insert(record.id(), serde_json::to_value(&record)?);
        Ok(record)
    }

    async fn update(&self, id: Uuid, draft: T::Draft) -> Result<T, RepoError> {
        let mut collections = self.collections.write().await;
        let docs = collections
            .get_mut(T::COLLECTION)
            .ok_or(RepoError::NotFound)?;
        let mut record: T = docs.get(&id).map(decode).transpose()?.ok_or(RepoError::NotFound)?;
        revise(&mut record, draft)?;
        ensure_slug_free(docs, &record)?;
        docs.insert(id, serde_json::to_value(&record)?);
        Ok(record)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut collections = self.collections.write().await;
        collections
            .get_mut(T::COLLECTION)
            .and_then(|docs| docs.remove(&id))
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<Duration, RepoError> {
        Ok(Duration::ZERO)
    }
}
