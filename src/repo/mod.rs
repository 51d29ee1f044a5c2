/*!
 * Repository Module
 * One CRUD interface per content type, backed by a single store chosen at startup
 */
pub mod document;
pub mod memory;
pub mod relational;

pub use document::DocumentStore;
pub use memory::MemoryStore;
pub use relational::RelationalStore;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::config::BackendKind;
use crate::content::{
    BlogPost, ContactSubmission, Entity, PortfolioItem, Service, TeamMember, Testimonial,
    ValidationError,
};
use crate::db::{self, DbConfig};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("record not found")]
    NotFound,
    #[error("slug '{0}' already exists")]
    Conflict(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("document encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// The entity service for one content type.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn get_all(&self) -> Result<Vec<T>, RepoError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError>;
    /// Always `None` for content types without slugs.
    async fn get_by_slug(&self, slug: &str) -> Result<Option<T>, RepoError>;
    async fn create(&self, draft: T::Draft) -> Result<T, RepoError>;
    async fn update(&self, id: Uuid, draft: T::Draft) -> Result<T, RepoError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    fn backend(&self) -> &'static str;
    async fn ping(&self) -> Result<Duration, RepoError>;
}

/// Timestamps are kept at microsecond precision so records read back from
/// Postgres compare equal to the ones returned on write.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub(crate) fn new_record<T: Entity>(draft: T::Draft) -> Result<T, RepoError> {
    let draft = T::prepare(draft)?;
    Ok(T::create(Uuid::new_v4(), draft, now()))
}

pub(crate) fn revise<T: Entity>(record: &mut T, draft: T::Draft) -> Result<(), RepoError> {
    let draft = T::prepare(draft)?;
    record.apply(draft, now());
    Ok(())
}

/// Map a unique-index violation on write to a slug conflict.
pub(crate) fn write_error<T: Entity>(record: &T, err: sqlx::Error) -> RepoError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RepoError::Conflict(record.slug().unwrap_or_default().to_string())
        }
        _ => RepoError::Database(err),
    }
}

/// Every repository the site uses, all served by the same backend.
#[derive(Clone)]
pub struct ContentStore {
    pub team: Arc<dyn Repository<TeamMember>>,
    pub services: Arc<dyn Repository<Service>>,
    pub portfolio: Arc<dyn Repository<PortfolioItem>>,
    pub blog: Arc<dyn Repository<BlogPost>>,
    pub testimonials: Arc<dyn Repository<Testimonial>>,
    pub contacts: Arc<dyn Repository<ContactSubmission>>,
    health: Arc<dyn StoreHealth>,
}

impl ContentStore {
    pub fn from_backend<B>(backend: B) -> Self
    where
        B: Repository<TeamMember>
            + Repository<Service>
            + Repository<PortfolioItem>
            + Repository<BlogPost>
            + Repository<Testimonial>
            + Repository<ContactSubmission>
            + StoreHealth
            + 'static,
    {
        let backend = Arc::new(backend);
        Self {
            team: backend.clone(),
            services: backend.clone(),
            portfolio: backend.clone(),
            blog: backend.clone(),
            testimonials: backend.clone(),
            contacts: backend.clone(),
            health: backend,
        }
    }

    pub fn memory() -> Self {
        Self::from_backend(MemoryStore::new())
    }

    /// Open the configured backend, running its migrations first.
    pub async fn connect(kind: BackendKind, db_config: DbConfig) -> Result<Self, RepoError> {
        match kind {
            BackendKind::Memory => {
                tracing::warn!("Using in-memory content store; data is lost on restart");
                Ok(Self::memory())
            }
            BackendKind::Relational => {
                let pool = db::init_pool(db_config).await?;
                db::run_relational_migrations(&pool).await?;
                Ok(Self::from_backend(RelationalStore::new(pool)))
            }
            BackendKind::Document => {
                let pool = db::init_pool(db_config).await?;
                db::run_document_migrations(&pool).await?;
                Ok(Self::from_backend(DocumentStore::new(pool)))
            }
        }
    }

    pub fn backend(&self) -> &'static str {
        self.health.backend()
    }

    pub async fn ping(&self) -> Result<Duration, RepoError> {
        self.health.ping().await
    }

    pub fn repo<T: Stored>(&self) -> &Arc<dyn Repository<T>> {
        T::repo(self)
    }
}

/// Content types reachable through a [`ContentStore`].
pub trait Stored: Entity {
    fn repo(store: &ContentStore) -> &Arc<dyn Repository<Self>>;
}

macro_rules! stored {
    ($($ty:ty => $field:ident),* $(,)?) => {
        $(
            impl Stored for $ty {
                fn repo(store: &ContentStore) -> &Arc<dyn Repository<Self>> {
                    &store.$field
                }
            }
        )*
    };
}

stored! {
    TeamMember => team,
    Service => services,
    PortfolioItem => portfolio,
    BlogPost => blog,
    Testimonial => testimonials,
    ContactSubmission => contacts,
}
