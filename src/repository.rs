use crate::models::Cat;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// RepositoryError
///
/// Failures surfaced by the persistence layer. The in-memory implementation
/// never produces one, but the contract stays fallible so a database-backed
/// implementation fits behind the same trait object.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// CatRepository Trait
///
/// The abstract persistence contract. Handlers and the seed loader interact
/// with the data layer exclusively through this trait, so the concrete
/// backing (in-memory, Postgres, mock) is swappable without touching them.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn CatRepository>`) safely shareable across Axum's asynchronous
/// task boundaries.
#[async_trait]
pub trait CatRepository: Send + Sync {
    /// Persists one cat with the given name. The repository assigns the
    /// unique identifier; the created record is returned.
    async fn save(&self, name: &str) -> Result<Cat, RepositoryError>;

    /// Returns all cats in insertion order.
    async fn find_all(&self) -> Result<Vec<Cat>, RepositoryError>;

    /// Number of cats currently stored.
    async fn count(&self) -> Result<u64, RepositoryError>;

    /// Bulk clear. Returns the number of records removed. Used by tests to
    /// reset state between seed runs.
    async fn delete_all(&self) -> Result<u64, RepositoryError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn CatRepository>;

/// InMemoryCatRepository
///
/// The shipped `CatRepository` implementation: a `Vec` behind an async
/// `RwLock`. The lock serializes concurrent writes, which is the only
/// consistency guarantee the application relies on.
#[derive(Default)]
pub struct InMemoryCatRepository {
    cats: RwLock<Vec<Cat>>,
}

impl InMemoryCatRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatRepository for InMemoryCatRepository {
    async fn save(&self, name: &str) -> Result<Cat, RepositoryError> {
        let cat = Cat {
            id: Uuid::new_v4(),
            name: name.to_owned(),
        };
        self.cats.write().await.push(cat.clone());
        Ok(cat)
    }

    async fn find_all(&self) -> Result<Vec<Cat>, RepositoryError> {
        Ok(self.cats.read().await.clone())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.cats.read().await.len() as u64)
    }

    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let mut cats = self.cats.write().await;
        let removed = cats.len() as u64;
        cats.clear();
        Ok(removed)
    }
}
