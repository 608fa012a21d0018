//! Repository layer: the document store abstraction and typed catalog queries

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod memory;
pub mod postgres;
pub mod query;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Document, Entity},
};

pub use query::{Condition, Filter, Sort, SortDirection};

/// Document collections held by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Authors,
    Genres,
    Books,
    BookInstances,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Authors => "authors",
            Collection::Genres => "genres",
            Collection::Books => "books",
            Collection::BookInstances => "bookinstances",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored document before it is decoded into a model
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    pub id: Uuid,
    pub body: Value,
}

/// Minimal document store contract used by every catalog service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents of `collection` matching `filter`, in `sort` order (insertion order otherwise)
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        sort: Option<Sort>,
    ) -> AppResult<Vec<RawDocument>>;

    async fn find_one(&self, collection: Collection, filter: &Filter) -> AppResult<Option<RawDocument>>;

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> AppResult<Option<RawDocument>>;

    async fn count(&self, collection: Collection, filter: &Filter) -> AppResult<i64>;

    /// Insert a new document; the store assigns the id
    async fn save(&self, collection: Collection, body: Value) -> AppResult<Uuid>;

    /// Replace the body of an existing document. Fails with `NotFound` if absent.
    async fn update(&self, collection: Collection, id: Uuid, body: Value) -> AppResult<()>;

    /// Delete a document. Fails with `NotFound` if absent.
    async fn remove(&self, collection: Collection, id: Uuid) -> AppResult<()>;
}

/// Typed access to the document store, shared by all services
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn DocumentStore>,
}

impl Repository {
    /// Create a new repository over the given store
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn decode<T: Entity>(raw: RawDocument) -> AppResult<Document<T>> {
        let data = serde_json::from_value::<T>(raw.body)?;
        Ok(Document::new(raw.id, data))
    }

    pub(crate) async fn find<T: Entity>(&self, filter: Filter, sort: Option<Sort>) -> AppResult<Vec<Document<T>>> {
        self.store
            .find(T::COLLECTION, &filter, sort)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    pub(crate) async fn find_one<T: Entity>(&self, filter: Filter) -> AppResult<Option<Document<T>>> {
        self.store
            .find_one(T::COLLECTION, &filter)
            .await?
            .map(Self::decode)
            .transpose()
    }

    pub(crate) async fn find_by_id<T: Entity>(&self, id: Uuid) -> AppResult<Option<Document<T>>> {
        self.store
            .find_by_id(T::COLLECTION, id)
            .await?
            .map(Self::decode)
            .transpose()
    }

    /// Like [`Repository::find_by_id`] but a missing document is a `NotFound` error
    pub(crate) async fn get<T: Entity>(&self, id: Uuid) -> AppResult<Document<T>> {
        self.find_by_id::<T>(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", T::NAME, id)))
    }

    pub(crate) async fn count<T: Entity>(&self, filter: Filter) -> AppResult<i64> {
        self.store.count(T::COLLECTION, &filter).await
    }

    pub(crate) async fn save<T: Entity>(&self, data: T) -> AppResult<Document<T>> {
        let body = serde_json::to_value(&data)?;
        let id = self.store.save(T::COLLECTION, body).await?;
        tracing::debug!(collection = %T::COLLECTION, %id, "Document saved");
        Ok(Document::new(id, data))
    }

    pub(crate) async fn update<T: Entity>(&self, id: Uuid, data: T) -> AppResult<Document<T>> {
        let body = serde_json::to_value(&data)?;
        self.store.update(T::COLLECTION, id, body).await?;
        tracing::debug!(collection = %T::COLLECTION, %id, "Document updated");
        Ok(Document::new(id, data))
    }

    pub(crate) async fn remove<T: Entity>(&self, id: Uuid) -> AppResult<()> {
        self.store.remove(T::COLLECTION, id).await?;
        tracing::debug!(collection = %T::COLLECTION, %id, "Document removed");
        Ok(())
    }

    /// Resolve a set of references in one lookup. Dangling ids are dropped;
    /// the result follows the order of `ids`.
    pub(crate) async fn populate<T: Entity>(&self, ids: &[Uuid]) -> AppResult<Vec<Document<T>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut found = self.find::<T>(Filter::all().id_in(ids.to_vec()), None).await?;
        found.sort_by_key(|doc| ids.iter().position(|id| *id == doc.id));
        Ok(found)
    }

    /// Resolve a single reference; a dangling id yields `None`
    pub(crate) async fn populate_one<T: Entity>(&self, id: Uuid) -> AppResult<Option<Document<T>>> {
        self.find_by_id::<T>(id).await
    }
}
