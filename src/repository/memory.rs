//! In-memory document store, used by tests and the `memory` store backend

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Collection, DocumentStore, Filter, RawDocument, Sort, SortDirection};
use crate::error::{AppError, AppResult};

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, IndexMap<Uuid, Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Order two optional field values: strings and numbers by value, missing fields last
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .unwrap_or_default()
            .total_cmp(&b.as_f64().unwrap_or_default()),
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => type_rank(a).cmp(&type_rank(b)),
        (None, None) => Ordering::Equal,
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        sort: Option<Sort>,
    ) -> AppResult<Vec<RawDocument>> {
        let collections = self.collections.read().await;
        let mut found: Vec<RawDocument> = collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(id, body)| filter.matches(**id, body))
                    .map(|(id, body)| RawDocument {
                        id: *id,
                        body: body.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        if let Some(sort) = sort {
            found.sort_by(|a, b| {
                let ordering = compare_fields(a.body.get(&sort.field), b.body.get(&sort.field));
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        Ok(found)
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> AppResult<Option<RawDocument>> {
        let collections = self.collections.read().await;
        Ok(collections.get(&collection).and_then(|docs| {
            docs.iter()
                .find(|(id, body)| filter.matches(**id, body))
                .map(|(id, body)| RawDocument {
                    id: *id,
                    body: body.clone(),
                })
        }))
    }

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> AppResult<Option<RawDocument>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.get(&id))
            .map(|body| RawDocument {
                id,
                body: body.clone(),
            }))
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> AppResult<i64> {
        let collections = self.collections.read().await;
        let count = collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|(id, body)| filter.matches(**id, body)).count())
            .unwrap_or(0);
        Ok(count as i64)
    }

    async fn save(&self, collection: Collection, body: Value) -> AppResult<Uuid> {
        let id = Uuid::new_v4();
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .insert(id, body);
        Ok(id)
    }

    async fn update(&self, collection: Collection, id: Uuid, body: Value) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        match collections.get_mut(&collection).and_then(|docs| docs.get_mut(&id)) {
            Some(existing) => {
                *existing = body;
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Document {} not found in {}", id, collection))),
        }
    }

    async fn remove(&self, collection: Collection, id: Uuid) -> AppResult<()> {
        let mut collections = self.collections.write().await;
        collections
            .get_mut(&collection)
            .and_then(|docs| docs.shift_remove(&id))
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Document {} not found in {}", id, collection)))
    }
}
