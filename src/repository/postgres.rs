//! PostgreSQL document store: one JSONB `documents` table keyed by collection

use async_trait::async_trait;
use serde_json::{json, Value};
use sqlx::{FromRow, Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{Collection, Condition, DocumentStore, Filter, RawDocument, Sort, SortDirection};
use crate::error::{AppError, AppResult};

#[derive(FromRow)]
struct DocumentRow {
    id: Uuid,
    body: Value,
}

impl From<DocumentRow> for RawDocument {
    fn from(row: DocumentRow) -> Self {
        RawDocument {
            id: row.id,
            body: row.body,
        }
    }
}

/// Containment document matching `field == value`
fn field_equals(field: &str, value: &Value) -> Value {
    json!({ field: value })
}

/// Containment document matching an array `field` holding `value`
fn array_contains(field: &str, value: &Value) -> Value {
    json!({ field: [value] })
}

#[derive(Clone)]
pub struct PgDocumentStore {
    pool: Pool<Postgres>,
}

impl PgDocumentStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Append `AND <condition>` for each filter condition.
    /// Field equality and array membership use JSONB containment so the GIN index applies.
    fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
        for condition in &filter.conditions {
            builder.push(" AND ");
            match condition {
                Condition::Eq(field, value) => {
                    builder.push("body @> ");
                    builder.push_bind(field_equals(field, value));
                }
                Condition::Contains(field, value) => {
                    builder.push("body @> ");
                    builder.push_bind(array_contains(field, value));
                }
                Condition::IdIn(ids) => {
                    builder.push("id = ANY(");
                    builder.push_bind(ids.clone());
                    builder.push(")");
                }
                Condition::IdNot(id) => {
                    builder.push("id <> ");
                    builder.push_bind(*id);
                }
            }
        }
    }

    fn push_sort(builder: &mut QueryBuilder<'_, Postgres>, sort: Option<&Sort>) {
        match sort {
            Some(sort) => {
                builder.push(" ORDER BY body ->> ");
                builder.push_bind(sort.field.clone());
                builder.push(match sort.direction {
                    SortDirection::Ascending => " ASC",
                    SortDirection::Descending => " DESC",
                });
                builder.push(", created_at");
            }
            None => {
                builder.push(" ORDER BY created_at");
            }
        }
    }

    fn select(collection: Collection, filter: &Filter) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT id, body FROM documents WHERE collection = ");
        builder.push_bind(collection.as_str());
        Self::push_filter(&mut builder, filter);
        builder
    }

    fn count_query(collection: Collection, filter: &Filter) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM documents WHERE collection = ");
        builder.push_bind(collection.as_str());
        Self::push_filter(&mut builder, filter);
        builder
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        sort: Option<Sort>,
    ) -> AppResult<Vec<RawDocument>> {
        let mut builder = Self::select(collection, filter);
        Self::push_sort(&mut builder, sort.as_ref());

        let rows = builder
            .build_query_as::<DocumentRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(RawDocument::from).collect())
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> AppResult<Option<RawDocument>> {
        let mut builder = Self::select(collection, filter);
        builder.push(" ORDER BY created_at LIMIT 1");

        let row = builder
            .build_query_as::<DocumentRow>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(RawDocument::from))
    }

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> AppResult<Option<RawDocument>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RawDocument::from))
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> AppResult<i64> {
        let mut builder = Self::count_query(collection, filter);
        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn save(&self, collection: Collection, body: Value) -> AppResult<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO documents (id, collection, body) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(collection.as_str())
            .bind(body)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    async fn update(&self, collection: Collection, id: Uuid, body: Value) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE documents SET body = $1, updated_at = now() WHERE collection = $2 AND id = $3",
        )
        .bind(body)
        .bind(collection.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Document {} not found in {}", id, collection)));
        }
        Ok(())
    }

    async fn remove(&self, collection: Collection, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Document {} not found in {}", id, collection)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_sql(filter: &Filter, sort: Option<&Sort>) -> String {
        let mut builder = PgDocumentStore::select(Collection::Books, filter);
        PgDocumentStore::push_sort(&mut builder, sort);
        builder.sql().to_string()
    }

    const SELECT: &str = "SELECT id, body FROM documents WHERE collection = $1";

    #[test]
    fn unfiltered_find_keeps_insertion_order() {
        assert_eq!(find_sql(&Filter::all(), None), format!("{} ORDER BY created_at", SELECT));
    }

    #[test]
    fn conditions_are_anded_in_order() {
        let id = Uuid::new_v4();
        let filter = Filter::all()
            .eq("author", id.to_string())
            .contains("genre", id.to_string())
            .id_in(vec![id])
            .id_not(id);
        assert_eq!(
            find_sql(&filter, None),
            format!(
                "{} AND body @> $2 AND body @> $3 AND id = ANY($4) AND id <> $5 ORDER BY created_at",
                SELECT
            )
        );
    }

    #[test]
    fn sort_orders_by_field_text_then_insertion() {
        assert_eq!(
            find_sql(&Filter::all(), Some(&Sort::ascending("family_name"))),
            format!("{} ORDER BY body ->> $2 ASC, created_at", SELECT)
        );
        assert_eq!(
            find_sql(&Filter::all().eq("name", "Drama"), Some(&Sort::descending("name"))),
            format!("{} AND body @> $2 ORDER BY body ->> $3 DESC, created_at", SELECT)
        );
    }

    #[test]
    fn count_uses_the_same_filter() {
        let filter = Filter::all().eq("status", "Available");
        let builder = PgDocumentStore::count_query(Collection::BookInstances, &filter);
        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) FROM documents WHERE collection = $1 AND body @> $2"
        );
    }

    #[test]
    fn containment_documents() {
        let value = json!("Available");
        assert_eq!(field_equals("status", &value), json!({ "status": "Available" }));
        assert_eq!(array_contains("genre", &value), json!({ "genre": ["Available"] }));
    }
}
