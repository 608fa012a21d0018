//! Book instance queries on Repository

use uuid::Uuid;

use super::{Filter, Repository};
use crate::{
    error::AppResult,
    models::{Book, BookInstance, Document, InstanceStatus, PopulatedBookInstance},
};

impl Repository {
    /// All copies with their book resolved
    pub async fn book_instances_list(&self) -> AppResult<Vec<PopulatedBookInstance>> {
        let instances = self.find::<BookInstance>(Filter::all(), None).await?;

        let mut book_ids: Vec<Uuid> = instances.iter().map(|i| i.data.book).collect();
        book_ids.sort();
        book_ids.dedup();
        let books = self.populate::<Book>(&book_ids).await?;

        Ok(instances
            .into_iter()
            .map(|instance| {
                let book = books.iter().find(|b| b.id == instance.data.book).cloned();
                PopulatedBookInstance::new(instance, book)
            })
            .collect())
    }

    /// Copy with its book resolved; `None` if the copy is missing
    pub async fn book_instances_find_populated(
        &self,
        id: Uuid,
    ) -> AppResult<Option<PopulatedBookInstance>> {
        let Some(instance) = self.find_by_id::<BookInstance>(id).await? else {
            return Ok(None);
        };
        let book = self.populate_one::<Book>(instance.data.book).await?;
        Ok(Some(PopulatedBookInstance::new(instance, book)))
    }

    pub async fn book_instances_create(&self, instance: BookInstance) -> AppResult<Document<BookInstance>> {
        self.save(instance).await
    }

    pub async fn book_instances_delete(&self, id: Uuid) -> AppResult<()> {
        self.remove::<BookInstance>(id).await
    }

    pub async fn book_instances_count(&self) -> AppResult<i64> {
        self.count::<BookInstance>(Filter::all()).await
    }

    pub async fn book_instances_count_by_status(&self, status: InstanceStatus) -> AppResult<i64> {
        self.count::<BookInstance>(Filter::all().eq("status", status.as_str()))
            .await
    }
}
