//! Genre queries on Repository

use uuid::Uuid;

use super::{Filter, Repository, Sort};
use crate::{
    error::AppResult,
    models::{Book, Document, Genre},
};

impl Repository {
    /// All genres ordered by name, descending
    pub async fn genres_list(&self) -> AppResult<Vec<Document<Genre>>> {
        self.find::<Genre>(Filter::all(), Some(Sort::descending("name")))
            .await
    }

    /// All genres in stored order, for form checkboxes
    pub async fn genres_all(&self) -> AppResult<Vec<Document<Genre>>> {
        self.find::<Genre>(Filter::all(), None).await
    }

    pub async fn genres_find(&self, id: Uuid) -> AppResult<Option<Document<Genre>>> {
        self.find_by_id::<Genre>(id).await
    }

    pub async fn genres_get(&self, id: Uuid) -> AppResult<Document<Genre>> {
        self.get::<Genre>(id).await
    }

    /// Genre with exactly this name, optionally ignoring one genre by id
    pub async fn genres_find_by_name(
        &self,
        name: &str,
        excluding: Option<Uuid>,
    ) -> AppResult<Option<Document<Genre>>> {
        let mut filter = Filter::all().eq("name", name);
        if let Some(id) = excluding {
            filter = filter.id_not(id);
        }
        self.find_one::<Genre>(filter).await
    }

    pub async fn genres_create(&self, genre: Genre) -> AppResult<Document<Genre>> {
        self.save(genre).await
    }

    pub async fn genres_update(&self, id: Uuid, genre: Genre) -> AppResult<Document<Genre>> {
        self.update(id, genre).await
    }

    pub async fn genres_delete(&self, id: Uuid) -> AppResult<()> {
        self.remove::<Genre>(id).await
    }

    pub async fn genres_count(&self) -> AppResult<i64> {
        self.count::<Genre>(Filter::all()).await
    }

    /// Books whose genre set contains the genre
    pub async fn genres_books(&self, id: Uuid) -> AppResult<Vec<Document<Book>>> {
        self.find::<Book>(Filter::all().contains("genre", id.to_string()), None)
            .await
    }
}
