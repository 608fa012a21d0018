//! Author queries on Repository

use uuid::Uuid;

use super::{Filter, Repository, Sort};
use crate::{
    error::AppResult,
    models::{Author, Book, Document},
};

impl Repository {
    /// All authors ordered by family name
    pub async fn authors_list(&self) -> AppResult<Vec<Document<Author>>> {
        self.find::<Author>(Filter::all(), Some(Sort::ascending("family_name")))
            .await
    }

    /// All authors in stored order, for form selects
    pub async fn authors_all(&self) -> AppResult<Vec<Document<Author>>> {
        self.find::<Author>(Filter::all(), None).await
    }

    pub async fn authors_find(&self, id: Uuid) -> AppResult<Option<Document<Author>>> {
        self.find_by_id::<Author>(id).await
    }

    pub async fn authors_create(&self, author: Author) -> AppResult<Document<Author>> {
        self.save(author).await
    }

    pub async fn authors_delete(&self, id: Uuid) -> AppResult<()> {
        self.remove::<Author>(id).await
    }

    pub async fn authors_count(&self) -> AppResult<i64> {
        self.count::<Author>(Filter::all()).await
    }

    /// Books whose `author` reference points at the author
    pub async fn authors_books(&self, id: Uuid) -> AppResult<Vec<Document<Book>>> {
        self.find::<Book>(Filter::all().eq("author", id.to_string()), None)
            .await
    }
}
