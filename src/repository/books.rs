//! Book queries on Repository, including reference population

use uuid::Uuid;

use super::{Filter, Repository};
use crate::{
    error::AppResult,
    models::{Author, Book, BookInstance, BookListEntry, Document, Genre, PopulatedBook},
};

impl Repository {
    /// All books with their author resolved
    pub async fn books_list(&self) -> AppResult<Vec<BookListEntry>> {
        let books = self.find::<Book>(Filter::all(), None).await?;

        let mut author_ids: Vec<Uuid> = books.iter().map(|b| b.data.author).collect();
        author_ids.sort();
        author_ids.dedup();
        let authors = self.populate::<Author>(&author_ids).await?;

        Ok(books
            .into_iter()
            .map(|book| {
                let author = authors.iter().find(|a| a.id == book.data.author).cloned();
                BookListEntry::new(book, author)
            })
            .collect())
    }

    /// All books in stored order, for form selects
    pub async fn books_all(&self) -> AppResult<Vec<Document<Book>>> {
        self.find::<Book>(Filter::all(), None).await
    }

    pub async fn books_find(&self, id: Uuid) -> AppResult<Option<Document<Book>>> {
        self.find_by_id::<Book>(id).await
    }

    /// Book with author and genres resolved; `None` if the book is missing
    pub async fn books_find_populated(&self, id: Uuid) -> AppResult<Option<PopulatedBook>> {
        let Some(book) = self.find_by_id::<Book>(id).await? else {
            return Ok(None);
        };
        let (author, genres) = tokio::try_join!(
            self.populate_one::<Author>(book.data.author),
            self.populate::<Genre>(&book.data.genre),
        )?;
        Ok(Some(PopulatedBook::new(book, author, genres)))
    }

    pub async fn books_create(&self, book: Book) -> AppResult<Document<Book>> {
        self.save(book).await
    }

    pub async fn books_update(&self, id: Uuid, book: Book) -> AppResult<Document<Book>> {
        self.update(id, book).await
    }

    pub async fn books_delete(&self, id: Uuid) -> AppResult<()> {
        self.remove::<Book>(id).await
    }

    pub async fn books_count(&self) -> AppResult<i64> {
        self.count::<Book>(Filter::all()).await
    }

    /// Copies of the book
    pub async fn books_instances(&self, id: Uuid) -> AppResult<Vec<Document<BookInstance>>> {
        self.find::<BookInstance>(Filter::all().eq("book", id.to_string()), None)
            .await
    }
}
