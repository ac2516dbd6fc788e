//! Lending state machine for books.
//!
//! A book is either on the shelf (`is_issued == false`) or out with a holder.
//! Every transition is one conditional update against the store, so a failed
//! transition never leaves a record half-changed.

use std::sync::Arc;

use libris_store::{RecordId, RecordStore};

use crate::catalog::Catalog;
use crate::error::DomainError;

use super::models::{Book, BookDoc, CreateBook, IssueReceipt, ReturnReceipt};

pub struct BookService {
    catalog: Catalog<BookDoc>,
}

impl BookService {
    pub fn new(store: Arc<dyn RecordStore<BookDoc>>) -> Self {
        Self {
            catalog: Catalog::new(store, "book"),
        }
    }

    /// Add a book; new records start on the shelf.
    pub async fn add(&self, req: CreateBook) -> Result<RecordId, DomainError> {
        let id = self
            .catalog
            .add(BookDoc::new(req.title, req.author, req.genre))
            .await?;
        tracing::info!(book_id = %id, "book added");
        Ok(id)
    }

    pub async fn get(&self, raw_id: &str) -> Result<Book, DomainError> {
        let (id, doc) = self.catalog.get(raw_id).await?;
        Ok(Book::from_record(&id, doc))
    }

    pub async fn list(&self) -> Result<Vec<Book>, DomainError> {
        let records = self.catalog.list().await?;
        Ok(records
            .into_iter()
            .map(|(id, doc)| Book::from_record(&id, doc))
            .collect())
    }

    /// Hand a book to `holder`.
    ///
    /// The up-front read gives precise failures (missing vs. already issued);
    /// the conditional update is what actually guards the transition. When a
    /// concurrent issue wins between the read and the update, the update
    /// matches nothing and the loser reports a conflict instead of silently
    /// double-issuing.
    pub async fn issue(&self, raw_id: &str, holder: &str) -> Result<IssueReceipt, DomainError> {
        let (id, doc) = self.catalog.get(raw_id).await?;
        if doc.is_issued {
            return Err(DomainError::InvalidState("book is already issued"));
        }

        let assignee = holder.to_string();
        let modified = self
            .catalog
            .store()
            .update_by_id(
                &id,
                Box::new(|book: &BookDoc| !book.is_issued),
                Box::new(move |book: &mut BookDoc| {
                    book.is_issued = true;
                    book.issued_to = Some(assignee);
                }),
            )
            .await?;

        if modified == 0 {
            return Err(DomainError::UpdateConflict);
        }

        tracing::info!(book_id = %id, holder, "book issued");
        Ok(IssueReceipt {
            book_id: id.to_string(),
            issued_to: holder.to_string(),
        })
    }

    /// Put a book back on the shelf.
    ///
    /// Accepted even when the book is already available — a return is a
    /// statement of where the book is, not of where it was.
    pub async fn return_book(&self, raw_id: &str) -> Result<ReturnReceipt, DomainError> {
        let (id, _) = self.catalog.get(raw_id).await?;

        let modified = self
            .catalog
            .store()
            .update_by_id(
                &id,
                Box::new(|_: &BookDoc| true),
                Box::new(|book: &mut BookDoc| {
                    book.is_issued = false;
                    book.issued_to = None;
                }),
            )
            .await?;

        if modified == 0 {
            return Err(DomainError::UpdateConflict);
        }

        tracing::info!(book_id = %id, "book returned");
        Ok(ReturnReceipt {
            book_id: id.to_string(),
        })
    }

    pub async fn remove(&self, raw_id: &str) -> Result<RecordId, DomainError> {
        let id = self.catalog.remove(raw_id).await?;
        tracing::info!(book_id = %id, "book removed");
        Ok(id)
    }
}
