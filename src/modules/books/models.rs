use serde::{Deserialize, Serialize};

use libris_store::RecordId;

/// Stored book document. `issued_to` is `Some` exactly when `is_issued` is
/// true; both fields change together, in one conditional update.
#[derive(Debug, Clone)]
pub struct BookDoc {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub is_issued: bool,
    pub issued_to: Option<String>,
}

impl BookDoc {
    /// A freshly added book is on the shelf.
    pub fn new(title: String, author: String, genre: String) -> Self {
        Self {
            title,
            author,
            genre,
            is_issued: false,
            issued_to: None,
        }
    }
}

/// Book as callers see it: the stored document plus its id in string form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub is_issued: bool,
    pub issued_to: Option<String>,
}

impl Book {
    pub fn from_record(id: &RecordId, doc: BookDoc) -> Self {
        Self {
            id: id.to_string(),
            title: doc.title,
            author: doc.author,
            genre: doc.genre,
            is_issued: doc.is_issued,
            issued_to: doc.issued_to,
        }
    }
}

/// Request payload for adding a book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub genre: String,
}

impl CreateBook {
    /// Field-level checks; an empty field is the only thing to reject.
    pub fn validate(&self) -> Result<(), Vec<serde_json::Value>> {
        let mut details = Vec::new();
        for (field, value) in [
            ("title", &self.title),
            ("author", &self.author),
            ("genre", &self.genre),
        ] {
            if value.trim().is_empty() {
                details.push(serde_json::json!({"field": field, "error": "must not be empty"}));
            }
        }
        if details.is_empty() {
            Ok(())
        } else {
            Err(details)
        }
    }
}

/// Request payload for issuing a book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueRequest {
    pub issued_to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookCreated {
    pub id: String,
}

/// Confirmation that a book left the shelf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueReceipt {
    pub book_id: String,
    pub issued_to: String,
}

/// Confirmation that a book is back on the shelf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnReceipt {
    pub book_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDeleted {
    pub book_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_book_accepts_filled_fields() {
        let req = CreateBook {
            title: "Dune".into(),
            author: "Herbert".into(),
            genre: "SciFi".into(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn create_book_rejects_blank_fields_with_one_detail_each() {
        let req = CreateBook {
            title: "".into(),
            author: "  ".into(),
            genre: "SciFi".into(),
        };
        let details = req.validate().unwrap_err();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0]["field"], "title");
        assert_eq!(details[1]["field"], "author");
    }
}
