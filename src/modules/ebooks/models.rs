use serde::{Deserialize, Serialize};

use libris_store::RecordId;

/// Stored e-book document. No lending fields; an e-book has no copy to hand
/// out.
#[derive(Debug, Clone)]
pub struct EbookDoc {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub link: String,
}

/// E-book as callers see it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ebook {
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub link: String,
}

impl Ebook {
    pub fn from_record(id: &RecordId, doc: EbookDoc) -> Self {
        Self {
            id: id.to_string(),
            title: doc.title,
            author: doc.author,
            genre: doc.genre,
            link: doc.link,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEbook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub link: String,
}

impl CreateEbook {
    pub fn validate(&self) -> Result<(), Vec<serde_json::Value>> {
        let mut details = Vec::new();
        for (field, value) in [
            ("title", &self.title),
            ("author", &self.author),
            ("genre", &self.genre),
            ("link", &self.link),
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EbookCreated {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EbookDeleted {
    pub ebook_id: String,
}
