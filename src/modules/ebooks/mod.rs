pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::json;

use libris_http::error::AppError;
use libris_kernel::{InitCtx, Module};
use libris_store::RecordStore;

use crate::catalog::Catalog;

use models::{CreateEbook, Ebook, EbookCreated, EbookDeleted, EbookDoc};

/// E-books: plain catalog CRUD, handlers straight over the shared catalog.
pub struct EbooksModule {
    catalog: Arc<Catalog<EbookDoc>>,
}

impl EbooksModule {
    pub fn new(store: Arc<dyn RecordStore<EbookDoc>>) -> Self {
        Self {
            catalog: Arc::new(Catalog::new(store, "ebook")),
        }
    }
}

#[async_trait]
impl Module for EbooksModule {
    fn name(&self) -> &'static str {
        "ebooks"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "ebooks module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_ebooks).post(add_ebook))
            .route("/{id}", get(get_ebook).delete(delete_ebook))
            .with_state(self.catalog.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List e-books",
                        "tags": ["Ebooks"],
                        "responses": {
                            "200": {
                                "description": "Up to 100 e-books in store order",
                                "content": { "application/json": { "schema": {
                                    "type": "array",
                                    "items": { "$ref": "#/components/schemas/Ebook" }
                                } } }
                            }
                        }
                    },
                    "post": {
                        "summary": "Add an e-book",
                        "tags": ["Ebooks"],
                        "requestBody": { "content": { "application/json": { "schema": {
                            "$ref": "#/components/schemas/CreateEbook"
                        } } } },
                        "responses": {
                            "201": { "description": "E-book created" },
                            "422": { "description": "Payload failed validation" }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Fetch an e-book",
                        "tags": ["Ebooks"],
                        "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }],
                        "responses": {
                            "200": { "description": "The e-book", "content": { "application/json": {
                                "schema": { "$ref": "#/components/schemas/Ebook" }
                            } } },
                            "400": { "description": "Malformed identifier" },
                            "404": { "description": "No such e-book" }
                        }
                    },
                    "delete": {
                        "summary": "Delete an e-book",
                        "tags": ["Ebooks"],
                        "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }],
                        "responses": {
                            "200": { "description": "E-book deleted" },
                            "404": { "description": "No such e-book" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Ebook": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "genre": { "type": "string" },
                            "link": { "type": "string" }
                        },
                        "required": ["id", "title", "author", "genre", "link"]
                    },
                    "CreateEbook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "genre": { "type": "string" },
                            "link": { "type": "string" }
                        },
                        "required": ["title", "author", "genre", "link"]
                    }
                }
            }
        }))
    }
}

async fn add_ebook(
    State(catalog): State<Arc<Catalog<EbookDoc>>>,
    Json(req): Json<CreateEbook>,
) -> Result<(StatusCode, Json<EbookCreated>), AppError> {
    if let Err(details) = req.validate() {
        return Err(AppError::validation(
            details,
            "ebook payload failed validation",
        ));
    }
    let id = catalog
        .add(EbookDoc {
            title: req.title,
            author: req.author,
            genre: req.genre,
            link: req.link,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(EbookCreated { id: id.to_string() }),
    ))
}

async fn get_ebook(
    State(catalog): State<Arc<Catalog<EbookDoc>>>,
    Path(id): Path<String>,
) -> Result<Json<Ebook>, AppError> {
    let (record_id, doc) = catalog.get(&id).await?;
    Ok(Json(Ebook::from_record(&record_id, doc)))
}

async fn list_ebooks(
    State(catalog): State<Arc<Catalog<EbookDoc>>>,
) -> Result<Json<Vec<Ebook>>, AppError> {
    let records = catalog.list().await?;
    Ok(Json(
        records
            .into_iter()
            .map(|(id, doc)| Ebook::from_record(&id, doc))
            .collect(),
    ))
}

async fn delete_ebook(
    State(catalog): State<Arc<Catalog<EbookDoc>>>,
    Path(id): Path<String>,
) -> Result<Json<EbookDeleted>, AppError> {
    let id = catalog.remove(&id).await?;
    Ok(Json(EbookDeleted {
        ebook_id: id.to_string(),
    }))
}

/// Build the ebooks module over its injected store.
pub fn create_module(store: Arc<dyn RecordStore<EbookDoc>>) -> Arc<dyn Module> {
    Arc::new(EbooksModule::new(store))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use libris_store::MemoryStore;

    use super::*;

    fn routes() -> Router {
        EbooksModule::new(Arc::new(MemoryStore::new())).routes()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn add_get_and_delete_round_trip() {
        let app = routes();

        let created = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "title": "Dune",
                            "author": "Herbert",
                            "genre": "SciFi",
                            "link": "https://example.com/dune.epub"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let id = body_json(created).await["id"].as_str().unwrap().to_string();

        let fetched = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(fetched.status(), StatusCode::OK);
        let ebook = body_json(fetched).await;
        assert_eq!(ebook["id"], id.as_str());
        assert_eq!(ebook["link"], "https://example.com/dune.epub");

        let deleted = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(deleted.status(), StatusCode::OK);

        let gone = app
            .oneshot(
                Request::builder()
                    .uri(format!("/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_on_an_empty_store_is_an_empty_array() {
        let app = routes();
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!([]));
    }
}
