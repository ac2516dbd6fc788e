pub mod models;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use libris_http::error::AppError;
use libris_kernel::{InitCtx, Module};
use libris_store::RecordStore;

use models::{Book, BookCreated, BookDeleted, BookDoc, CreateBook, IssueReceipt, IssueRequest, ReturnReceipt};
use service::BookService;

/// Physical books: CRUD plus the issue/return lending flow.
pub struct BooksModule {
    service: Arc<BookService>,
}

impl BooksModule {
    pub fn new(store: Arc<dyn RecordStore<BookDoc>>) -> Self {
        Self {
            service: Arc::new(BookService::new(store)),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_books).post(add_book))
            .route("/{id}", get(get_book).delete(delete_book))
            .route("/{id}/issue", post(issue_book))
            .route("/{id}/return", post(return_book))
            .with_state(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Up to 100 books in store order",
                                "content": { "application/json": { "schema": {
                                    "type": "array",
                                    "items": { "$ref": "#/components/schemas/Book" }
                                } } }
                            }
                        }
                    },
                    "post": {
                        "summary": "Add a book",
                        "tags": ["Books"],
                        "requestBody": { "content": { "application/json": { "schema": {
                            "$ref": "#/components/schemas/CreateBook"
                        } } } },
                        "responses": {
                            "201": { "description": "Book created" },
                            "422": { "description": "Payload failed validation", "content": {
                                "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } }
                            } }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Fetch a book",
                        "tags": ["Books"],
                        "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }],
                        "responses": {
                            "200": { "description": "The book", "content": { "application/json": {
                                "schema": { "$ref": "#/components/schemas/Book" }
                            } } },
                            "400": { "description": "Malformed identifier" },
                            "404": { "description": "No such book" }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }],
                        "responses": {
                            "200": { "description": "Book deleted" },
                            "404": { "description": "No such book" }
                        }
                    }
                },
                "/{id}/issue": {
                    "post": {
                        "summary": "Issue a book to a holder",
                        "tags": ["Books"],
                        "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }],
                        "requestBody": { "content": { "application/json": { "schema": {
                            "$ref": "#/components/schemas/IssueRequest"
                        } } } },
                        "responses": {
                            "200": { "description": "Issued" },
                            "400": { "description": "Malformed id or already issued" },
                            "404": { "description": "No such book" }
                        }
                    }
                },
                "/{id}/return": {
                    "post": {
                        "summary": "Return a book to the shelf",
                        "tags": ["Books"],
                        "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }],
                        "responses": {
                            "200": { "description": "Returned" },
                            "404": { "description": "No such book" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "genre": { "type": "string" },
                            "is_issued": { "type": "boolean" },
                            "issued_to": { "type": "string", "nullable": true }
                        },
                        "required": ["id", "title", "author", "genre", "is_issued"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "genre": { "type": "string" }
                        },
                        "required": ["title", "author", "genre"]
                    },
                    "IssueRequest": {
                        "type": "object",
                        "properties": { "issued_to": { "type": "string" } },
                        "required": ["issued_to"]
                    }
                }
            }
        }))
    }
}

async fn add_book(
    State(service): State<Arc<BookService>>,
    Json(req): Json<CreateBook>,
) -> Result<(StatusCode, Json<BookCreated>), AppError> {
    if let Err(details) = req.validate() {
        return Err(AppError::validation(details, "book payload failed validation"));
    }
    let id = service.add(req).await?;
    Ok((StatusCode::CREATED, Json(BookCreated { id: id.to_string() })))
}

async fn get_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<String>,
) -> Result<Json<Book>, AppError> {
    Ok(Json(service.get(&id).await?))
}

async fn list_books(
    State(service): State<Arc<BookService>>,
) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(service.list().await?))
}

async fn issue_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<String>,
    Json(req): Json<IssueRequest>,
) -> Result<Json<IssueReceipt>, AppError> {
    if req.issued_to.trim().is_empty() {
        return Err(AppError::validation(
            vec![json!({"field": "issued_to", "error": "must not be empty"})],
            "issue payload failed validation",
        ));
    }
    Ok(Json(service.issue(&id, &req.issued_to).await?))
}

async fn return_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<String>,
) -> Result<Json<ReturnReceipt>, AppError> {
    Ok(Json(service.return_book(&id).await?))
}

async fn delete_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<String>,
) -> Result<Json<BookDeleted>, AppError> {
    let id = service.remove(&id).await?;
    Ok(Json(BookDeleted {
        book_id: id.to_string(),
    }))
}

/// Build the books module over its injected store.
pub fn create_module(store: Arc<dyn RecordStore<BookDoc>>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use libris_store::MemoryStore;

    use super::*;

    fn routes() -> Router {
        BooksModule::new(Arc::new(MemoryStore::new())).routes()
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn add_issue_and_double_issue_over_http() {
        let app = routes();

        let created = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/",
                serde_json::json!({"title": "Dune", "author": "Herbert", "genre": "SciFi"}),
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let id = body_json(created).await["id"].as_str().unwrap().to_string();

        let issued = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/{id}/issue"),
                serde_json::json!({"issued_to": "bob"}),
            ))
            .await
            .unwrap();
        assert_eq!(issued.status(), StatusCode::OK);

        let again = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/{id}/issue"),
                serde_json::json!({"issued_to": "carol"}),
            ))
            .await
            .unwrap();
        assert_eq!(again.status(), StatusCode::BAD_REQUEST);

        let fetched = app
            .oneshot(
                Request::builder()
                    .uri(format!("/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let book = body_json(fetched).await;
        assert_eq!(book["is_issued"], true);
        assert_eq!(book["issued_to"], "bob");
    }

    #[tokio::test]
    async fn malformed_id_is_a_bad_request() {
        let app = routes();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/definitely-not-an-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn blank_payload_fields_fail_validation() {
        let app = routes();
        let response = app
            .oneshot(json_request(
                "POST",
                "/",
                serde_json::json!({"title": "", "author": "Herbert", "genre": "SciFi"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "validation_error");
        assert_eq!(body["error"]["details"][0]["field"], "title");
    }
}
