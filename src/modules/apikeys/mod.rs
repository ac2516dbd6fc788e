use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;

use libris_auth::{ApiKeyService, AuthError};
use libris_http::error::AppError;
use libris_kernel::{InitCtx, Module};

/// API key issuance and checks.
pub struct ApiKeysModule {
    service: Arc<ApiKeyService>,
}

impl ApiKeysModule {
    pub fn new(service: Arc<ApiKeyService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for ApiKeysModule {
    fn name(&self) -> &'static str {
        "apikeys"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "apikeys module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", post(issue_key))
            .route("/check", post(check_key))
            .with_state(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Issue a new API key",
                        "tags": ["ApiKeys"],
                        "responses": {
                            "201": { "description": "Freshly issued key", "content": { "application/json": {
                                "schema": { "$ref": "#/components/schemas/IssuedKey" }
                            } } }
                        }
                    }
                },
                "/check": {
                    "post": {
                        "summary": "Check an API key",
                        "tags": ["ApiKeys"],
                        "requestBody": { "content": { "application/json": { "schema": {
                            "$ref": "#/components/schemas/CheckKeyRequest"
                        } } } },
                        "responses": {
                            "200": { "description": "Key accepted" },
                            "403": { "description": "Key not recognized", "content": { "application/json": {
                                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                            } } }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "IssuedKey": {
                        "type": "object",
                        "properties": { "key": { "type": "string" } },
                        "required": ["key"]
                    },
                    "CheckKeyRequest": {
                        "type": "object",
                        "properties": { "key": { "type": "string" } },
                        "required": ["key"]
                    }
                }
            }
        }))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct IssuedKey {
    key: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct CheckKeyRequest {
    key: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct KeyStatus {
    status: String,
}

fn map_auth_error(err: AuthError) -> AppError {
    match err {
        AuthError::Denied => AppError::forbidden("api key is not recognized"),
        AuthError::Store(inner) => AppError::Internal(anyhow::Error::new(inner)),
    }
}

async fn issue_key(
    State(service): State<Arc<ApiKeyService>>,
) -> Result<(StatusCode, Json<IssuedKey>), AppError> {
    let key = service.issue().await.map_err(map_auth_error)?;
    Ok((StatusCode::CREATED, Json(IssuedKey { key })))
}

async fn check_key(
    State(service): State<Arc<ApiKeyService>>,
    Json(req): Json<CheckKeyRequest>,
) -> Result<Json<KeyStatus>, AppError> {
    service.check(&req.key).await.map_err(map_auth_error)?;
    Ok(Json(KeyStatus {
        status: "ok".to_string(),
    }))
}

/// Build the apikeys module over its injected service.
pub fn create_module(service: Arc<ApiKeyService>) -> Arc<dyn Module> {
    Arc::new(ApiKeysModule::new(service))
}
