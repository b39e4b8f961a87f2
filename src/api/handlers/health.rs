use crate::{identity::IdentityStore, GIT_COMMIT_HASH};
use axum::{
    extract::Extension,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    database: String,
}

#[utoipa::path(
    get,
    path= "/health",
    responses (
        (status = 200, description = "Identity store is reachable", body = Health),
        (status = 503, description = "Identity store is unreachable", body = Health)
    ),
    tag= "health"
)]
// axum handler for health
pub async fn health(store: Extension<Arc<dyn IdentityStore>>) -> impl IntoResponse {
    let status = match store.ping().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            error!("Failed to ping {} store: {}", store.backend(), err);

            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if status.is_success() {
            "ok".to_string()
        } else {
            "error".to_string()
        },
    };

    let short_hash = GIT_COMMIT_HASH.get(0..7).unwrap_or("");

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&format!(
        "{}:{}:{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_hash
    )) {
        headers.insert("x-app", value);
    }

    (status, headers, Json(health))
}
