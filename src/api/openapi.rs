use super::handlers;
use crate::identity::{issuer::UserProperties, Subject, UserId, VerifiedClaim};
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::health::health, handlers::subject::subject),
    components(schemas(handlers::health::Health, VerifiedClaim, Subject, UserProperties, UserId)),
    tags(
        (name = "health", description = "Service and storage health"),
        (name = "issuer", description = "Success hook called by the external issuer")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
