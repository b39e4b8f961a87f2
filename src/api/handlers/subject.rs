use crate::{
    cli::globals::GlobalArgs,
    identity::{
        email::{normalize_email, valid_email},
        issuer::{IssuerAdapter, Subject, VerifiedClaim},
        IdentityResolutionError,
    },
};
use axum::{
    extract::Extension,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{debug, error, instrument};

#[utoipa::path(
    post,
    path= "/subject",
    request_body = VerifiedClaim,
    responses (
        (status = 200, description = "Subject for the verified email", body = Subject, content_type = "application/json"),
        (status = 400, description = "Missing payload or invalid email"),
        (status = 401, description = "Missing or wrong issuer bearer token"),
        (status = 503, description = "User could not be resolved; no subject issued"),
    ),
    tag= "issuer"
)]
// issuer success hook
#[instrument(skip_all)]
pub async fn subject(
    headers: HeaderMap,
    globals: Extension<GlobalArgs>,
    adapter: Extension<Arc<IssuerAdapter>>,
    payload: Option<Json<VerifiedClaim>>,
) -> Response {
    if !authorized(&headers, globals.issuer_secret.as_ref()) {
        return (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()).into_response();
    }

    let claim: VerifiedClaim = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    debug!("claim: {:?}", claim);

    if !valid_email(&normalize_email(&claim.email)) {
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string()).into_response();
    }

    match adapter.success(&claim).await {
        Ok(subject) => (StatusCode::OK, Json(subject)).into_response(),
        Err(IdentityResolutionError::InvalidEmail) => {
            (StatusCode::BAD_REQUEST, "Invalid email".to_string()).into_response()
        }
        Err(IdentityResolutionError::Persistence(err)) => {
            error!("Error resolving user: {:?}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Unable to process user".to_string(),
            )
                .into_response()
        }
    }
}

/// Without a configured secret every caller is accepted.
fn authorized(headers: &HeaderMap, secret: Option<&SecretString>) -> bool {
    let Some(secret) = secret else {
        return true;
    };

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| {
            bool::from(token.as_bytes().ct_eq(secret.expose_secret().as_bytes()))
        })
}
