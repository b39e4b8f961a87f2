use thiserror::Error;

/// Failures raised by an identity store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage unavailable")]
    Unavailable(#[source] sqlx::Error),
    #[error("storage query failed")]
    Query(#[source] sqlx::Error),
    #[error("malformed storage response: {0}")]
    MalformedResponse(String),
}

impl From<sqlx::Error> for PersistenceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_) => Self::Unavailable(err),
            sqlx::Error::RowNotFound => Self::MalformedResponse("no row returned".to_string()),
            sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_) => Self::MalformedResponse(err.to_string()),
            _ => Self::Query(err),
        }
    }
}

/// Failures raised while binding an issuer identity to a user id.
///
/// Any of these must abort the issuance in progress.
#[derive(Debug, Error)]
pub enum IdentityResolutionError {
    #[error("email must not be empty")]
    InvalidEmail,
    #[error("unable to resolve user")]
    Persistence(#[from] PersistenceError),
}
