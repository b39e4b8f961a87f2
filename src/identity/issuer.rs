//! Issuer-facing seam: the success hook an external issuer calls once it has
//! authenticated an email.

use super::{binder::IdentityBinder, error::IdentityResolutionError, store::UserId};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};
use utoipa::ToSchema;

/// Identity assertion handed over by the issuer after a successful login.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
pub struct VerifiedClaim {
    pub email: String,
    /// Provider that authenticated the email, e.g. `password`.
    #[serde(default)]
    pub provider: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserProperties {
    pub id: UserId,
}

/// Subject embedded by the issuer into the tokens it mints.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "properties", rename_all = "lowercase")]
pub enum Subject {
    User(UserProperties),
}

impl Subject {
    #[must_use]
    pub const fn user(id: UserId) -> Self {
        Self::User(UserProperties { id })
    }
}

#[derive(Debug, Clone)]
pub struct IssuerAdapter {
    binder: IdentityBinder,
}

impl IssuerAdapter {
    #[must_use]
    pub fn new(binder: IdentityBinder) -> Self {
        Self { binder }
    }

    #[must_use]
    pub const fn binder(&self) -> &IdentityBinder {
        &self.binder
    }

    /// Build the subject for a verified claim.
    ///
    /// # Errors
    /// Propagates the resolution error; the caller must abort the issuance.
    #[instrument(skip(self, claim), fields(provider = claim.provider.as_deref().unwrap_or("unknown")))]
    pub async fn success(&self, claim: &VerifiedClaim) -> Result<Subject, IdentityResolutionError> {
        match self.binder.resolve_user(&claim.email).await {
            Ok(id) => Ok(Subject::user(id)),
            Err(err) => {
                warn!("Refusing to issue subject: {}", err);
                Err(err)
            }
        }
    }
}
