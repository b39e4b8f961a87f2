use super::{
    email::normalize_email,
    error::IdentityResolutionError,
    store::{IdentityStore, UserId},
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Turns a verified email into the durable id of its user.
///
/// Holds nothing but the store handle; all mutual exclusion is the store's.
#[derive(Debug, Clone)]
pub struct IdentityBinder {
    store: Arc<dyn IdentityStore>,
}

impl IdentityBinder {
    #[must_use]
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn IdentityStore> {
        &self.store
    }

    /// Resolve `email` to a user id, creating the user on first sight.
    ///
    /// # Errors
    /// `InvalidEmail` if the email is blank, `Persistence` if the store fails.
    #[instrument(skip(self), fields(backend = self.store.backend()))]
    pub async fn resolve_user(&self, email: &str) -> Result<UserId, IdentityResolutionError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(IdentityResolutionError::InvalidEmail);
        }

        let id = self.store.upsert_by_email(&email).await?;

        info!(user_id = %id, email = %email, "Found or created user");

        Ok(id)
    }
}
