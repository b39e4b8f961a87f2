use super::error::PersistenceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fmt,
    sync::{Mutex, PoisonError},
};
use utoipa::ToSchema;
use uuid::Uuid;

/// Opaque, stable user identifier assigned by the store on first insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct UserId(Uuid);

impl UserId {
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Candidate id for an insert. Only kept if the insert wins.
    pub(crate) fn candidate() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Durable, uniqueness-enforcing persistence of users keyed by email.
///
/// Every mutation goes through [`IdentityStore::upsert_by_email`], which must be
/// a single atomic insert-or-fetch on the backend.
#[async_trait]
pub trait IdentityStore: Send + Sync + fmt::Debug {
    /// Short backend name used in logs and spans.
    fn backend(&self) -> &'static str;

    /// Create the `users` table if it does not exist yet.
    async fn ensure_schema(&self) -> Result<(), PersistenceError>;

    /// Return the id of the user with `email`, creating the row on first sight.
    ///
    /// `email` must already be canonical and non-empty.
    async fn upsert_by_email(&self, email: &str) -> Result<UserId, PersistenceError>;

    /// Number of rows stored for `email` (0 or 1 while the invariant holds).
    async fn count_by_email(&self, email: &str) -> Result<u64, PersistenceError>;

    /// Check that the backend answers.
    async fn ping(&self) -> Result<(), PersistenceError>;
}

/// In-process store. The map lock is the store's atomic primitive.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    users: Mutex<HashMap<String, UserId>>,
}

impl MemoryIdentityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> PersistenceError {
    PersistenceError::MalformedResponse("memory store lock poisoned".to_string())
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ensure_schema(&self) -> Result<(), PersistenceError> {
        Ok(())
    }

    async fn upsert_by_email(&self, email: &str) -> Result<UserId, PersistenceError> {
        let mut users = self.users.lock().map_err(poisoned)?;
        let id = *users
            .entry(email.to_string())
            .or_insert_with(UserId::candidate);
        Ok(id)
    }

    async fn count_by_email(&self, email: &str) -> Result<u64, PersistenceError> {
        let users = self.users.lock().map_err(poisoned)?;
        Ok(u64::from(users.contains_key(email)))
    }

    async fn ping(&self) -> Result<(), PersistenceError> {
        Ok(())
    }
}
