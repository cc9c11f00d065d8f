use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use models::user::{NewUser, User, UserPatch};

use crate::errors::ServiceError;

/// Repository abstraction for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user under a freshly assigned id, stamped with the current time.
    async fn create(&self, input: NewUser) -> Result<User, ServiceError>;
    /// `Ok(None)` means "no such user"; it is not an error.
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, ServiceError>;
    /// First user with this email in insertion order.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError>;
    /// Owned copy of every user in insertion order.
    async fn find_all(&self) -> Result<Vec<User>, ServiceError>;
    async fn update(&self, id: &str, patch: UserPatch) -> Result<User, ServiceError>;
    async fn delete(&self, id: &str) -> Result<(), ServiceError>;
}

/// Serializable copy of an [`InMemoryUserRepository`]'s state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub next_id: u64,
    pub users: Vec<User>,
}

#[derive(Debug)]
struct StoreState {
    // ids only ever grow, so key order is insertion order
    users: BTreeMap<u64, User>,
    next_id: u64,
}

/// In-memory user store.
///
/// Ids are decimal strings drawn from a counter that is never rewound, so an
/// id is not reused even after its user is deleted. Every operation holds the
/// lock for its whole read-modify-write. Email uniqueness is *not* enforced
/// here; that is [`crate::user_service::UserService`]'s job.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    state: RwLock<StoreState>,
    latency: Duration,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self { Self::new() }
}

impl InMemoryUserRepository {
    pub fn new() -> Self { Self::starting_at(1) }

    /// Empty store whose first assigned id is `first_id`.
    pub fn starting_at(first_id: u64) -> Self {
        Self {
            state: RwLock::new(StoreState { users: BTreeMap::new(), next_id: first_id.max(1) }),
            latency: Duration::ZERO,
        }
    }

    /// Sleep this long before every operation, to mimic a remote store.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Rebuild a store from a snapshot.
    ///
    /// The counter is moved past the highest stored id if the snapshot's
    /// `next_id` lags behind it.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self, ServiceError> {
        let mut users = BTreeMap::new();
        for user in snapshot.users {
            let key = parse_key(&user.id)
                .ok_or_else(|| ServiceError::Storage(format!("snapshot holds non-numeric id `{}`", user.id)))?;
            if users.insert(key, user).is_some() {
                return Err(ServiceError::Storage(format!("snapshot holds id {} twice", key)));
            }
        }
        let after_last = match users.keys().next_back() {
            Some(max) => max
                .checked_add(1)
                .ok_or_else(|| ServiceError::Storage("identifier space exhausted".into()))?,
            None => 1,
        };
        let next_id = snapshot.next_id.max(after_last);
        Ok(Self { state: RwLock::new(StoreState { users, next_id }), latency: Duration::ZERO })
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.read().await;
        StoreSnapshot { next_id: state.next_id, users: state.users.values().cloned().collect() }
    }

    pub async fn len(&self) -> usize { self.state.read().await.users.len() }

    pub async fn is_empty(&self) -> bool { self.len().await == 0 }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

/// Only canonical decimal ids address a user: `"01"` is not `"1"`.
fn parse_key(id: &str) -> Option<u64> {
    let key: u64 = id.parse().ok()?;
    (key.to_string() == id).then_some(key)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: NewUser) -> Result<User, ServiceError> {
        self.pause().await;
        let mut state = self.state.write().await;
        let key = state.next_id;
        state.next_id = key
            .checked_add(1)
            .ok_or_else(|| ServiceError::Storage("identifier space exhausted".into()))?;
        let user = User { id: key.to_string(), name: input.name, email: input.email, created_at: Utc::now() };
        state.users.insert(key, user.clone());
        info!(user_id = %user.id, email = %user.email, "user_created");
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, ServiceError> {
        self.pause().await;
        let state = self.state.read().await;
        let found = parse_key(id).and_then(|k| state.users.get(&k)).cloned();
        debug!(user_id = %id, hit = found.is_some(), "find_by_id");
        Ok(found)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        self.pause().await;
        let state = self.state.read().await;
        let found = state.users.values().find(|u| u.email == email).cloned();
        debug!(%email, hit = found.is_some(), scanned = state.users.len(), "find_by_email");
        Ok(found)
    }

    async fn find_all(&self) -> Result<Vec<User>, ServiceError> {
        self.pause().await;
        let state = self.state.read().await;
        Ok(state.users.values().cloned().collect())
    }

    async fn update(&self, id: &str, patch: UserPatch) -> Result<User, ServiceError> {
        self.pause().await;
        let mut state = self.state.write().await;
        let key = parse_key(id).ok_or_else(|| ServiceError::not_found("user", id))?;
        let slot = state.users.get_mut(&key).ok_or_else(|| ServiceError::not_found("user", id))?;
        if patch.is_empty() {
            debug!(user_id = %id, "empty patch; nothing to update");
            return Ok(slot.clone());
        }
        let updated = slot.merged(&patch);
        *slot = updated.clone();
        info!(user_id = %id, "user_updated");
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.pause().await;
        let mut state = self.state.write().await;
        parse_key(id)
            .and_then(|k| state.users.remove(&k))
            .ok_or_else(|| ServiceError::not_found("user", id))?;
        info!(user_id = %id, "user_deleted");
        Ok(())
    }
}
