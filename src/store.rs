//! User storage seam
//!
//! Persistence engines are collaborators behind [`UserStore`]. The store is
//! the serialization point for per-identity mutations: `save` enforces the
//! uniqueness constraints (login handle, social link) and optimistic
//! versioning, surfacing races as typed [`StoreError`]s the callers retry or
//! translate. [`InMemoryUserStore`] is the reference implementation used by
//! tests and development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::error::AuthError;
use crate::social::SocialProvider;
use crate::user::{AdvisorStatus, User, UserId};

/// Storage-layer failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
	/// Unique constraint on `handle` violated
	#[error("login handle already exists")]
	DuplicateHandle,

	/// Unique constraint on `(provider, provider_user_id)` violated
	#[error("social link already exists")]
	DuplicateSocialLink,

	/// The saved snapshot was stale; reload and retry
	#[error("stale snapshot for user {0}")]
	VersionConflict(UserId),

	/// Backend failure (connectivity, serialization, ...)
	#[error("backend error: {0}")]
	Backend(String),
}

impl From<StoreError> for AuthError {
	fn from(error: StoreError) -> Self {
		match error {
			StoreError::DuplicateHandle => AuthError::Conflict("login handle taken".into()),
			StoreError::DuplicateSocialLink => AuthError::DuplicateSocialLink,
			StoreError::VersionConflict(id) => {
				AuthError::Conflict(format!("concurrent update on user {id}"))
			}
			StoreError::Backend(msg) => AuthError::Storage(msg),
		}
	}
}

/// User storage trait
///
/// All lookups exclude soft-deleted rows. `save` inserts new users and
/// updates existing ones; it must reject a stale `version` with
/// [`StoreError::VersionConflict`] and uniqueness violations with the
/// dedicated variants so concurrent first-logins and approvals serialize.
#[async_trait]
pub trait UserStore: Send + Sync {
	async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

	async fn find_by_handle(&self, handle: &str) -> Result<Option<User>, StoreError>;

	async fn find_by_social(
		&self,
		provider: SocialProvider,
		provider_user_id: &str,
	) -> Result<Option<User>, StoreError>;

	/// Users currently in the given advisor-review state
	async fn find_by_advisor_status(
		&self,
		status: AdvisorStatus,
	) -> Result<Vec<User>, StoreError>;

	/// Persist the snapshot, returning it with the bumped version
	async fn save(&self, user: &User) -> Result<User, StoreError>;
}

/// In-memory user store for testing and development
///
/// Uniqueness checks and version bumps happen under one write lock, which is
/// the in-process equivalent of the database constraints production backends
/// provide.
///
/// # Examples
///
/// ```
/// use mentora_auth::store::{InMemoryUserStore, UserStore};
/// use mentora_auth::user::User;
///
/// tokio_test::block_on(async {
/// 	let store = InMemoryUserStore::new();
/// 	let user = User::new_local("alice", "hash", "Alice", None).unwrap();
/// 	let saved = store.save(&user).await.unwrap();
/// 	assert_eq!(saved.version, 1);
/// });
/// ```
pub struct InMemoryUserStore {
	users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserStore {
	pub fn new() -> Self {
		Self {
			users: Arc::new(RwLock::new(HashMap::new())),
		}
	}

	/// Number of stored rows, soft-deleted included (for tests)
	pub async fn len(&self) -> usize {
		self.users.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.users.read().await.is_empty()
	}
}

impl Default for InMemoryUserStore {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl UserStore for InMemoryUserStore {
	async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
		let users = self.users.read().await;
		Ok(users.get(&id).filter(|u| u.is_visible()).cloned())
	}

	async fn find_by_handle(&self, handle: &str) -> Result<Option<User>, StoreError> {
		let users = self.users.read().await;
		Ok(users
			.values()
			.find(|u| u.handle == handle && u.is_visible())
			.cloned())
	}

	async fn find_by_social(
		&self,
		provider: SocialProvider,
		provider_user_id: &str,
	) -> Result<Option<User>, StoreError> {
		let users = self.users.read().await;
		Ok(users
			.values()
			.find(|u| u.has_social_account(provider, provider_user_id) && u.is_visible())
			.cloned())
	}

	async fn find_by_advisor_status(
		&self,
		status: AdvisorStatus,
	) -> Result<Vec<User>, StoreError> {
		let users = self.users.read().await;
		Ok(users
			.values()
			.filter(|u| u.advisor_status == status && u.is_visible())
			.cloned()
			.collect())
	}

	async fn save(&self, user: &User) -> Result<User, StoreError> {
		let mut users = self.users.write().await;

		// Uniqueness constraints apply against every other row, soft-deleted
		// rows included, matching a database unique index.
		for (id, existing) in users.iter() {
			if *id == user.id {
				continue;
			}
			if existing.handle == user.handle {
				return Err(StoreError::DuplicateHandle);
			}
			if user
				.social_accounts
				.iter()
				.any(|a| existing.has_social_account(a.provider, &a.provider_user_id))
			{
				return Err(StoreError::DuplicateSocialLink);
			}
		}

		if let Some(existing) = users.get(&user.id) {
			if existing.version != user.version {
				return Err(StoreError::VersionConflict(user.id));
			}
		}

		let mut stored = user.clone();
		stored.version += 1;
		users.insert(stored.id, stored.clone());
		Ok(stored)
	}
}
