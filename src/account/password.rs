//! Password-initialization state machine
//!
//! Social-only accounts start with an unusable random hash and
//! `password_initialized = false`. Setting a first password is a one-way
//! transition; after it, only `change_password` (which proves knowledge of
//! the current one) can replace the hash.

use std::sync::Arc;

use tracing::info;

use crate::account::mutate_user;
use crate::error::{AuthError, AuthResult};
use crate::hasher::PasswordHasher;
use crate::store::UserStore;
use crate::user::UserId;

pub struct PasswordManager {
	store: Arc<dyn UserStore>,
	hasher: Arc<dyn PasswordHasher>,
}

impl PasswordManager {
	pub fn new(store: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
		Self { store, hasher }
	}

	/// Set the first password on a social-only account.
	///
	/// Fails with [`AuthError::PasswordAlreadyInitialized`] once a password
	/// exists; there is no way back.
	pub async fn init_password(&self, user_id: UserId, raw_password: &str) -> AuthResult<()> {
		let encoded = self.hasher.hash(raw_password)?;
		let (user, _) = mutate_user(self.store.as_ref(), user_id, |user| {
			user.init_password(encoded.clone())
		})
		.await?;
		info!(handle = %user.handle, "password initialized");
		Ok(())
	}

	/// Replace the password after proving knowledge of the current one
	pub async fn change_password(
		&self,
		user_id: UserId,
		current_password: &str,
		new_password: &str,
	) -> AuthResult<()> {
		let encoded = self.hasher.hash(new_password)?;
		let hasher = self.hasher.clone();
		mutate_user(self.store.as_ref(), user_id, move |user| {
			if !user.password_initialized {
				return Err(AuthError::PasswordNotInitialized);
			}
			if !hasher.verify(current_password, &user.password_hash)? {
				return Err(AuthError::CurrentPasswordMismatch);
			}
			user.change_password(encoded.clone());
			Ok(())
		})
		.await?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::hasher::Argon2Hasher;
	use crate::store::InMemoryUserStore;
	use crate::user::{SocialAccount, User};
	use crate::social::SocialProvider;

	async fn social_user(store: &InMemoryUserStore) -> UserId {
		let hasher = Argon2Hasher::new();
		let user = User::new_social(
			"kakao_a1b2c3",
			hasher.random_unusable_hash().unwrap(),
			"Kakao User",
			SocialAccount::new(SocialProvider::Kakao, "777", None),
		)
		.unwrap();
		store.save(&user).await.unwrap().id
	}

	fn manager(store: Arc<InMemoryUserStore>) -> PasswordManager {
		PasswordManager::new(store, Arc::new(Argon2Hasher::new()))
	}

	#[tokio::test]
	async fn test_init_password_is_one_way() {
		let store = Arc::new(InMemoryUserStore::new());
		let id = social_user(&store).await;
		let manager = manager(store.clone());

		manager.init_password(id, "first-pw").await.unwrap();
		let user = store.find_by_id(id).await.unwrap().unwrap();
		assert!(user.password_initialized);

		assert_eq!(
			manager.init_password(id, "second-pw").await,
			Err(AuthError::PasswordAlreadyInitialized)
		);
	}

	#[tokio::test]
	async fn test_change_password_requires_initialization() {
		let store = Arc::new(InMemoryUserStore::new());
		let id = social_user(&store).await;
		let manager = manager(store);

		assert_eq!(
			manager.change_password(id, "whatever", "new-pw").await,
			Err(AuthError::PasswordNotInitialized)
		);
	}

	#[tokio::test]
	async fn test_change_password_verifies_current() {
		let store = Arc::new(InMemoryUserStore::new());
		let id = social_user(&store).await;
		let manager = manager(store.clone());

		manager.init_password(id, "first-pw").await.unwrap();
		assert_eq!(
			manager.change_password(id, "wrong", "new-pw").await,
			Err(AuthError::CurrentPasswordMismatch)
		);
		manager.change_password(id, "first-pw", "new-pw").await.unwrap();

		let user = store.find_by_id(id).await.unwrap().unwrap();
		let hasher = Argon2Hasher::new();
		assert!(hasher.verify("new-pw", &user.password_hash).unwrap());
	}
}
