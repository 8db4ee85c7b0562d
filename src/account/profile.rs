//! Advisor-facing profile management

use std::sync::Arc;

use crate::account::mutate_user;
use crate::error::{AuthError, AuthResult};
use crate::store::UserStore;
use crate::user::{UserId, UserProfile};

pub struct ProfileManager {
	store: Arc<dyn UserStore>,
}

impl ProfileManager {
	pub fn new(store: Arc<dyn UserStore>) -> Self {
		Self { store }
	}

	/// Create the profile; a user has at most one
	pub async fn create_profile(&self, user_id: UserId, profile: UserProfile) -> AuthResult<()> {
		mutate_user(self.store.as_ref(), user_id, |user| {
			user.create_profile(profile.clone())
		})
		.await?;
		Ok(())
	}

	/// Replace an existing profile
	pub async fn update_profile(&self, user_id: UserId, profile: UserProfile) -> AuthResult<()> {
		mutate_user(self.store.as_ref(), user_id, |user| {
			user.update_profile(profile.clone())
		})
		.await?;
		Ok(())
	}

	/// Hide the profile from listings without deleting it
	pub async fn deactivate_profile(&self, user_id: UserId) -> AuthResult<()> {
		mutate_user(self.store.as_ref(), user_id, |user| user.deactivate_profile()).await?;
		Ok(())
	}

	pub async fn get_profile(&self, user_id: UserId) -> AuthResult<UserProfile> {
		let user = self
			.store
			.find_by_id(user_id)
			.await?
			.ok_or(AuthError::UserNotFound)?;
		user.profile.ok_or(AuthError::ProfileNotFound)
	}

	/// Update display name and contact handle
	pub async fn update_basic_info(
		&self,
		user_id: UserId,
		display_name: String,
		contact_id: Option<String>,
	) -> AuthResult<()> {
		mutate_user(self.store.as_ref(), user_id, |user| {
			user.update_basic_info(display_name.clone(), contact_id.clone());
			Ok(())
		})
		.await?;
		Ok(())
	}
}
