//! Credential and social-identity resolution
//!
//! [`IdentityResolver`] answers one question for both login styles: which
//! stored user does this caller prove to be? Local login verifies a password
//! against the stored hash; social login finds the user owning the
//! `(provider, provider_user_id)` link, creating one on first contact.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::hasher::PasswordHasher;
use crate::social::SocialProfile;
use crate::store::{StoreError, UserStore};
use crate::user::{SocialAccount, User};

const HANDLE_SUFFIX_LEN: usize = 6;
const HANDLE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const MAX_HANDLE_ATTEMPTS: usize = 5;

/// Resolves callers to stored users
pub struct IdentityResolver {
	store: Arc<dyn UserStore>,
	hasher: Arc<dyn PasswordHasher>,
}

impl IdentityResolver {
	pub fn new(store: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
		Self { store, hasher }
	}

	/// Verify a handle/password pair.
	///
	/// Unknown handle and wrong password both come back as
	/// [`AuthError::InvalidCredentials`]; the distinction stays in the logs so
	/// the response never confirms whether a handle exists.
	pub async fn resolve_local(&self, handle: &str, password: &str) -> AuthResult<User> {
		let user = match self.store.find_by_handle(handle).await? {
			Some(user) => user,
			None => {
				debug!(handle, "login attempt for unknown handle");
				return Err(AuthError::InvalidCredentials);
			}
		};
		if !self.hasher.verify(password, &user.password_hash)? {
			debug!(handle, "password mismatch");
			return Err(AuthError::InvalidCredentials);
		}
		Ok(user)
	}

	/// Find the user owning a social link, creating one on first contact.
	///
	/// Idempotent per `(provider, provider_user_id)`: repeated logins return
	/// the same user, and a later login does not overwrite the stored display
	/// name or email with fresher provider data. First contact mints a
	/// generated handle and an unusable random password hash; the account
	/// works only through its social link until a password is initialized.
	pub async fn resolve_or_create_social(&self, profile: &SocialProfile) -> AuthResult<User> {
		if let Some(user) = self
			.store
			.find_by_social(profile.provider, &profile.provider_user_id)
			.await?
		{
			return Ok(user);
		}

		// The account must still carry a hash so the password column is never
		// empty, but nothing can ever match it until init_password runs.
		let unusable_hash = self.hasher.hash(&Uuid::new_v4().to_string())?;
		let link = SocialAccount::new(
			profile.provider,
			&profile.provider_user_id,
			profile.email.clone(),
		);

		for _ in 0..MAX_HANDLE_ATTEMPTS {
			let handle = generate_handle(profile);
			let user = User::new_social(&handle, &unusable_hash, &profile.nickname, link.clone())?;
			match self.store.save(&user).await {
				Ok(saved) => {
					info!(handle = %saved.handle, provider = %profile.provider, "created social user");
					return Ok(saved);
				}
				Err(StoreError::DuplicateHandle) => continue,
				Err(StoreError::DuplicateSocialLink) => {
					// Lost a concurrent first-login race; the winner's row is
					// the account.
					debug!(provider = %profile.provider, "social link created concurrently");
					return self
						.store
						.find_by_social(profile.provider, &profile.provider_user_id)
						.await?
						.ok_or(AuthError::UserNotFound);
				}
				Err(err) => return Err(err.into()),
			}
		}
		Err(AuthError::Conflict("could not allocate a unique handle".into()))
	}
}

/// `provider_xxxxxx` with a random lowercase-alphanumeric suffix
fn generate_handle(profile: &SocialProfile) -> String {
	let mut rng = rand::thread_rng();
	let suffix: String = (0..HANDLE_SUFFIX_LEN)
		.map(|_| HANDLE_ALPHABET[rng.gen_range(0..HANDLE_ALPHABET.len())] as char)
		.collect();
	format!("{}_{}", profile.provider, suffix)
}
