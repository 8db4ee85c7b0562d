//! Password hashing
//!
//! Credential hashing is an external collaborator behind the
//! [`PasswordHasher`] trait; the core never sees a plaintext password after
//! hashing. The default implementation uses Argon2id.

use crate::error::{AuthError, AuthResult};

/// Password hasher trait
///
/// Implement this trait to plug in a different adaptive hash.
///
/// # Examples
///
/// ```
/// use mentora_auth::hasher::{Argon2Hasher, PasswordHasher};
///
/// let hasher = Argon2Hasher::new();
/// let hash = hasher.hash("my_secure_password").unwrap();
///
/// assert!(hasher.verify("my_secure_password", &hash).unwrap());
/// assert!(!hasher.verify("wrong_password", &hash).unwrap());
/// ```
pub trait PasswordHasher: Send + Sync {
	/// Hashes a password with a fresh random salt
	fn hash(&self, password: &str) -> AuthResult<String>;

	/// Verifies a password against a stored hash
	///
	/// Returns `Ok(false)` on mismatch; errors are reserved for malformed
	/// hashes or backend failures.
	fn verify(&self, password: &str, hash: &str) -> AuthResult<bool>;
}

/// Argon2id password hasher
///
/// Social-only accounts carry an unusable hash produced by
/// [`Argon2Hasher::random_unusable_hash`]: a hash of a random value nobody
/// knows, present only to satisfy the always-present credential invariant.
pub struct Argon2Hasher;

impl Argon2Hasher {
	/// Creates a new Argon2 password hasher
	pub fn new() -> Self {
		Self
	}

	/// Hash of a random throwaway value, for accounts without a usable password
	pub fn random_unusable_hash(&self) -> AuthResult<String> {
		self.hash(&uuid::Uuid::new_v4().to_string())
	}
}

impl Default for Argon2Hasher {
	fn default() -> Self {
		Self::new()
	}
}

impl PasswordHasher for Argon2Hasher {
	fn hash(&self, password: &str) -> AuthResult<String> {
		use argon2::Argon2;
		use password_hash::{PasswordHasher as _, SaltString};
		use rand::RngCore;

		let mut salt_bytes = [0u8; 16];
		rand::thread_rng().fill_bytes(&mut salt_bytes);

		let salt = SaltString::encode_b64(&salt_bytes)
			.map_err(|e| AuthError::Hashing(e.to_string()))?;

		Argon2::default()
			.hash_password(password.as_bytes(), &salt)
			.map(|hash| hash.to_string())
			.map_err(|e| AuthError::Hashing(e.to_string()))
	}

	fn verify(&self, password: &str, hash: &str) -> AuthResult<bool> {
		use argon2::Argon2;
		use password_hash::{PasswordHash, PasswordVerifier};

		let parsed_hash =
			PasswordHash::new(hash).map_err(|e| AuthError::Hashing(e.to_string()))?;

		Ok(Argon2::default()
			.verify_password(password.as_bytes(), &parsed_hash)
			.is_ok())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_hash_and_verify_roundtrip() {
		let hasher = Argon2Hasher::new();
		let hash = hasher.hash("pw-123!").unwrap();
		assert!(hasher.verify("pw-123!", &hash).unwrap());
		assert!(!hasher.verify("pw-124!", &hash).unwrap());
	}

	#[test]
	fn test_hashes_are_salted() {
		let hasher = Argon2Hasher::new();
		let first = hasher.hash("same-password").unwrap();
		let second = hasher.hash("same-password").unwrap();
		assert_ne!(first, second);
	}

	#[test]
	fn test_random_unusable_hash_is_wellformed() {
		let hasher = Argon2Hasher::new();
		let hash = hasher.random_unusable_hash().unwrap();
		// Parses as a valid hash, but no caller knows its preimage.
		assert!(!hasher.verify("", &hash).unwrap());
	}

	#[test]
	fn test_verify_rejects_malformed_hash() {
		let hasher = Argon2Hasher::new();
		let result = hasher.verify("pw", "not-a-phc-string");
		assert!(matches!(result, Err(AuthError::Hashing(_))));
	}
}
