//! Revocation list for not-yet-expired tokens
//!
//! A revoked token only needs to be remembered until its natural expiry,
//! so entries carry a deadline and backends may evict anything past it.
//! `revoke` is an atomic insert-if-absent: in a refresh race, exactly one
//! caller sees `true` and wins the rotation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::store::StoreError;

/// Revocation store for signed tokens
#[async_trait]
pub trait TokenBlacklist: Send + Sync {
	/// Revoke a token for the rest of its lifetime.
	///
	/// Returns `true` if this call newly revoked the token, `false` if it was
	/// already revoked. A non-positive `remaining_millis` means the token has
	/// already expired; nothing is recorded and `false` is returned.
	async fn revoke(&self, token: &str, remaining_millis: i64) -> Result<bool, StoreError>;

	/// Whether the token is currently revoked
	async fn is_revoked(&self, token: &str) -> Result<bool, StoreError>;
}

/// In-memory revocation list with lazy expiry
pub struct InMemoryTokenBlacklist {
	entries: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryTokenBlacklist {
	pub fn new() -> Self {
		Self {
			entries: Mutex::new(HashMap::new()),
		}
	}
}

impl Default for InMemoryTokenBlacklist {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl TokenBlacklist for InMemoryTokenBlacklist {
	async fn revoke(&self, token: &str, remaining_millis: i64) -> Result<bool, StoreError> {
		if remaining_millis <= 0 {
			return Ok(false);
		}
		let deadline = Utc::now() + Duration::milliseconds(remaining_millis);

		let mut entries = self.entries.lock().await;
		let now = Utc::now();
		entries.retain(|_, expires| *expires > now);

		// An entry that survived the sweep is still live; do not extend it.
		if entries.contains_key(token) {
			return Ok(false);
		}
		entries.insert(token.to_string(), deadline);
		Ok(true)
	}

	async fn is_revoked(&self, token: &str) -> Result<bool, StoreError> {
		let entries = self.entries.lock().await;
		Ok(entries
			.get(token)
			.is_some_and(|expires| *expires > Utc::now()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_revoke_then_lookup() {
		let blacklist = InMemoryTokenBlacklist::new();
		assert!(!blacklist.is_revoked("t1").await.unwrap());
		assert!(blacklist.revoke("t1", 60_000).await.unwrap());
		assert!(blacklist.is_revoked("t1").await.unwrap());
	}

	#[tokio::test]
	async fn test_second_revoke_loses() {
		let blacklist = InMemoryTokenBlacklist::new();
		assert!(blacklist.revoke("t1", 60_000).await.unwrap());
		assert!(!blacklist.revoke("t1", 60_000).await.unwrap());
	}

	#[tokio::test]
	async fn test_expired_token_is_a_no_op() {
		let blacklist = InMemoryTokenBlacklist::new();
		assert!(!blacklist.revoke("t1", 0).await.unwrap());
		assert!(!blacklist.revoke("t1", -5_000).await.unwrap());
		assert!(!blacklist.is_revoked("t1").await.unwrap());
	}

	#[tokio::test]
	async fn test_entries_lapse_with_their_token() {
		let blacklist = InMemoryTokenBlacklist::new();
		{
			let mut entries = blacklist.entries.lock().await;
			entries.insert("t1".into(), Utc::now() - Duration::seconds(1));
		}
		assert!(!blacklist.is_revoked("t1").await.unwrap());
		// The lapsed entry no longer blocks a fresh revocation.
		assert!(blacklist.revoke("t1", 60_000).await.unwrap());
	}
}
