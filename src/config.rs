//! Session configuration
//!
//! Explicit configuration passed to [`crate::token::codec::TokenCodec`] at
//! construction. The signing secret is loaded once at process start and never
//! rotated at runtime: rotating it invalidates every outstanding token, an
//! accepted operational tradeoff.

use serde::{Deserialize, Serialize};

/// Default access-token validity: 30 minutes.
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 30 * 60;

/// Default refresh-token validity: 14 days.
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 14 * 24 * 60 * 60;

/// Token issuance configuration
///
/// # Examples
///
/// ```
/// use mentora_auth::AuthConfig;
///
/// let config = AuthConfig::new("a-very-long-signing-secret")
/// 	.access_ttl_secs(900)
/// 	.refresh_ttl_secs(7 * 24 * 60 * 60);
///
/// assert_eq!(config.access_ttl_secs, 900);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
	/// Symmetric HS256 signing secret shared process-wide
	pub secret: String,
	/// Access-token validity in seconds (short: minutes)
	pub access_ttl_secs: i64,
	/// Refresh-token validity in seconds (long: days)
	pub refresh_ttl_secs: i64,
}

impl AuthConfig {
	/// Create a configuration with default TTLs
	pub fn new(secret: impl Into<String>) -> Self {
		Self {
			secret: secret.into(),
			access_ttl_secs: DEFAULT_ACCESS_TTL_SECS,
			refresh_ttl_secs: DEFAULT_REFRESH_TTL_SECS,
		}
	}

	/// Set the access-token validity
	pub fn access_ttl_secs(mut self, seconds: i64) -> Self {
		self.access_ttl_secs = seconds;
		self
	}

	/// Set the refresh-token validity
	pub fn refresh_ttl_secs(mut self, seconds: i64) -> Self {
		self.refresh_ttl_secs = seconds;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = AuthConfig::new("secret");
		assert_eq!(config.access_ttl_secs, DEFAULT_ACCESS_TTL_SECS);
		assert_eq!(config.refresh_ttl_secs, DEFAULT_REFRESH_TTL_SECS);
	}

	#[test]
	fn test_builder() {
		let config = AuthConfig::new("secret")
			.access_ttl_secs(60)
			.refresh_ttl_secs(3600);
		assert_eq!(config.access_ttl_secs, 60);
		assert_eq!(config.refresh_ttl_secs, 3600);
	}
}
