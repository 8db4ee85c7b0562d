//! Social login: provider identifiers, profile normalization, and
//! identity resolution
//!
//! The OAuth2 handshake itself is a collaborator; this module starts where it
//! ends, with the provider's raw attribute map. Each provider contributes a
//! pure normalization function ([`providers::normalize`]) producing a common
//! [`SocialProfile`]; [`resolver::IdentityResolver`] turns that profile into
//! a stable local identity.

pub mod providers;
pub mod resolver;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Supported social login providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
	Kakao,
	Google,
	Naver,
}

impl SocialProvider {
	/// Provider key as it appears in callback registration ids and in
	/// generated login handles
	pub fn as_str(&self) -> &'static str {
		match self {
			SocialProvider::Kakao => "kakao",
			SocialProvider::Google => "google",
			SocialProvider::Naver => "naver",
		}
	}
}

impl fmt::Display for SocialProvider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for SocialProvider {
	type Err = AuthError;

	/// Parse the registration key supplied at the start of the callback
	///
	/// # Examples
	///
	/// ```
	/// use mentora_auth::social::SocialProvider;
	///
	/// assert_eq!("kakao".parse::<SocialProvider>().unwrap(), SocialProvider::Kakao);
	/// assert_eq!("Google".parse::<SocialProvider>().unwrap(), SocialProvider::Google);
	/// assert!("github".parse::<SocialProvider>().is_err());
	/// ```
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"kakao" => Ok(SocialProvider::Kakao),
			"google" => Ok(SocialProvider::Google),
			"naver" => Ok(SocialProvider::Naver),
			other => Err(AuthError::UnsupportedProvider(other.to_string())),
		}
	}
}

/// Provider-independent profile shape
///
/// The common denominator every normalization function must produce: a stable
/// external identifier plus display fields. Missing optional fields have
/// already degraded to placeholders by the time this struct exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialProfile {
	pub provider: SocialProvider,
	/// Stable per-provider user identifier (Kakao id, Google sub, Naver id)
	pub provider_user_id: String,
	pub email: Option<String>,
	/// Display nickname, placeholder when the provider omitted it
	pub nickname: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_provider_roundtrip() {
		for provider in [
			SocialProvider::Kakao,
			SocialProvider::Google,
			SocialProvider::Naver,
		] {
			assert_eq!(provider.as_str().parse::<SocialProvider>().unwrap(), provider);
		}
	}

	#[test]
	fn test_unsupported_provider_error() {
		let err = "apple".parse::<SocialProvider>().unwrap_err();
		assert_eq!(err, AuthError::UnsupportedProvider("apple".into()));
		assert_eq!(err.status().as_u16(), 400);
	}
}
