//! Pure signing and parsing of compact signed tokens
//!
//! No I/O and no clock of its own beyond expiry validation; issuance
//! timestamps live in the claims the caller builds. HMAC-SHA256 with a
//! shared secret from [`AuthConfig`](crate::config::AuthConfig).

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::error::AuthError;
use crate::token::TokenClaims;

/// Token-level failures, folded into [`AuthError::InvalidToken`] at the
/// session boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
	#[error("token expired")]
	Expired,

	#[error("signature verification failed")]
	InvalidSignature,

	#[error("malformed token")]
	Malformed,

	#[error("token signing failed")]
	Signing,
}

impl From<TokenError> for AuthError {
	fn from(_: TokenError) -> Self {
		AuthError::InvalidToken
	}
}

/// Stateless signer/verifier for token claim sets
pub struct TokenCodec {
	encoding_key: EncodingKey,
	decoding_key: DecodingKey,
	validation: Validation,
}

impl TokenCodec {
	/// Build a codec around a shared HMAC secret
	///
	/// # Examples
	///
	/// ```
	/// use mentora_auth::token::codec::TokenCodec;
	///
	/// let codec = TokenCodec::new("a-string-secret-at-least-256-bits-long");
	/// ```
	pub fn new(secret: &str) -> Self {
		let mut validation = Validation::new(Algorithm::HS256);
		// Expiry is exact; a just-expired token must not slip through.
		validation.leeway = 0;
		Self {
			encoding_key: EncodingKey::from_secret(secret.as_bytes()),
			decoding_key: DecodingKey::from_secret(secret.as_bytes()),
			validation,
		}
	}

	/// Sign the claims into a compact token string
	pub fn issue(&self, claims: &TokenClaims) -> Result<String, TokenError> {
		jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
			.map_err(|_| TokenError::Signing)
	}

	/// Verify signature and expiry, returning the embedded claims
	pub fn parse(&self, token: &str) -> Result<TokenClaims, TokenError> {
		jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
			.map(|data| data.claims)
			.map_err(|err| match err.kind() {
				ErrorKind::ExpiredSignature => TokenError::Expired,
				ErrorKind::InvalidSignature => TokenError::InvalidSignature,
				_ => TokenError::Malformed,
			})
	}
}
