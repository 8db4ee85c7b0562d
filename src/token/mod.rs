//! Signed-token claims, codec, blacklist, and issuance
//!
//! Tokens come in pairs: a short-lived `access` token presented on every
//! request and a long-lived `refresh` token exchanged exactly once for the
//! next pair. [`codec::TokenCodec`] does the pure sign/parse work,
//! [`blacklist::TokenBlacklist`] remembers revoked tokens until their natural
//! expiry, and [`issuer::TokenIssuer`] wires both into the session flows.

pub mod blacklist;
pub mod codec;
pub mod issuer;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;
use crate::user::{User, UserId};

/// Which half of a token pair a token is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
	Access,
	Refresh,
}

impl TokenKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			TokenKind::Access => "access",
			TokenKind::Refresh => "refresh",
		}
	}
}

/// Claim set carried inside a signed token
///
/// Ephemeral, never persisted. `sub` holds the user id, `kind` distinguishes
/// the two halves of a pair so a refresh token can never pass as an access
/// token (and vice versa).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
	/// Subject: the user id as a string
	pub sub: String,
	/// Unique token id; distinguishes otherwise-identical tokens minted
	/// within the same second
	pub jti: String,
	/// Display name at issuance time
	pub name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub contact_id: Option<String>,
	pub roles: Vec<String>,
	#[serde(rename = "type")]
	pub kind: TokenKind,
	/// Issued-at, seconds since the epoch
	pub iat: i64,
	/// Expiry, seconds since the epoch
	pub exp: i64,
}

impl TokenClaims {
	/// Build claims for a user snapshot at `now` with the given lifetime
	pub fn for_user(user: &User, kind: TokenKind, ttl_secs: i64, now: DateTime<Utc>) -> Self {
		Self {
			sub: user.id.to_string(),
			jti: Uuid::new_v4().to_string(),
			name: user.display_name.clone(),
			email: user.primary_email(),
			contact_id: user.contact_id.clone(),
			roles: user.role_names(),
			kind,
			iat: now.timestamp(),
			exp: (now + Duration::seconds(ttl_secs)).timestamp(),
		}
	}

	/// Re-stamp these claims for a fresh token of the given kind
	pub fn renewed(&self, kind: TokenKind, ttl_secs: i64, now: DateTime<Utc>) -> Self {
		let mut claims = self.clone();
		claims.jti = Uuid::new_v4().to_string();
		claims.kind = kind;
		claims.iat = now.timestamp();
		claims.exp = (now + Duration::seconds(ttl_secs)).timestamp();
		claims
	}

	/// Milliseconds until expiry; non-positive once expired
	pub fn remaining_millis(&self, now: DateTime<Utc>) -> i64 {
		self.exp
			.saturating_sub(now.timestamp())
			.saturating_mul(1_000)
	}

	/// The subject parsed back into a [`UserId`]
	pub fn subject_id(&self) -> Result<UserId, AuthError> {
		Uuid::parse_str(&self.sub)
			.map(UserId)
			.map_err(|_| AuthError::InvalidToken)
	}
}

/// Access/refresh token pair handed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	pub access_token: String,
	pub refresh_token: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn snapshot() -> User {
		User::new_local("alice", "hash", "Alice", Some("@alice".into())).unwrap()
	}

	#[test]
	fn test_claims_carry_identity_snapshot() {
		let user = snapshot();
		let now = Utc::now();
		let claims = TokenClaims::for_user(&user, TokenKind::Access, 1_800, now);

		assert_eq!(claims.sub, user.id.to_string());
		assert_eq!(claims.name, "Alice");
		assert_eq!(claims.contact_id.as_deref(), Some("@alice"));
		assert_eq!(claims.roles, vec!["USER".to_string()]);
		assert_eq!(claims.kind, TokenKind::Access);
		assert_eq!(claims.exp - claims.iat, 1_800);
		assert_eq!(claims.subject_id().unwrap(), user.id);
	}

	#[test]
	fn test_kind_serializes_as_type_field() {
		let claims = TokenClaims::for_user(&snapshot(), TokenKind::Refresh, 60, Utc::now());
		let json = serde_json::to_value(&claims).unwrap();
		assert_eq!(json["type"], "refresh");
	}

	#[test]
	fn test_renewed_keeps_identity_but_restamps() {
		let now = Utc::now();
		let original = TokenClaims::for_user(&snapshot(), TokenKind::Refresh, 60, now);
		let later = now + Duration::seconds(10);
		let fresh = original.renewed(TokenKind::Access, 1_800, later);

		assert_eq!(fresh.sub, original.sub);
		assert_ne!(fresh.jti, original.jti);
		assert_eq!(fresh.kind, TokenKind::Access);
		assert_eq!(fresh.iat, later.timestamp());
		assert_eq!(fresh.exp - fresh.iat, 1_800);
	}

	#[test]
	fn test_remaining_millis() {
		let now = Utc::now();
		let claims = TokenClaims::for_user(&snapshot(), TokenKind::Access, 30, now);
		assert_eq!(claims.remaining_millis(now), 30_000);
		assert!(claims.remaining_millis(now + Duration::seconds(31)) <= 0);
	}

	#[test]
	fn test_bad_subject_rejected() {
		let mut claims = TokenClaims::for_user(&snapshot(), TokenKind::Access, 30, Utc::now());
		claims.sub = "not-a-uuid".into();
		assert_eq!(claims.subject_id(), Err(AuthError::InvalidToken));
	}
}
