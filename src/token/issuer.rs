//! Token issuance, rotation, and revocation flows
//!
//! [`TokenIssuer`] glues the pure codec to the blacklist and owns the token
//! lifecycle policy: pairs are issued from one identity snapshot, a refresh
//! token rotates exactly once, and logout is best-effort and idempotent.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::token::blacklist::TokenBlacklist;
use crate::token::codec::TokenCodec;
use crate::token::{TokenClaims, TokenKind, TokenPair};
use crate::user::User;

/// Issues, rotates, and revokes token pairs
pub struct TokenIssuer {
	codec: TokenCodec,
	blacklist: Arc<dyn TokenBlacklist>,
	access_ttl_secs: i64,
	refresh_ttl_secs: i64,
}

impl TokenIssuer {
	pub fn new(config: &AuthConfig, blacklist: Arc<dyn TokenBlacklist>) -> Self {
		Self {
			codec: TokenCodec::new(&config.secret),
			blacklist,
			access_ttl_secs: config.access_ttl_secs,
			refresh_ttl_secs: config.refresh_ttl_secs,
		}
	}

	/// Sign an access/refresh pair from one identity snapshot
	pub fn issue_pair(&self, user: &User) -> AuthResult<TokenPair> {
		let now = Utc::now();
		let access = TokenClaims::for_user(user, TokenKind::Access, self.access_ttl_secs, now);
		let refresh = TokenClaims::for_user(user, TokenKind::Refresh, self.refresh_ttl_secs, now);
		Ok(TokenPair {
			access_token: self.codec.issue(&access)?,
			refresh_token: self.codec.issue(&refresh)?,
		})
	}

	/// Exchange a live refresh token for a fresh pair.
	///
	/// The presented token is revoked before the new pair is signed, so under
	/// concurrent use of the same refresh token exactly one caller gets a
	/// pair and the rest see [`AuthError::InvalidToken`]. Every failure mode
	/// (expired, wrong kind, already used, malformed) collapses to that same
	/// error; details go to the logs, not the caller.
	pub async fn rotate(&self, refresh_token: &str) -> AuthResult<(TokenPair, TokenClaims)> {
		let claims = self.codec.parse(refresh_token).map_err(|err| {
			debug!(error = %err, "refresh token failed verification");
			AuthError::InvalidToken
		})?;
		if claims.kind != TokenKind::Refresh {
			debug!(kind = claims.kind.as_str(), "wrong token kind presented for refresh");
			return Err(AuthError::InvalidToken);
		}

		let remaining = claims.remaining_millis(Utc::now());
		let newly_revoked = self.blacklist.revoke(refresh_token, remaining).await?;
		if !newly_revoked {
			debug!(sub = %claims.sub, "refresh token already used");
			return Err(AuthError::InvalidToken);
		}

		let now = Utc::now();
		let access = claims.renewed(TokenKind::Access, self.access_ttl_secs, now);
		let refresh = claims.renewed(TokenKind::Refresh, self.refresh_ttl_secs, now);
		let pair = TokenPair {
			access_token: self.codec.issue(&access)?,
			refresh_token: self.codec.issue(&refresh)?,
		};
		Ok((pair, claims))
	}

	/// Revoke whichever tokens of a pair the client still holds.
	///
	/// Idempotent and infallible: unparsable, already-revoked, or wrong-kind
	/// tokens are logged and skipped, never surfaced. Each slot only accepts
	/// its own kind, so a token smuggled into the wrong slot is ignored.
	pub async fn revoke_for_logout(&self, access_token: Option<&str>, refresh_token: Option<&str>) {
		self.revoke_if_kind(access_token, TokenKind::Access).await;
		self.revoke_if_kind(refresh_token, TokenKind::Refresh).await;
	}

	async fn revoke_if_kind(&self, token: Option<&str>, expected: TokenKind) {
		let Some(token) = token else { return };
		match self.codec.parse(token) {
			Ok(claims) if claims.kind == expected => {
				let remaining = claims.remaining_millis(Utc::now());
				if let Err(err) = self.blacklist.revoke(token, remaining).await {
					debug!(error = %err, "blacklist write failed during logout");
				}
			}
			Ok(claims) => debug!(
				kind = claims.kind.as_str(),
				expected = expected.as_str(),
				"wrong token kind at logout, skipping"
			),
			Err(err) => debug!(error = %err, "skipping unverifiable token at logout"),
		}
	}

	/// Verify an access token and return its claims
	pub async fn authenticate(&self, access_token: &str) -> AuthResult<TokenClaims> {
		let claims = self.codec.parse(access_token).map_err(|err| {
			debug!(error = %err, "access token failed verification");
			AuthError::InvalidToken
		})?;
		if claims.kind != TokenKind::Access {
			return Err(AuthError::InvalidToken);
		}
		if self.blacklist.is_revoked(access_token).await? {
			debug!(sub = %claims.sub, "revoked access token presented");
			return Err(AuthError::InvalidToken);
		}
		Ok(claims)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::token::blacklist::InMemoryTokenBlacklist;

	fn issuer() -> TokenIssuer {
		let config = AuthConfig::new("test-secret-test-secret-test-secret-1234");
		TokenIssuer::new(&config, Arc::new(InMemoryTokenBlacklist::new()))
	}

	fn alice() -> User {
		User::new_local("alice", "hash", "Alice", None).unwrap()
	}

	#[tokio::test]
	async fn test_issued_pair_has_both_kinds() {
		let issuer = issuer();
		let pair = issuer.issue_pair(&alice()).unwrap();

		let access = issuer.authenticate(&pair.access_token).await.unwrap();
		assert_eq!(access.kind, TokenKind::Access);
		assert_eq!(access.name, "Alice");

		// The refresh half must not pass as an access token.
		assert_eq!(
			issuer.authenticate(&pair.refresh_token).await,
			Err(AuthError::InvalidToken)
		);
	}

	#[tokio::test]
	async fn test_rotate_is_single_use() {
		let issuer = issuer();
		let pair = issuer.issue_pair(&alice()).unwrap();

		let (fresh, claims) = issuer.rotate(&pair.refresh_token).await.unwrap();
		assert_eq!(claims.name, "Alice");
		assert_ne!(fresh.refresh_token, pair.refresh_token);

		assert_eq!(
			issuer.rotate(&pair.refresh_token).await,
			Err(AuthError::InvalidToken)
		);
		// The replacement still works.
		issuer.rotate(&fresh.refresh_token).await.unwrap();
	}

	#[tokio::test]
	async fn test_access_token_rejected_for_rotation() {
		let issuer = issuer();
		let pair = issuer.issue_pair(&alice()).unwrap();
		assert_eq!(
			issuer.rotate(&pair.access_token).await,
			Err(AuthError::InvalidToken)
		);
	}

	#[tokio::test]
	async fn test_logout_revokes_access_and_is_idempotent() {
		let issuer = issuer();
		let pair = issuer.issue_pair(&alice()).unwrap();

		issuer
			.revoke_for_logout(Some(&pair.access_token), Some(&pair.refresh_token))
			.await;
		assert_eq!(
			issuer.authenticate(&pair.access_token).await,
			Err(AuthError::InvalidToken)
		);
		assert_eq!(
			issuer.rotate(&pair.refresh_token).await,
			Err(AuthError::InvalidToken)
		);

		// A second logout with the same tokens changes nothing.
		issuer
			.revoke_for_logout(Some(&pair.access_token), Some(&pair.refresh_token))
			.await;
	}

	#[tokio::test]
	async fn test_logout_skips_tokens_in_the_wrong_slot() {
		let issuer = issuer();
		let pair = issuer.issue_pair(&alice()).unwrap();

		// Swapped slots: neither token matches its slot's kind, so neither
		// is revoked.
		issuer
			.revoke_for_logout(Some(&pair.refresh_token), Some(&pair.access_token))
			.await;
		issuer.authenticate(&pair.access_token).await.unwrap();
		issuer.rotate(&pair.refresh_token).await.unwrap();
	}

	#[tokio::test]
	async fn test_logout_with_garbage_tokens_is_silent() {
		let issuer = issuer();
		issuer.revoke_for_logout(Some("garbage"), None).await;
		issuer.revoke_for_logout(None, None).await;
	}
}
