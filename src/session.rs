//! End-to-end session protocol
//!
//! [`SessionService`] is the request-facing composition of the resolver, the
//! token issuer, and the account managers: signup, both login styles, token
//! refresh, logout, and bearer authentication. Tokens cross this boundary as
//! `Authorization: Bearer <token>` header values (the refresh token may
//! arrive through an equivalent side-channel header).

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::account::advisor::{AdvisorManager, AdvisorOutcome};
use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::hasher::PasswordHasher;
use crate::social::providers::{self, RawAttributes};
use crate::social::resolver::IdentityResolver;
use crate::social::SocialProvider;
use crate::store::{StoreError, UserStore};
use crate::token::blacklist::TokenBlacklist;
use crate::token::issuer::TokenIssuer;
use crate::token::{TokenClaims, TokenPair};
use crate::user::{AccountStatus, User, UserId};

const BEARER_PREFIX: &str = "Bearer ";

/// Local signup payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
	pub handle: String,
	pub password: String,
	pub display_name: String,
	pub contact_id: Option<String>,
}

/// Identity summary plus a fresh token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
	pub user_id: UserId,
	pub display_name: String,
	pub email: Option<String>,
	pub contact_id: Option<String>,
	pub roles: Vec<String>,
	pub access_token: String,
	pub refresh_token: String,
}

impl TokenResponse {
	fn from_user(user: &User, pair: TokenPair) -> Self {
		Self {
			user_id: user.id,
			display_name: user.display_name.clone(),
			email: user.primary_email(),
			contact_id: user.contact_id.clone(),
			roles: user.role_names(),
			access_token: pair.access_token,
			refresh_token: pair.refresh_token,
		}
	}

	fn from_claims(claims: &TokenClaims, pair: TokenPair) -> AuthResult<Self> {
		Ok(Self {
			user_id: claims.subject_id()?,
			display_name: claims.name.clone(),
			email: claims.email.clone(),
			contact_id: claims.contact_id.clone(),
			roles: claims.roles.clone(),
			access_token: pair.access_token,
			refresh_token: pair.refresh_token,
		})
	}
}

/// The login/refresh/logout protocol over the identity core
pub struct SessionService {
	store: Arc<dyn UserStore>,
	hasher: Arc<dyn PasswordHasher>,
	resolver: IdentityResolver,
	issuer: TokenIssuer,
	advisors: AdvisorManager,
}

impl SessionService {
	pub fn new(
		config: &AuthConfig,
		store: Arc<dyn UserStore>,
		hasher: Arc<dyn PasswordHasher>,
		blacklist: Arc<dyn TokenBlacklist>,
	) -> Self {
		Self {
			resolver: IdentityResolver::new(store.clone(), hasher.clone()),
			issuer: TokenIssuer::new(config, blacklist),
			advisors: AdvisorManager::new(store.clone()),
			store,
			hasher,
		}
	}

	/// Local signup; the handle must be unused
	pub async fn signup(&self, request: SignupRequest) -> AuthResult<UserId> {
		let encoded = self.hasher.hash(&request.password)?;
		let user = User::new_local(
			&request.handle,
			encoded,
			&request.display_name,
			request.contact_id,
		)?;
		match self.store.save(&user).await {
			Ok(saved) => {
				info!(handle = %saved.handle, "local signup");
				Ok(saved.id)
			}
			Err(StoreError::DuplicateHandle) => Err(AuthError::DuplicateHandle(request.handle)),
			Err(err) => Err(err.into()),
		}
	}

	/// Local login: verify credentials, require an active account, mint a pair
	pub async fn login(&self, handle: &str, password: &str) -> AuthResult<TokenResponse> {
		let user = self.resolver.resolve_local(handle, password).await?;
		self.require_active(&user)?;
		let pair = self.issuer.issue_pair(&user)?;
		Ok(TokenResponse::from_user(&user, pair))
	}

	/// OAuth2 callback tail: normalize the provider profile, find or create
	/// the user, mint a pair
	pub async fn login_social(
		&self,
		provider_key: &str,
		attributes: &RawAttributes,
	) -> AuthResult<TokenResponse> {
		let provider: SocialProvider = provider_key.parse()?;
		let profile = providers::normalize(provider, attributes)?;
		let user = self.resolver.resolve_or_create_social(&profile).await?;
		self.require_active(&user)?;
		let pair = self.issuer.issue_pair(&user)?;
		Ok(TokenResponse::from_user(&user, pair))
	}

	/// Exchange a refresh token presented as a bearer header for a new pair
	pub async fn refresh(&self, authorization: &str) -> AuthResult<TokenResponse> {
		let token = strip_bearer(authorization).ok_or(AuthError::InvalidToken)?;
		let (pair, claims) = self.issuer.rotate(token).await?;
		TokenResponse::from_claims(&claims, pair)
	}

	/// Best-effort logout; never fails, regardless of what the headers hold
	pub async fn logout(&self, authorization: Option<&str>, refresh_header: Option<&str>) {
		let access = authorization.map(lenient_token);
		let refresh = refresh_header.map(lenient_token);
		self.issuer.revoke_for_logout(access, refresh).await;
	}

	/// Verify a bearer access token for a protected endpoint
	pub async fn authenticate(&self, authorization: &str) -> AuthResult<TokenClaims> {
		let token = strip_bearer(authorization).ok_or(AuthError::InvalidToken)?;
		self.issuer.authenticate(token).await
	}

	/// The authenticated caller applies for advisor status
	pub async fn apply_advisor(&self, authorization: &str) -> AuthResult<AdvisorOutcome> {
		let claims = self.authenticate(authorization).await?;
		self.advisors.apply(claims.subject_id()?).await
	}

	/// The authenticated caller approves a candidate; requires a privileged role
	pub async fn approve_advisor(
		&self,
		authorization: &str,
		candidate_id: UserId,
	) -> AuthResult<AdvisorOutcome> {
		let claims = self.authenticate(authorization).await?;
		let approver = self
			.store
			.find_by_id(claims.subject_id()?)
			.await?
			.ok_or(AuthError::UserNotFound)?;
		self.advisors.approve(&approver, candidate_id).await
	}

	fn require_active(&self, user: &User) -> AuthResult<()> {
		if user.status != AccountStatus::Active {
			return Err(AuthError::NotActive);
		}
		Ok(())
	}
}

fn strip_bearer(header: &str) -> Option<&str> {
	header.strip_prefix(BEARER_PREFIX).filter(|t| !t.is_empty())
}

/// For logout only: accept the token with or without its `Bearer ` prefix
fn lenient_token(header: &str) -> &str {
	strip_bearer(header).unwrap_or(header)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::hasher::Argon2Hasher;
	use crate::store::InMemoryUserStore;
	use crate::token::blacklist::InMemoryTokenBlacklist;

	fn service() -> (SessionService, Arc<InMemoryUserStore>) {
		let store = Arc::new(InMemoryUserStore::new());
		let service = SessionService::new(
			&AuthConfig::new("test-secret-test-secret-test-secret-1234"),
			store.clone(),
			Arc::new(Argon2Hasher::new()),
			Arc::new(InMemoryTokenBlacklist::new()),
		);
		(service, store)
	}

	fn alice_signup() -> SignupRequest {
		SignupRequest {
			handle: "alice".into(),
			password: "s3cret".into(),
			display_name: "Alice".into(),
			contact_id: Some("@alice".into()),
		}
	}

	#[tokio::test]
	async fn test_signup_rejects_taken_handle() {
		let (service, _) = service();
		service.signup(alice_signup()).await.unwrap();
		assert_eq!(
			service.signup(alice_signup()).await,
			Err(AuthError::DuplicateHandle("alice".into()))
		);
	}

	#[tokio::test]
	async fn test_blocked_account_cannot_log_in() {
		let (service, store) = service();
		let id = service.signup(alice_signup()).await.unwrap();

		let mut user = store.find_by_id(id).await.unwrap().unwrap();
		user.status = AccountStatus::Blocked;
		store.save(&user).await.unwrap();

		assert_eq!(
			service.login("alice", "s3cret").await,
			Err(AuthError::NotActive)
		);
	}

	#[tokio::test]
	async fn test_refresh_requires_bearer_header() {
		let (service, _) = service();
		service.signup(alice_signup()).await.unwrap();
		let session = service.login("alice", "s3cret").await.unwrap();

		// Raw token without the scheme prefix is a malformed header.
		assert_eq!(
			service.refresh(&session.refresh_token).await,
			Err(AuthError::InvalidToken)
		);

		let header = format!("Bearer {}", session.refresh_token);
		let renewed = service.refresh(&header).await.unwrap();
		assert_eq!(renewed.user_id, session.user_id);
	}

	#[tokio::test]
	async fn test_logout_accepts_any_header_shape() {
		let (service, _) = service();
		service.signup(alice_signup()).await.unwrap();
		let session = service.login("alice", "s3cret").await.unwrap();

		// Prefixed access token, bare refresh token; neither may fail.
		let access_header = format!("Bearer {}", session.access_token);
		service
			.logout(Some(&access_header), Some(&session.refresh_token))
			.await;

		assert_eq!(
			service.authenticate(&access_header).await,
			Err(AuthError::InvalidToken)
		);
	}

	#[tokio::test]
	async fn test_login_social_unknown_provider() {
		let (service, _) = service();
		let attributes = RawAttributes::new();
		assert_eq!(
			service.login_social("myspace", &attributes).await,
			Err(AuthError::UnsupportedProvider("myspace".into()))
		);
	}
}
