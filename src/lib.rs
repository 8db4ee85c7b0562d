//! Identity and session-management core for the Mentora platform.
//!
//! Authenticates users created locally (handle/password) or through social
//! login (Kakao, Google, Naver), deduplicating identities across providers;
//! issues and rotates access/refresh token pairs with server-side
//! revocation; and tracks the password-initialization and advisor-promotion
//! state machines that gate which operations are legal.
//!
//! HTTP routing, the OAuth2 handshakes themselves, and persistence engines
//! live outside this crate, behind the [`store::UserStore`] and
//! [`token::blacklist::TokenBlacklist`] seams.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use mentora_auth::config::AuthConfig;
//! use mentora_auth::hasher::Argon2Hasher;
//! use mentora_auth::session::{SessionService, SignupRequest};
//! use mentora_auth::store::InMemoryUserStore;
//! use mentora_auth::token::blacklist::InMemoryTokenBlacklist;
//!
//! # async fn demo() -> Result<(), mentora_auth::error::AuthError> {
//! let service = SessionService::new(
//! 	&AuthConfig::new("a-string-secret-at-least-256-bits-long"),
//! 	Arc::new(InMemoryUserStore::new()),
//! 	Arc::new(Argon2Hasher::new()),
//! 	Arc::new(InMemoryTokenBlacklist::new()),
//! );
//!
//! service
//! 	.signup(SignupRequest {
//! 		handle: "alice".into(),
//! 		password: "s3cret".into(),
//! 		display_name: "Alice".into(),
//! 		contact_id: None,
//! 	})
//! 	.await?;
//! let session = service.login("alice", "s3cret").await?;
//! let claims = service
//! 	.authenticate(&format!("Bearer {}", session.access_token))
//! 	.await?;
//! assert_eq!(claims.name, "Alice");
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod config;
pub mod error;
pub mod hasher;
pub mod session;
pub mod social;
pub mod store;
pub mod token;
pub mod user;

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use hasher::{Argon2Hasher, PasswordHasher};
pub use session::{SessionService, SignupRequest, TokenResponse};
pub use store::{InMemoryUserStore, StoreError, UserStore};
pub use user::{AccountStatus, AdvisorStatus, User, UserId, UserRole};
