//! Error taxonomy for the identity core
//!
//! Domain components fail with a typed [`AuthError`]; the transport boundary
//! translates each variant into a stable machine-readable code plus an HTTP
//! status class via [`AuthError::code`] and [`AuthError::status`].

use http::StatusCode;
use thiserror::Error;

/// Identity and session errors
///
/// Token failures are deliberately coarse: bad signature, expiry, wrong kind
/// and prior revocation all surface as [`AuthError::InvalidToken`] so callers
/// cannot probe which check failed.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
	/// No matching identity (or the row is soft-deleted)
	#[error("user not found")]
	UserNotFound,

	/// The identity has no profile yet
	#[error("profile not found")]
	ProfileNotFound,

	/// Login handle is already taken
	#[error("login handle '{0}' is already in use")]
	DuplicateHandle(String),

	/// The (provider, provider user id) pair is already linked to an identity
	#[error("social account is already linked")]
	DuplicateSocialLink,

	/// Unknown handle or wrong password; intentionally indistinguishable
	#[error("invalid credentials")]
	InvalidCredentials,

	/// Invalid, expired, revoked, or wrong-kind token
	#[error("invalid token")]
	InvalidToken,

	/// Account is inactive, blocked, or deleted
	#[error("account is not active")]
	NotActive,

	/// Caller lacks the role required for this operation
	#[error("insufficient role for this operation")]
	Forbidden,

	/// `init_password` called after the password was already set
	#[error("password already initialized")]
	PasswordAlreadyInitialized,

	/// `change_password` called before any password was set
	#[error("password not initialized")]
	PasswordNotInitialized,

	/// Current password did not match during a password change
	#[error("current password does not match")]
	CurrentPasswordMismatch,

	/// Profile creation attempted twice
	#[error("profile already exists")]
	ProfileAlreadyExists,

	/// Point amounts must be strictly positive
	#[error("invalid point amount: {0}")]
	InvalidPointAmount(i64),

	/// The provider key from the callback is not registered
	#[error("unsupported social provider: {0}")]
	UnsupportedProvider(String),

	/// Provider attributes were missing a required field
	#[error("social profile missing required attribute: {0}")]
	MalformedProfile(&'static str),

	/// Login handle failed validation (empty or too long)
	#[error("invalid login handle: {0}")]
	InvalidHandle(String),

	/// Unresolvable conflict, e.g. handle generation exhausted its retries
	#[error("conflict: {0}")]
	Conflict(String),

	/// Password hashing backend failure
	#[error("hashing error: {0}")]
	Hashing(String),

	/// Storage backend failure
	#[error("storage error: {0}")]
	Storage(String),
}

impl AuthError {
	/// Stable machine-readable error code
	///
	/// # Examples
	///
	/// ```
	/// use mentora_auth::AuthError;
	///
	/// assert_eq!(AuthError::UserNotFound.code(), "USER_NOT_FOUND");
	/// assert_eq!(AuthError::InvalidToken.code(), "INVALID_TOKEN");
	/// ```
	pub fn code(&self) -> &'static str {
		match self {
			AuthError::UserNotFound => "USER_NOT_FOUND",
			AuthError::ProfileNotFound => "PROFILE_NOT_FOUND",
			AuthError::DuplicateHandle(_) => "DUPLICATE_HANDLE",
			AuthError::DuplicateSocialLink => "DUPLICATE_SOCIAL_LINK",
			AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
			AuthError::InvalidToken => "INVALID_TOKEN",
			AuthError::NotActive => "USER_STATUS_NOT_ACTIVE",
			AuthError::Forbidden => "FORBIDDEN",
			AuthError::PasswordAlreadyInitialized => "PASSWORD_ALREADY_INITIALIZED",
			AuthError::PasswordNotInitialized => "PASSWORD_NOT_INITIALIZED",
			AuthError::CurrentPasswordMismatch => "INVALID_CURRENT_PASSWORD",
			AuthError::ProfileAlreadyExists => "PROFILE_ALREADY_EXISTS",
			AuthError::InvalidPointAmount(_) => "INVALID_POINT_AMOUNT",
			AuthError::UnsupportedProvider(_) => "UNSUPPORTED_PROVIDER",
			AuthError::MalformedProfile(_) => "MALFORMED_PROFILE",
			AuthError::InvalidHandle(_) => "INVALID_HANDLE",
			AuthError::Conflict(_) => "CONFLICT",
			AuthError::Hashing(_) => "HASHING_ERROR",
			AuthError::Storage(_) => "STORAGE_ERROR",
		}
	}

	/// HTTP status class for the transport boundary
	///
	/// # Examples
	///
	/// ```
	/// use http::StatusCode;
	/// use mentora_auth::AuthError;
	///
	/// assert_eq!(AuthError::UserNotFound.status(), StatusCode::NOT_FOUND);
	/// assert_eq!(
	/// 	AuthError::DuplicateHandle("alice".into()).status(),
	/// 	StatusCode::CONFLICT
	/// );
	/// ```
	pub fn status(&self) -> StatusCode {
		match self {
			AuthError::UserNotFound | AuthError::ProfileNotFound => StatusCode::NOT_FOUND,
			AuthError::DuplicateHandle(_)
			| AuthError::DuplicateSocialLink
			| AuthError::Conflict(_) => StatusCode::CONFLICT,
			AuthError::InvalidCredentials | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
			AuthError::NotActive | AuthError::Forbidden => StatusCode::FORBIDDEN,
			AuthError::PasswordAlreadyInitialized
			| AuthError::PasswordNotInitialized
			| AuthError::CurrentPasswordMismatch
			| AuthError::ProfileAlreadyExists
			| AuthError::InvalidPointAmount(_)
			| AuthError::UnsupportedProvider(_)
			| AuthError::MalformedProfile(_)
			| AuthError::InvalidHandle(_) => StatusCode::BAD_REQUEST,
			AuthError::Hashing(_) | AuthError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

/// Crate-wide result alias
pub type AuthResult<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_classes() {
		assert_eq!(AuthError::UserNotFound.status().as_u16(), 404);
		assert_eq!(AuthError::InvalidToken.status().as_u16(), 401);
		assert_eq!(AuthError::Forbidden.status().as_u16(), 403);
		assert_eq!(AuthError::PasswordNotInitialized.status().as_u16(), 400);
		assert_eq!(AuthError::DuplicateSocialLink.status().as_u16(), 409);
		assert_eq!(AuthError::Storage("down".into()).status().as_u16(), 500);
	}

	#[test]
	fn test_codes_are_screaming_snake() {
		let errors = [
			AuthError::UserNotFound,
			AuthError::DuplicateHandle("x".into()),
			AuthError::InvalidPointAmount(-1),
			AuthError::UnsupportedProvider("github".into()),
		];
		for error in errors {
			let code = error.code();
			assert!(!code.is_empty());
			assert!(
				code.chars().all(|c| c.is_ascii_uppercase() || c == '_'),
				"unexpected code format: {code}"
			);
		}
	}

	#[test]
	fn test_display_does_not_leak_credential_detail() {
		// Unknown handle and wrong password must render identically.
		assert_eq!(
			AuthError::InvalidCredentials.to_string(),
			"invalid credentials"
		);
	}
}
