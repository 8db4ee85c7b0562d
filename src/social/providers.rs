//! Per-provider profile normalization
//!
//! Every provider returns a differently-shaped attribute document from its
//! userinfo endpoint. Normalization is a registry of pure functions selected
//! by [`SocialProvider`]; no provider objects, no dynamic dispatch. Missing
//! optional fields (email, nickname) degrade to documented placeholders; a
//! missing stable identifier is a hard error.

use serde_json::{Map, Value};

use crate::error::{AuthError, AuthResult};
use crate::social::{SocialProfile, SocialProvider};

/// Raw attribute map as produced by a provider's userinfo endpoint
pub type RawAttributes = Map<String, Value>;

/// Fallback nickname when Google omits `name`
pub const GOOGLE_NICKNAME_PLACEHOLDER: &str = "Google User";
/// Fallback nickname when Kakao omits `kakao_account.profile.nickname`
pub const KAKAO_NICKNAME_PLACEHOLDER: &str = "Kakao User";
/// Fallback nickname when Naver omits `response.nickname`
pub const NAVER_NICKNAME_PLACEHOLDER: &str = "Naver User";

/// Normalize raw provider attributes into a [`SocialProfile`]
///
/// # Examples
///
/// ```
/// use mentora_auth::social::{providers, SocialProvider};
/// use serde_json::json;
///
/// let attributes = json!({
/// 	"sub": "108692",
/// 	"email": "a@example.com",
/// 	"name": "Alice",
/// });
/// let profile = providers::normalize(
/// 	SocialProvider::Google,
/// 	attributes.as_object().unwrap(),
/// ).unwrap();
///
/// assert_eq!(profile.provider_user_id, "108692");
/// assert_eq!(profile.nickname, "Alice");
/// ```
pub fn normalize(provider: SocialProvider, attributes: &RawAttributes) -> AuthResult<SocialProfile> {
	match provider {
		SocialProvider::Google => normalize_google(attributes),
		SocialProvider::Kakao => normalize_kakao(attributes),
		SocialProvider::Naver => normalize_naver(attributes),
	}
}

/// Google OIDC userinfo: flat document keyed by `sub` / `email` / `name`
fn normalize_google(attributes: &RawAttributes) -> AuthResult<SocialProfile> {
	let provider_user_id = attributes
		.get("sub")
		.and_then(Value::as_str)
		.ok_or(AuthError::MalformedProfile("sub"))?
		.to_string();

	let email = attributes
		.get("email")
		.and_then(Value::as_str)
		.map(str::to_string);

	let nickname = attributes
		.get("name")
		.and_then(Value::as_str)
		.unwrap_or(GOOGLE_NICKNAME_PLACEHOLDER)
		.to_string();

	Ok(SocialProfile {
		provider: SocialProvider::Google,
		provider_user_id,
		email,
		nickname,
	})
}

/// Kakao: numeric top-level `id`, nested `kakao_account.{email,profile.nickname}`
fn normalize_kakao(attributes: &RawAttributes) -> AuthResult<SocialProfile> {
	// Kakao sends the id as a JSON number; tolerate a string as well.
	let provider_user_id = match attributes.get("id") {
		Some(Value::Number(n)) => n.to_string(),
		Some(Value::String(s)) => s.clone(),
		_ => return Err(AuthError::MalformedProfile("id")),
	};

	let account = attributes.get("kakao_account").and_then(Value::as_object);

	let email = account
		.and_then(|a| a.get("email"))
		.and_then(Value::as_str)
		.map(str::to_string);

	let nickname = account
		.and_then(|a| a.get("profile"))
		.and_then(Value::as_object)
		.and_then(|p| p.get("nickname"))
		.and_then(Value::as_str)
		.unwrap_or(KAKAO_NICKNAME_PLACEHOLDER)
		.to_string();

	Ok(SocialProfile {
		provider: SocialProvider::Kakao,
		provider_user_id,
		email,
		nickname,
	})
}

/// Naver: everything lives under a `response` envelope
fn normalize_naver(attributes: &RawAttributes) -> AuthResult<SocialProfile> {
	let response = attributes
		.get("response")
		.and_then(Value::as_object)
		.ok_or(AuthError::MalformedProfile("response"))?;

	let provider_user_id = response
		.get("id")
		.and_then(Value::as_str)
		.ok_or(AuthError::MalformedProfile("response.id"))?
		.to_string();

	let email = response
		.get("email")
		.and_then(Value::as_str)
		.map(str::to_string);

	let nickname = response
		.get("nickname")
		.and_then(Value::as_str)
		.unwrap_or(NAVER_NICKNAME_PLACEHOLDER)
		.to_string();

	Ok(SocialProfile {
		provider: SocialProvider::Naver,
		provider_user_id,
		email,
		nickname,
	})
}
