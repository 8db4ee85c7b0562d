//! User aggregate and its value objects
//!
//! One [`User`] represents one account, whether it was created by local
//! signup or by a first social login. Social accounts are value objects owned
//! by the user; they have no independent lifecycle. Mutation happens through
//! explicit command methods; persistence is an explicit
//! [`crate::store::UserStore::save`] call, never a side effect.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::social::SocialProvider;

/// Maximum length of a login handle
pub const MAX_HANDLE_LEN: usize = 25;

/// Opaque user identifier (UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
	/// Generate a fresh identifier
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Default for UserId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for UserId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

impl FromStr for UserId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
	User,
	Advisor,
	Manager,
	Master,
}

impl UserRole {
	/// Role name as carried in token claims
	pub fn as_str(&self) -> &'static str {
		match self {
			UserRole::User => "USER",
			UserRole::Advisor => "ADVISOR",
			UserRole::Manager => "MANAGER",
			UserRole::Master => "MASTER",
		}
	}

	/// Whether this role may review and approve advisor applications
	pub fn can_approve_advisors(&self) -> bool {
		matches!(self, UserRole::Manager | UserRole::Master)
	}
}

impl FromStr for UserRole {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"USER" => Ok(UserRole::User),
			"ADVISOR" => Ok(UserRole::Advisor),
			"MANAGER" => Ok(UserRole::Manager),
			"MASTER" => Ok(UserRole::Master),
			_ => Err(()),
		}
	}
}

/// Account lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
	Active,
	Inactive,
	Blocked,
	Deleted,
}

/// Advisor-promotion review status
///
/// Happy path is monotonic: NotRequested -> Pending -> Approved. Rejected is
/// the terminal alternative to Approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdvisorStatus {
	NotRequested,
	Pending,
	Approved,
	Rejected,
}

/// Social account link value object
///
/// Identity is `(provider, provider_user_id)`; `email` is informational only
/// and excluded from equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialAccount {
	pub provider: SocialProvider,
	pub provider_user_id: String,
	pub email: Option<String>,
}

impl SocialAccount {
	pub fn new(
		provider: SocialProvider,
		provider_user_id: impl Into<String>,
		email: Option<String>,
	) -> Self {
		Self {
			provider,
			provider_user_id: provider_user_id.into(),
			email,
		}
	}
}

impl PartialEq for SocialAccount {
	fn eq(&self, other: &Self) -> bool {
		self.provider == other.provider && self.provider_user_id == other.provider_user_id
	}
}

impl Eq for SocialAccount {}

impl Hash for SocialAccount {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.provider.hash(state);
		self.provider_user_id.hash(state);
	}
}

/// Advisor-facing profile, embedded in the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Main advisory category, e.g. "stocks" or "real estate"
	pub main_category: Option<String>,
	/// Short self-introduction
	pub intro: Option<String>,
	/// Years of professional experience
	pub career_years: Option<u16>,
	/// Whether the profile is publicly listed
	pub active: bool,
}

/// The user aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
	/// Immutable identifier
	pub id: UserId,
	/// Unique login handle, user-chosen or generated `<provider>_<random6>`
	pub handle: String,
	/// Argon2 hash; unusable random hash for social-only accounts
	pub password_hash: String,
	/// True once a human has set a password they know
	pub password_initialized: bool,
	/// Human-facing display name
	pub display_name: String,
	/// Contact handle used by advisors (Slack-style), optional
	pub contact_id: Option<String>,
	pub role: UserRole,
	pub status: AccountStatus,
	pub advisor_status: AdvisorStatus,
	pub social_accounts: HashSet<SocialAccount>,
	/// Non-negative point accumulator
	pub points: u64,
	pub profile: Option<UserProfile>,
	/// Soft-delete marker; set rows are excluded from every lookup
	pub deleted_at: Option<DateTime<Utc>>,
	/// Optimistic-concurrency token, bumped by the store on each save
	pub version: u64,
}

impl User {
	/// Local signup: the human chose handle and password
	///
	/// # Examples
	///
	/// ```
	/// use mentora_auth::user::{AdvisorStatus, User, UserRole};
	///
	/// let user = User::new_local("alice", "$argon2...", "Alice", None).unwrap();
	/// assert_eq!(user.role, UserRole::User);
	/// assert_eq!(user.advisor_status, AdvisorStatus::NotRequested);
	/// assert!(user.password_initialized);
	/// ```
	pub fn new_local(
		handle: impl Into<String>,
		password_hash: impl Into<String>,
		display_name: impl Into<String>,
		contact_id: Option<String>,
	) -> AuthResult<Self> {
		let handle = handle.into();
		Self::validate_handle(&handle)?;

		Ok(Self {
			id: UserId::new(),
			handle,
			password_hash: password_hash.into(),
			password_initialized: true,
			display_name: display_name.into(),
			contact_id,
			role: UserRole::User,
			status: AccountStatus::Active,
			advisor_status: AdvisorStatus::NotRequested,
			social_accounts: HashSet::new(),
			points: 0,
			profile: None,
			deleted_at: None,
			version: 0,
		})
	}

	/// First social login: handle is generated, password is unusable
	pub fn new_social(
		generated_handle: impl Into<String>,
		unusable_password_hash: impl Into<String>,
		display_name: impl Into<String>,
		social_account: SocialAccount,
	) -> AuthResult<Self> {
		let mut user = Self::new_local(
			generated_handle,
			unusable_password_hash,
			display_name,
			None,
		)?;
		user.password_initialized = false;
		user.social_accounts.insert(social_account);
		Ok(user)
	}

	fn validate_handle(handle: &str) -> AuthResult<()> {
		if handle.is_empty() || handle.chars().count() > MAX_HANDLE_LEN {
			return Err(AuthError::InvalidHandle(handle.to_string()));
		}
		Ok(())
	}

	/// Link an additional social account
	pub fn add_social_account(&mut self, account: SocialAccount) {
		self.social_accounts.insert(account);
	}

	/// Unlink a social account
	pub fn remove_social_account(&mut self, account: &SocialAccount) {
		self.social_accounts.remove(account);
	}

	/// Whether the user owns the given social link
	pub fn has_social_account(&self, provider: SocialProvider, provider_user_id: &str) -> bool {
		self.social_accounts
			.iter()
			.any(|a| a.provider == provider && a.provider_user_id == provider_user_id)
	}

	/// First-time password setup; one-way transition
	pub fn init_password(&mut self, encoded: impl Into<String>) -> AuthResult<()> {
		if self.password_initialized {
			return Err(AuthError::PasswordAlreadyInitialized);
		}
		self.password_hash = encoded.into();
		self.password_initialized = true;
		Ok(())
	}

	/// Replace the stored hash; caller has already verified the current one
	pub fn change_password(&mut self, encoded: impl Into<String>) {
		self.password_hash = encoded.into();
	}

	/// Promote to advisor: status and role flip together, never apart
	pub fn promote_to_advisor(&mut self) {
		self.advisor_status = AdvisorStatus::Approved;
		self.role = UserRole::Advisor;
	}

	/// Add points; amount must be strictly positive
	pub fn add_points(&mut self, amount: i64) -> AuthResult<u64> {
		if amount <= 0 {
			return Err(AuthError::InvalidPointAmount(amount));
		}
		self.points = self.points.saturating_add(amount as u64);
		Ok(self.points)
	}

	/// Create the advisor profile; fails if one already exists
	pub fn create_profile(&mut self, profile: UserProfile) -> AuthResult<()> {
		if self.profile.is_some() {
			return Err(AuthError::ProfileAlreadyExists);
		}
		self.profile = Some(profile);
		Ok(())
	}

	/// Replace the advisor profile; fails if none exists yet
	pub fn update_profile(&mut self, profile: UserProfile) -> AuthResult<()> {
		if self.profile.is_none() {
			return Err(AuthError::ProfileNotFound);
		}
		self.profile = Some(profile);
		Ok(())
	}

	/// Hide the profile from listings without deleting it
	pub fn deactivate_profile(&mut self) -> AuthResult<()> {
		match self.profile.as_mut() {
			Some(profile) => {
				profile.active = false;
				Ok(())
			}
			None => Err(AuthError::ProfileNotFound),
		}
	}

	/// Update display name and contact handle
	pub fn update_basic_info(&mut self, display_name: impl Into<String>, contact_id: Option<String>) {
		self.display_name = display_name.into();
		self.contact_id = contact_id;
	}

	/// Soft delete: the row survives but disappears from lookups
	pub fn mark_deleted(&mut self) {
		self.status = AccountStatus::Deleted;
		self.deleted_at = Some(Utc::now());
	}

	/// Whether the row should be visible to lookups
	pub fn is_visible(&self) -> bool {
		self.deleted_at.is_none() && self.status != AccountStatus::Deleted
	}

	/// Role list as carried in token claims
	pub fn role_names(&self) -> Vec<String> {
		vec![self.role.as_str().to_string()]
	}

	/// Email carried in token claims, taken from the linked social accounts.
	/// Local accounts without a link have none.
	pub fn primary_email(&self) -> Option<String> {
		self.social_accounts
			.iter()
			.find_map(|account| account.email.clone())
	}
}
