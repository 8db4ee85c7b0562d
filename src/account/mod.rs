//! Account state machines over the user store
//!
//! Each manager loads the current user row, applies one transition, and
//! saves. Saves race through the store's optimistic versioning; a conflict
//! means another request won, so the manager re-reads and re-applies against
//! the fresh state a bounded number of times. That retry is what makes the
//! no-op branches of the state machines converge under concurrency.

pub mod advisor;
pub mod password;
pub mod points;
pub mod profile;

use crate::error::{AuthError, AuthResult};
use crate::store::{StoreError, UserStore};
use crate::user::{User, UserId};

const MAX_SAVE_ATTEMPTS: usize = 3;

/// Load-mutate-save with bounded optimistic retry.
///
/// `apply` runs against the freshest snapshot on every attempt, so it must
/// re-derive its decision from the user it is given rather than from state
/// captured outside.
pub(crate) async fn mutate_user<T>(
	store: &dyn UserStore,
	id: UserId,
	mut apply: impl FnMut(&mut User) -> AuthResult<T> + Send,
) -> AuthResult<(User, T)> {
	for _ in 0..MAX_SAVE_ATTEMPTS {
		let mut user = store.find_by_id(id).await?.ok_or(AuthError::UserNotFound)?;
		let outcome = apply(&mut user)?;
		match store.save(&user).await {
			Ok(saved) => return Ok((saved, outcome)),
			Err(StoreError::VersionConflict(_)) => continue,
			Err(err) => return Err(err.into()),
		}
	}
	Err(AuthError::Conflict(format!("concurrent update on user {id}")))
}
