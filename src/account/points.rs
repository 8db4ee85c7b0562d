//! Point accumulation
//!
//! The earning events themselves arrive from outside; this manager only
//! applies validated amounts to the accumulator. No upper bound; the
//! ledger lives elsewhere.

use std::sync::Arc;

use tracing::debug;

use crate::account::mutate_user;
use crate::error::AuthResult;
use crate::store::UserStore;
use crate::user::UserId;

pub struct PointsManager {
	store: Arc<dyn UserStore>,
}

impl PointsManager {
	pub fn new(store: Arc<dyn UserStore>) -> Self {
		Self { store }
	}

	/// Credit points; `amount <= 0` is rejected. Returns the new total.
	pub async fn add_points(&self, user_id: UserId, amount: i64) -> AuthResult<u64> {
		let (user, total) =
			mutate_user(self.store.as_ref(), user_id, |user| user.add_points(amount)).await?;
		debug!(handle = %user.handle, amount, total, "points credited");
		Ok(total)
	}
}
