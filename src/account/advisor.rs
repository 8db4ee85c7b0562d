//! Advisor-promotion state machine
//!
//! Users apply, privileged reviewers approve. Application never moves a
//! record out of `Pending`; only approval does, and approval flips
//! `advisor_status` and `role` together so a promoted user is never half
//! promoted. Every branch reports a fixed outcome message; repeated calls
//! land in the corresponding no-op branch.

use std::sync::Arc;

use tracing::info;

use crate::error::{AuthError, AuthResult};
use crate::store::{StoreError, UserStore};
use crate::user::{AdvisorStatus, User, UserId};

const MAX_TRANSITION_ATTEMPTS: usize = 3;

/// Result of an advisor-application or approval call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisorOutcome {
	/// Application recorded, now pending review
	Accepted,
	/// Application was already pending
	AlreadyPending,
	/// Application had already been approved
	AlreadyApproved,
	/// Application was rejected; this operation does not reopen it
	AlreadyRejected,
	/// Approval promoted the user to advisor
	Promoted,
	/// Approval found an already-promoted advisor
	AlreadyAdvisor,
}

impl AdvisorOutcome {
	/// Fixed human-facing message for each branch
	pub fn message(&self) -> &'static str {
		match self {
			AdvisorOutcome::Accepted => "Advisor application received.",
			AdvisorOutcome::AlreadyPending => "Application is already pending.",
			AdvisorOutcome::AlreadyApproved => "Application has already been approved.",
			AdvisorOutcome::AlreadyRejected => "Application has been rejected.",
			AdvisorOutcome::Promoted => "User has been promoted to advisor.",
			AdvisorOutcome::AlreadyAdvisor => "User is already an approved advisor.",
		}
	}
}

pub struct AdvisorManager {
	store: Arc<dyn UserStore>,
}

impl AdvisorManager {
	pub fn new(store: Arc<dyn UserStore>) -> Self {
		Self { store }
	}

	/// A user applies for advisor status.
	///
	/// Only `NotRequested` moves (to `Pending`); every other state reports
	/// its no-op branch without touching the row. `Rejected` is terminal
	/// through this operation.
	pub async fn apply(&self, user_id: UserId) -> AuthResult<AdvisorOutcome> {
		for _ in 0..MAX_TRANSITION_ATTEMPTS {
			let mut user = self.load(user_id).await?;
			match user.advisor_status {
				AdvisorStatus::NotRequested => {}
				AdvisorStatus::Pending => return Ok(AdvisorOutcome::AlreadyPending),
				AdvisorStatus::Approved => return Ok(AdvisorOutcome::AlreadyApproved),
				AdvisorStatus::Rejected => return Ok(AdvisorOutcome::AlreadyRejected),
			}
			user.advisor_status = AdvisorStatus::Pending;
			match self.store.save(&user).await {
				Ok(saved) => {
					info!(handle = %saved.handle, "advisor application received");
					return Ok(AdvisorOutcome::Accepted);
				}
				Err(StoreError::VersionConflict(_)) => continue,
				Err(err) => return Err(err.into()),
			}
		}
		Err(AuthError::Conflict(format!("concurrent update on user {user_id}")))
	}

	/// A privileged reviewer promotes a candidate.
	///
	/// Gated on the caller's role. Approval of an already-approved candidate
	/// is an idempotent no-op; under concurrent approvals the save conflict
	/// makes the losers re-read and short-circuit to that branch.
	pub async fn approve(&self, approver: &User, candidate_id: UserId) -> AuthResult<AdvisorOutcome> {
		if !approver.role.can_approve_advisors() {
			return Err(AuthError::Forbidden);
		}
		for _ in 0..MAX_TRANSITION_ATTEMPTS {
			let mut candidate = self.load(candidate_id).await?;
			if candidate.advisor_status == AdvisorStatus::Approved {
				return Ok(AdvisorOutcome::AlreadyAdvisor);
			}
			candidate.promote_to_advisor();
			match self.store.save(&candidate).await {
				Ok(saved) => {
					info!(
						handle = %saved.handle,
						approver = %approver.handle,
						"user promoted to advisor"
					);
					return Ok(AdvisorOutcome::Promoted);
				}
				Err(StoreError::VersionConflict(_)) => continue,
				Err(err) => return Err(err.into()),
			}
		}
		Err(AuthError::Conflict(format!(
			"concurrent update on user {candidate_id}"
		)))
	}

	async fn load(&self, id: UserId) -> AuthResult<User> {
		self.store
			.find_by_id(id)
			.await?
			.ok_or(AuthError::UserNotFound)
	}

	/// Applications awaiting review
	pub async fn pending_candidates(&self) -> AuthResult<Vec<User>> {
		Ok(self
			.store
			.find_by_advisor_status(AdvisorStatus::Pending)
			.await?)
	}
}
