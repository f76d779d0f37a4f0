//! Contracts for the collaborators the intake core talks to.
//!
//! The wizard and the lifecycle manager only ever see these traits, so the
//! terminal front end, the tests and any backend can be swapped freely.

use super::errors::StoreResult;
use super::models::{Identity, NewSubmission, StoredSubmission, SubmissionStatus};

/// Durable home of submission records.
///
/// Both select operations return records newest-first by `created_at`.
/// Status updates are last-write-wins; there is no concurrency token.
pub trait SubmissionStore {
    /// Inserts a new record. The store assigns `id`, `created_at` and the
    /// initial `pending` status.
    fn insert(&mut self, submission: &NewSubmission) -> StoreResult<StoredSubmission>;

    fn select_all(&self) -> StoreResult<Vec<StoredSubmission>>;

    fn select_by_owner(&self, owner_id: &str) -> StoreResult<Vec<StoredSubmission>>;

    fn update_status(&mut self, id: &str, status: SubmissionStatus) -> StoreResult<()>;
}

pub trait IdentityProvider {
    fn current_identity(&self) -> Option<Identity>;
}

/// Transient user-facing messages. Fire-and-forget.
pub trait Notifier {
    fn notify_success(&mut self, message: &str);
    fn notify_error(&mut self, message: &str);
}
