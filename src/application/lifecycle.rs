//! Submission lifecycle management and the per-view submission lists.
//!
//! Status moves freely between the five recognized values; the only gate is
//! authorization, which is checked before the store is ever touched.

use crate::domain::{
    Identity, LifecycleError, Notifier, StatusFilter, StoreError, StoredSubmission,
    SubmissionFilter, SubmissionStats, SubmissionStatus, SubmissionStore,
};
use tracing::{debug, info, warn};

/// Authorization-checked access to persisted submissions.
///
/// # Examples
///
/// ```
/// use reinstate::application::SubmissionLifecycle;
/// use reinstate::domain::{Identity, LifecycleError};
/// use reinstate::infrastructure::InMemoryStore;
///
/// let store = InMemoryStore::default();
/// let lifecycle = SubmissionLifecycle::new(Some(Identity::user("u1")));
/// assert!(matches!(lifecycle.list_all(&store), Err(LifecycleError::Forbidden)));
/// assert!(lifecycle.list_for_owner(&store, "u1").unwrap().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct SubmissionLifecycle {
    identity: Option<Identity>,
}

impl SubmissionLifecycle {
    pub fn new(identity: Option<Identity>) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        self.identity.as_ref().is_some_and(|identity| identity.is_admin)
    }

    fn require_identity(&self) -> Result<&Identity, LifecycleError> {
        self.identity.as_ref().ok_or(LifecycleError::Unauthenticated)
    }

    fn require_admin(&self) -> Result<&Identity, LifecycleError> {
        let identity = self.require_identity()?;
        if identity.is_admin {
            Ok(identity)
        } else {
            Err(LifecycleError::Forbidden)
        }
    }

    /// Every submission, newest first. Admin only.
    pub fn list_all(
        &self,
        store: &dyn SubmissionStore,
    ) -> Result<Vec<StoredSubmission>, LifecycleError> {
        self.require_admin()?;
        Ok(store.select_all()?)
    }

    /// The caller's own submissions, newest first.
    ///
    /// Any authenticated caller may list their own records and nobody
    /// else's, admins included.
    pub fn list_for_owner(
        &self,
        store: &dyn SubmissionStore,
        owner_id: &str,
    ) -> Result<Vec<StoredSubmission>, LifecycleError> {
        let identity = self.require_identity()?;
        if identity.id != owner_id {
            return Err(LifecycleError::Forbidden);
        }
        let mut submissions = store.select_by_owner(owner_id)?;
        submissions.retain(|s| s.owner_id.as_deref() == Some(owner_id));
        Ok(submissions)
    }

    /// Writes a new status and returns the record as it now stands. Admin only.
    pub fn set_status(
        &self,
        store: &mut dyn SubmissionStore,
        current: &StoredSubmission,
        status: SubmissionStatus,
    ) -> Result<StoredSubmission, LifecycleError> {
        self.require_admin()?;
        store.update_status(&current.id, status)?;
        Ok(StoredSubmission { status, ..current.clone() })
    }
}

/// Which records a board shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardScope {
    /// Every submission; the admin view.
    All,
    /// The signed-in caller's own submissions; the dashboard.
    Owner,
}

/// A view's private copy of the submission list.
///
/// Local changes are applied only after the store confirms them. Two boards
/// never see each other's changes until they refresh.
#[derive(Debug, Clone)]
pub struct SubmissionBoard {
    scope: BoardScope,
    records: Vec<StoredSubmission>,
    pub filter: SubmissionFilter,
    selected: usize,
    loaded: bool,
}

impl SubmissionBoard {
    pub fn new(scope: BoardScope) -> Self {
        Self {
            scope,
            records: Vec::new(),
            filter: SubmissionFilter::default(),
            selected: 0,
            loaded: false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn records(&self) -> &[StoredSubmission] {
        &self.records
    }

    /// Re-fetches the list for this board's scope.
    ///
    /// Store failures are reported through `notifier` and keep the previous
    /// list. Authorization failures are returned without notifying so the
    /// caller can redirect.
    pub fn refresh(
        &mut self,
        lifecycle: &SubmissionLifecycle,
        store: &dyn SubmissionStore,
        notifier: &mut dyn Notifier,
    ) -> Result<(), LifecycleError> {
        let result = match self.scope {
            BoardScope::All => lifecycle.list_all(store),
            BoardScope::Owner => match lifecycle.identity() {
                Some(identity) => lifecycle.list_for_owner(store, &identity.id),
                None => Err(LifecycleError::Unauthenticated),
            },
        };

        match result {
            Ok(records) => {
                debug!(scope = ?self.scope, count = records.len(), "submissions refreshed");
                self.records = records;
                self.loaded = true;
                self.clamp_selection();
                Ok(())
            }
            Err(error) => {
                if error.is_authorization() {
                    warn!(scope = ?self.scope, %error, "submission listing denied");
                } else {
                    warn!(scope = ?self.scope, %error, "failed to load submissions");
                    notifier.notify_error("Failed to load submissions");
                }
                Err(error)
            }
        }
    }

    /// Changes the status of the record with `id`.
    pub fn set_status(
        &mut self,
        lifecycle: &SubmissionLifecycle,
        store: &mut dyn SubmissionStore,
        notifier: &mut dyn Notifier,
        id: &str,
        status: SubmissionStatus,
    ) -> Result<(), LifecycleError> {
        let result = match self.records.iter().position(|r| r.id == id) {
            Some(index) => lifecycle
                .set_status(store, &self.records[index], status)
                .map(|updated| (index, updated)),
            None => Err(LifecycleError::Store(StoreError::NotFound(id.to_string()))),
        };

        match result {
            Ok((index, updated)) => {
                info!(submission_id = %id, status = %status, "submission status updated");
                self.records[index] = updated;
                self.clamp_selection();
                notifier.notify_success("Status updated successfully");
                Ok(())
            }
            Err(error) => {
                warn!(submission_id = %id, %error, "failed to update status");
                if !error.is_authorization() {
                    notifier.notify_error("Failed to update status");
                }
                Err(error)
            }
        }
    }

    /// Changes the status of the currently selected visible record.
    pub fn set_selected_status(
        &mut self,
        lifecycle: &SubmissionLifecycle,
        store: &mut dyn SubmissionStore,
        notifier: &mut dyn Notifier,
        status: SubmissionStatus,
    ) -> Result<(), LifecycleError> {
        match self.selected().map(|record| record.id.clone()) {
            Some(id) => self.set_status(lifecycle, store, notifier, &id, status),
            None => Ok(()),
        }
    }

    /// Records passing the current filter, newest first.
    pub fn visible(&self) -> Vec<&StoredSubmission> {
        self.filter.apply(&self.records)
    }

    pub fn stats(&self) -> SubmissionStats {
        SubmissionStats::from_submissions(&self.records)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&StoredSubmission> {
        self.visible().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.visible().len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter.text.push(c);
        self.clamp_selection();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter.text.pop();
        self.clamp_selection();
    }

    pub fn cycle_status_filter(&mut self) {
        self.filter.status = self.filter.status.cycle();
        self.clamp_selection();
    }

    pub fn clear_filter(&mut self) {
        self.filter = SubmissionFilter { text: String::new(), status: StatusFilter::All };
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let visible = self.visible().len();
        if self.selected >= visible {
            self.selected = visible.saturating_sub(1);
        }
    }
}
