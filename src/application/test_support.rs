//! Test doubles for the store and notifier collaborators.

use crate::domain::{
    NewSubmission, Notifier, StoreError, StoreResult, StoredSubmission, SubmissionStatus,
    SubmissionStore,
};
use crate::infrastructure::InMemoryStore;
use std::cell::Cell;
use std::io;

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub successes: Vec<String>,
    pub errors: Vec<String>,
}

impl Notifier for RecordingNotifier {
    fn notify_success(&mut self, message: &str) {
        self.successes.push(message.to_string());
    }

    fn notify_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

/// In-memory store that counts calls and can be switched into failure mode.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: InMemoryStore,
    inserted: Vec<NewSubmission>,
    selects: Cell<usize>,
    status_updates: usize,
    failing: bool,
}

impl RecordingStore {
    pub fn failing() -> Self {
        Self { failing: true, ..Self::default() }
    }

    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    pub fn insert_count(&self) -> usize {
        self.inserted.len()
    }

    pub fn inserted(&self) -> &[NewSubmission] {
        &self.inserted
    }

    pub fn select_count(&self) -> usize {
        self.selects.get()
    }

    pub fn status_update_count(&self) -> usize {
        self.status_updates
    }

    fn check(&self) -> StoreResult<()> {
        if self.failing {
            Err(StoreError::Io(io::Error::other("backend unavailable")))
        } else {
            Ok(())
        }
    }
}

impl SubmissionStore for RecordingStore {
    fn insert(&mut self, submission: &NewSubmission) -> StoreResult<StoredSubmission> {
        self.inserted.push(submission.clone());
        self.check()?;
        self.inner.insert(submission)
    }

    fn select_all(&self) -> StoreResult<Vec<StoredSubmission>> {
        self.selects.set(self.selects.get() + 1);
        self.check()?;
        self.inner.select_all()
    }

    fn select_by_owner(&self, owner_id: &str) -> StoreResult<Vec<StoredSubmission>> {
        self.selects.set(self.selects.get() + 1);
        self.check()?;
        self.inner.select_by_owner(owner_id)
    }

    fn update_status(&mut self, id: &str, status: SubmissionStatus) -> StoreResult<()> {
        self.status_updates += 1;
        self.check()?;
        self.inner.update_status(id, status)
    }
}
