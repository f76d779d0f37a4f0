use crate::domain::{
    NewSubmission, StoreError, StoreResult, StoredSubmission, SubmissionStatus, SubmissionStore,
};
use chrono::Utc;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    // Insertion order; reads sort newest-first.
    records: Vec<StoredSubmission>,
}

impl InMemoryStore {
    pub fn with_records(records: Vec<StoredSubmission>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn newest_first<'a>(
        records: impl DoubleEndedIterator<Item = &'a StoredSubmission>,
    ) -> Vec<StoredSubmission> {
        let mut sorted: Vec<StoredSubmission> = records.rev().cloned().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted
    }
}

impl SubmissionStore for InMemoryStore {
    fn insert(&mut self, submission: &NewSubmission) -> StoreResult<StoredSubmission> {
        let stored = StoredSubmission::from_new(
            Uuid::new_v4().to_string(),
            submission.clone(),
            Utc::now(),
        );
        self.records.push(stored.clone());
        Ok(stored)
    }

    fn select_all(&self) -> StoreResult<Vec<StoredSubmission>> {
        Ok(Self::newest_first(self.records.iter()))
    }

    fn select_by_owner(&self, owner_id: &str) -> StoreResult<Vec<StoredSubmission>> {
        Ok(Self::newest_first(
            self.records.iter().filter(|r| r.owner_id.as_deref() == Some(owner_id)),
        ))
    }

    fn update_status(&mut self, id: &str, status: SubmissionStatus) -> StoreResult<()> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.status = status;
        Ok(())
    }
}

/// Submissions kept in a single pretty-printed JSON file.
///
/// The whole file is rewritten after every mutation. A failed write rolls
/// the in-memory copy back so memory and disk never disagree.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: InMemoryStore,
}

impl JsonFileStore {
    /// Opens `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let records = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => serde_json::from_str::<Vec<StoredSubmission>>(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, inner: InMemoryStore::with_records(records) })
    }

    /// Writes to a temporary file beside the target, then renames it over
    /// the target so a torn write never replaces the previous contents.
    fn save(&self) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(&self.inner.records)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(json.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl SubmissionStore for JsonFileStore {
    fn insert(&mut self, submission: &NewSubmission) -> StoreResult<StoredSubmission> {
        let stored = self.inner.insert(submission)?;
        if let Err(e) = self.save() {
            self.inner.records.pop();
            return Err(e);
        }
        Ok(stored)
    }

    fn select_all(&self) -> StoreResult<Vec<StoredSubmission>> {
        self.inner.select_all()
    }

    fn select_by_owner(&self, owner_id: &str) -> StoreResult<Vec<StoredSubmission>> {
        self.inner.select_by_owner(owner_id)
    }

    fn update_status(&mut self, id: &str, status: SubmissionStatus) -> StoreResult<()> {
        let previous = self
            .inner
            .records
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.status)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.inner.update_status(id, status)?;
        if let Err(e) = self.save() {
            self.inner.update_status(id, previous)?;
            return Err(e);
        }
        Ok(())
    }
}
