//! Read-side services over fetched submission lists.
//!
//! Filtering, counting and exporting all operate on a list that has already
//! been fetched from the store; none of them issue a second query.

use super::models::{StoredSubmission, SubmissionStatus};
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Exact-match status filter used by the admin list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(SubmissionStatus),
}

impl StatusFilter {
    pub fn matches(self, status: SubmissionStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }

    /// Next filter in the order `all, pending, quoted, contacted, converted, expired`.
    pub fn cycle(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Only(SubmissionStatus::ALL[0]),
            StatusFilter::Only(status) => {
                let index = SubmissionStatus::ALL.iter().position(|s| *s == status).unwrap_or(0);
                SubmissionStatus::ALL
                    .get(index + 1)
                    .map(|next| StatusFilter::Only(*next))
                    .unwrap_or(StatusFilter::All)
            }
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => write!(f, "{status}"),
        }
    }
}

/// Free-text and status filter for the admin list.
///
/// The text matches case-insensitively as a substring of the first name,
/// last name or email. Text and status are combined conjunctively.
///
/// # Examples
///
/// ```
/// use reinstate::domain::{StatusFilter, SubmissionFilter, SubmissionStatus};
///
/// let filter = SubmissionFilter {
///     text: "an".to_string(),
///     status: StatusFilter::All,
/// };
/// assert!(filter.matches_fields("Ann", "Lee", "ann@example.com", SubmissionStatus::Pending));
/// assert!(!filter.matches_fields("Bob", "Ray", "bob@example.com", SubmissionStatus::Quoted));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionFilter {
    pub text: String,
    pub status: StatusFilter,
}

impl SubmissionFilter {
    pub fn is_active(&self) -> bool {
        !self.text.is_empty() || self.status != StatusFilter::All
    }

    pub fn matches(&self, submission: &StoredSubmission) -> bool {
        self.matches_fields(
            &submission.first_name,
            &submission.last_name,
            &submission.email,
            submission.status,
        )
    }

    pub fn matches_fields(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        status: SubmissionStatus,
    ) -> bool {
        let needle = self.text.to_lowercase();
        let matches_text = first_name.to_lowercase().contains(&needle)
            || last_name.to_lowercase().contains(&needle)
            || email.to_lowercase().contains(&needle);
        matches_text && self.status.matches(status)
    }

    /// Returns the matching records in their original order.
    pub fn apply<'a>(&self, submissions: &'a [StoredSubmission]) -> Vec<&'a StoredSubmission> {
        submissions.iter().filter(|s| self.matches(s)).collect()
    }
}

/// Per-status counts shown above the submission lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmissionStats {
    pub total: usize,
    pub pending: usize,
    pub quoted: usize,
    pub contacted: usize,
    pub converted: usize,
    pub expired: usize,
}

impl SubmissionStats {
    pub fn from_submissions(submissions: &[StoredSubmission]) -> Self {
        let mut stats = SubmissionStats { total: submissions.len(), ..Self::default() };
        for submission in submissions {
            match submission.status {
                SubmissionStatus::Pending => stats.pending += 1,
                SubmissionStatus::Quoted => stats.quoted += 1,
                SubmissionStatus::Contacted => stats.contacted += 1,
                SubmissionStatus::Converted => stats.converted += 1,
                SubmissionStatus::Expired => stats.expired += 1,
            }
        }
        stats
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    created_at: String,
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    phone: &'a str,
    zip_code: &'a str,
    state: &'a str,
    violation_type: &'a str,
    coverage_type: &'a str,
    status: &'a str,
}

impl<'a> From<&'a StoredSubmission> for CsvRow<'a> {
    fn from(s: &'a StoredSubmission) -> Self {
        Self {
            id: &s.id,
            created_at: s.created_at.to_rfc3339(),
            first_name: &s.first_name,
            last_name: &s.last_name,
            email: &s.email,
            phone: s.phone.as_deref().unwrap_or(""),
            zip_code: s.zip_code.as_deref().unwrap_or(""),
            state: s.jurisdiction.code(),
            violation_type: s.violation_type.id(),
            coverage_type: s.coverage_type.as_str(),
            status: s.status.as_str(),
        }
    }
}

/// Writes submission lists to CSV for use outside the application.
pub struct CsvExporter;

impl CsvExporter {
    /// Exports the given records, one row each after a header row.
    ///
    /// # Returns
    ///
    /// The number of records written.
    pub fn export_submissions(
        submissions: &[&StoredSubmission],
        path: impl AsRef<Path>,
    ) -> Result<usize, csv::Error> {
        let mut writer = csv::Writer::from_path(path)?;
        for submission in submissions {
            writer.serialize(CsvRow::from(*submission))?;
        }
        writer.flush()?;
        Ok(submissions.len())
    }
}
