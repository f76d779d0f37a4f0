//! The quote intake wizard.
//!
//! Walks a visitor through four gated steps and a terminal confirmation
//! step, holding the draft in memory until it is complete. The draft is
//! handed to the store exactly once per successful flow.

use crate::domain::{
    ContactDetails, CoverageType, DraftSubmission, Identity, Jurisdiction, NewSubmission, Notifier,
    StoreResult, StoredSubmission, SubmissionStore, ViolationType,
};
use tracing::{info, warn};

/// Steps of the intake flow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    Jurisdiction,
    Violation,
    Ownership,
    Contact,
    /// Terminal; nothing leads back out of it.
    Confirmation,
}

impl WizardStep {
    /// Number of steps that gate progress. The confirmation step is not counted.
    pub const GATED_STEPS: u8 = 4;

    pub fn ordinal(self) -> u8 {
        match self {
            WizardStep::Jurisdiction => 1,
            WizardStep::Violation => 2,
            WizardStep::Ownership => 3,
            WizardStep::Contact => 4,
            WizardStep::Confirmation => 5,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Jurisdiction => "Select Your State",
            WizardStep::Violation => "Violation Details",
            WizardStep::Ownership => "Coverage Type",
            WizardStep::Contact => "Your Information",
            WizardStep::Confirmation => "Quote Ready!",
        }
    }

    fn previous(self) -> Option<WizardStep> {
        match self {
            WizardStep::Violation => Some(WizardStep::Jurisdiction),
            WizardStep::Ownership => Some(WizardStep::Violation),
            WizardStep::Contact => Some(WizardStep::Ownership),
            WizardStep::Jurisdiction | WizardStep::Confirmation => None,
        }
    }
}

/// Display fields echoed back once a submission is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub submission_id: String,
    pub email: String,
    pub jurisdiction: Jurisdiction,
    pub coverage_type: CoverageType,
}

impl From<&StoredSubmission> for Confirmation {
    fn from(stored: &StoredSubmission) -> Self {
        Self {
            submission_id: stored.id.clone(),
            email: stored.email.clone(),
            jurisdiction: stored.jurisdiction,
            coverage_type: stored.coverage_type,
        }
    }
}

/// Controller for one pass through the intake flow.
///
/// Every operation is only effective on the step it belongs to; on any
/// other step it is a no-op and returns `false`. Back navigation never
/// clears a previously chosen value.
///
/// # Examples
///
/// ```
/// use reinstate::application::{QuoteWizard, WizardStep};
/// use reinstate::domain::{Jurisdiction, ViolationType};
///
/// let mut wizard = QuoteWizard::new(None);
/// assert!(wizard.select_jurisdiction(Jurisdiction::California));
/// assert_eq!(wizard.step(), WizardStep::Violation);
///
/// // Selecting a violation does not advance on its own.
/// wizard.select_violation(ViolationType::Dui);
/// assert_eq!(wizard.step(), WizardStep::Violation);
/// assert!(wizard.continue_from_violation());
/// assert_eq!(wizard.step(), WizardStep::Ownership);
/// ```
#[derive(Debug, Clone)]
pub struct QuoteWizard {
    step: WizardStep,
    draft: DraftSubmission,
    identity: Option<Identity>,
    submitting: bool,
    confirmation: Option<Confirmation>,
}

impl QuoteWizard {
    /// Creates a wizard on step 1 for the given caller, or an anonymous visitor.
    pub fn new(identity: Option<Identity>) -> Self {
        Self {
            step: WizardStep::Jurisdiction,
            draft: DraftSubmission::default(),
            identity,
            submitting: false,
            confirmation: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &DraftSubmission {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    /// Records the jurisdiction and advances immediately.
    pub fn select_jurisdiction(&mut self, jurisdiction: Jurisdiction) -> bool {
        if self.step != WizardStep::Jurisdiction {
            return false;
        }
        self.draft.jurisdiction = Some(jurisdiction);
        self.step = WizardStep::Violation;
        true
    }

    pub fn select_violation(&mut self, violation: ViolationType) -> bool {
        if self.step != WizardStep::Violation {
            return false;
        }
        self.draft.violation_type = Some(violation);
        true
    }

    pub fn continue_from_violation(&mut self) -> bool {
        if self.step != WizardStep::Violation || self.draft.violation_type.is_none() {
            return false;
        }
        self.step = WizardStep::Ownership;
        true
    }

    pub fn choose_vehicle_ownership(&mut self, owns_vehicle: bool) -> bool {
        if self.step != WizardStep::Ownership {
            return false;
        }
        self.draft.set_vehicle_ownership(owns_vehicle);
        true
    }

    pub fn continue_from_ownership(&mut self) -> bool {
        if self.step != WizardStep::Ownership || self.draft.owns_vehicle().is_none() {
            return false;
        }
        self.step = WizardStep::Contact;
        true
    }

    /// Contact fields are only editable on the contact step.
    pub fn contact_mut(&mut self) -> Option<&mut ContactDetails> {
        if self.step == WizardStep::Contact {
            Some(&mut self.draft.contact)
        } else {
            None
        }
    }

    pub fn set_consent(&mut self, consent: bool) -> bool {
        if self.step != WizardStep::Contact {
            return false;
        }
        self.draft.consent = consent;
        true
    }

    /// Whether the explicit advance control of the current step is enabled.
    ///
    /// Step 1 has no such control (it advances on selection) and the
    /// confirmation step is terminal.
    pub fn can_advance(&self) -> bool {
        match self.step {
            WizardStep::Jurisdiction | WizardStep::Confirmation => false,
            WizardStep::Violation => self.draft.violation_type.is_some(),
            WizardStep::Ownership => self.draft.owns_vehicle().is_some(),
            WizardStep::Contact => self.can_submit(),
        }
    }

    pub fn can_submit(&self) -> bool {
        self.step == WizardStep::Contact
            && !self.submitting
            && self.draft.contact_complete()
            && self.draft.consent
    }

    /// Returns to the preceding step without touching the draft.
    ///
    /// Not available on step 1, on the confirmation step, or while a
    /// submission is in flight.
    pub fn back(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                true
            }
            None => false,
        }
    }

    /// Progress as `(step, GATED_STEPS)`, capped at the last gated step.
    pub fn progress(&self) -> (u8, u8) {
        (
            self.step.ordinal().min(WizardStep::GATED_STEPS),
            WizardStep::GATED_STEPS,
        )
    }

    pub fn progress_ratio(&self) -> f64 {
        let (current, total) = self.progress();
        f64::from(current) / f64::from(total)
    }

    /// Starts a submission and marks it in flight.
    ///
    /// Returns the insert payload, or `None` when the draft is not ready or
    /// another submission is still pending. The caller must hand the store's
    /// answer back through [`QuoteWizard::complete_submission`].
    pub fn begin_submission(&mut self) -> Option<NewSubmission> {
        if !self.can_submit() {
            return None;
        }
        let owner_id = self.identity.as_ref().map(|identity| identity.id.clone());
        let submission = self.draft.finalize(owner_id).ok()?;
        self.submitting = true;
        Some(submission)
    }

    /// Applies the store's answer to an in-flight submission.
    ///
    /// On success the wizard moves to the confirmation step. On failure it
    /// stays on the contact step with every entered value intact.
    pub fn complete_submission(
        &mut self,
        result: StoreResult<StoredSubmission>,
        notifier: &mut dyn Notifier,
    ) -> bool {
        if !self.submitting {
            return false;
        }
        self.submitting = false;

        match result {
            Ok(stored) => {
                info!(submission_id = %stored.id, state = %stored.jurisdiction, "quote submission stored");
                self.confirmation = Some(Confirmation::from(&stored));
                self.step = WizardStep::Confirmation;
                notifier.notify_success("Quote request submitted successfully!");
                true
            }
            Err(error) => {
                warn!(%error, "quote submission failed");
                notifier.notify_error("Failed to submit quote. Please try again.");
                false
            }
        }
    }

    /// Runs a full submission against `store`.
    pub fn submit(&mut self, store: &mut dyn SubmissionStore, notifier: &mut dyn Notifier) -> bool {
        match self.begin_submission() {
            Some(submission) => {
                let result = store.insert(&submission);
                self.complete_submission(result, notifier)
            }
            None => false,
        }
    }
}
