//! Application state for the terminal front end.
//!
//! Ties the quote wizard, the owner dashboard and the admin board to one
//! store and one notification buffer, and tracks which screen is showing.

use super::lifecycle::{BoardScope, SubmissionBoard, SubmissionLifecycle};
use super::notifications::Toasts;
use super::wizard::{QuoteWizard, WizardStep};
use crate::domain::{
    Identity, IdentityProvider, Jurisdiction, LifecycleError, Notifier, SubmissionStatus,
    SubmissionStore, ViolationType,
};
use std::path::PathBuf;
use tracing::warn;

/// Represents the screen the application is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// The quote intake wizard
    Wizard,
    /// The signed-in user's own quote requests
    Dashboard,
    /// Every submission, with status controls
    Admin,
    /// Typing into the admin search box
    Search,
    /// Key reference popup
    Help,
}

/// Input fields on the contact step, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    FirstName,
    LastName,
    Email,
    Phone,
    ZipCode,
    Consent,
}

impl ContactField {
    pub const ALL: [ContactField; 6] = [
        ContactField::FirstName,
        ContactField::LastName,
        ContactField::Email,
        ContactField::Phone,
        ContactField::ZipCode,
        ContactField::Consent,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ContactField::FirstName => "First Name",
            ContactField::LastName => "Last Name",
            ContactField::Email => "Email Address",
            ContactField::Phone => "Phone Number",
            ContactField::ZipCode => "ZIP Code",
            ContactField::Consent => "Consent",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Main application state.
///
/// # Examples
///
/// ```
/// use reinstate::application::{App, AppMode};
/// use reinstate::infrastructure::{InMemoryStore, SessionIdentity};
///
/// let app = App::new(Box::new(InMemoryStore::default()), &SessionIdentity::anonymous(), "out.csv");
/// assert_eq!(app.mode, AppMode::Wizard);
/// assert!(app.identity().is_none());
/// ```
pub struct App {
    /// Current screen
    pub mode: AppMode,
    /// The quote intake flow
    pub wizard: QuoteWizard,
    /// Highlighted option on the jurisdiction, violation and ownership steps
    pub choice_cursor: usize,
    /// Focused input on the contact step
    pub contact_focus: ContactField,
    /// The signed-in user's submissions
    pub dashboard: SubmissionBoard,
    /// All submissions, for admins
    pub admin: SubmissionBoard,
    /// Latest success or error message
    pub toasts: Toasts,
    /// Shown after a screen change was refused
    pub access_notice: Option<String>,
    /// Where CSV exports are written
    pub export_path: PathBuf,
    /// Screen to return to when the help popup closes
    previous_mode: AppMode,
    identity: Option<Identity>,
    lifecycle: SubmissionLifecycle,
    store: Box<dyn SubmissionStore>,
}

impl App {
    pub fn new(
        store: Box<dyn SubmissionStore>,
        identity_provider: &dyn IdentityProvider,
        export_path: impl Into<PathBuf>,
    ) -> Self {
        let identity = identity_provider.current_identity();
        Self {
            mode: AppMode::Wizard,
            wizard: QuoteWizard::new(identity.clone()),
            choice_cursor: 0,
            contact_focus: ContactField::FirstName,
            dashboard: SubmissionBoard::new(BoardScope::Owner),
            admin: SubmissionBoard::new(BoardScope::All),
            toasts: Toasts::default(),
            access_notice: None,
            export_path: export_path.into(),
            previous_mode: AppMode::Wizard,
            lifecycle: SubmissionLifecycle::new(identity.clone()),
            identity,
            store,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        self.lifecycle.is_admin()
    }

    /// The screen to draw; the one behind the help popup while it is open.
    pub fn screen_mode(&self) -> AppMode {
        if self.mode == AppMode::Help { self.previous_mode } else { self.mode }
    }

    /// Number of options on the current choice step, or zero on other steps.
    pub fn choice_count(&self) -> usize {
        match self.wizard.step() {
            WizardStep::Jurisdiction => Jurisdiction::ALL.len(),
            WizardStep::Violation => ViolationType::ALL.len(),
            WizardStep::Ownership => 2,
            WizardStep::Contact | WizardStep::Confirmation => 0,
        }
    }

    pub fn choice_up(&mut self) {
        self.choice_cursor = self.choice_cursor.saturating_sub(1);
    }

    pub fn choice_down(&mut self) {
        if self.choice_cursor + 1 < self.choice_count() {
            self.choice_cursor += 1;
        }
    }

    /// Applies the highlighted option of the current step.
    pub fn confirm_choice(&mut self) {
        match self.wizard.step() {
            WizardStep::Jurisdiction => {
                if let Some(jurisdiction) = Jurisdiction::ALL.get(self.choice_cursor) {
                    self.wizard.select_jurisdiction(*jurisdiction);
                    self.sync_choice_cursor();
                }
            }
            WizardStep::Violation => {
                if let Some(violation) = ViolationType::ALL.get(self.choice_cursor) {
                    self.wizard.select_violation(*violation);
                }
            }
            WizardStep::Ownership => {
                self.wizard.choose_vehicle_ownership(self.choice_cursor == 0);
            }
            WizardStep::Contact | WizardStep::Confirmation => {}
        }
    }

    /// The step's explicit continue action; submits on the contact step.
    pub fn wizard_continue(&mut self) {
        let advanced = match self.wizard.step() {
            WizardStep::Violation => self.wizard.continue_from_violation(),
            WizardStep::Ownership => self.wizard.continue_from_ownership(),
            WizardStep::Contact => self.submit_quote(),
            WizardStep::Jurisdiction | WizardStep::Confirmation => false,
        };
        if advanced {
            self.contact_focus = ContactField::FirstName;
            self.sync_choice_cursor();
        }
    }

    pub fn wizard_back(&mut self) {
        if self.wizard.back() {
            self.sync_choice_cursor();
        }
    }

    /// Points the cursor at the value already chosen on this step, if any.
    fn sync_choice_cursor(&mut self) {
        let draft = self.wizard.draft();
        self.choice_cursor = match self.wizard.step() {
            WizardStep::Jurisdiction => draft
                .jurisdiction
                .and_then(|j| Jurisdiction::ALL.iter().position(|c| *c == j)),
            WizardStep::Violation => draft
                .violation_type
                .and_then(|v| ViolationType::ALL.iter().position(|c| *c == v)),
            WizardStep::Ownership => draft.owns_vehicle().map(|owns| if owns { 0 } else { 1 }),
            WizardStep::Contact | WizardStep::Confirmation => None,
        }
        .unwrap_or(0);
    }

    pub fn focus_next_field(&mut self) {
        self.contact_focus = self.contact_focus.next();
    }

    pub fn focus_previous_field(&mut self) {
        self.contact_focus = self.contact_focus.previous();
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        let focus = self.contact_focus;
        let contact = self.wizard.contact_mut()?;
        match focus {
            ContactField::FirstName => Some(&mut contact.first_name),
            ContactField::LastName => Some(&mut contact.last_name),
            ContactField::Email => Some(&mut contact.email),
            ContactField::Phone => Some(&mut contact.phone),
            ContactField::ZipCode => Some(&mut contact.zip_code),
            ContactField::Consent => None,
        }
    }

    pub fn type_char(&mut self, c: char) {
        if self.contact_focus == ContactField::Consent {
            if c == ' ' {
                self.toggle_consent();
            }
            return;
        }
        if let Some(text) = self.focused_text() {
            text.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(text) = self.focused_text() {
            text.pop();
        }
    }

    pub fn toggle_consent(&mut self) {
        let consent = !self.wizard.draft().consent;
        self.wizard.set_consent(consent);
    }

    pub fn submit_quote(&mut self) -> bool {
        self.wizard.submit(self.store.as_mut(), &mut self.toasts)
    }

    /// Replaces a finished wizard with a fresh one.
    pub fn start_new_quote(&mut self) {
        if self.wizard.step() == WizardStep::Confirmation {
            self.wizard = QuoteWizard::new(self.identity.clone());
            self.choice_cursor = 0;
            self.contact_focus = ContactField::FirstName;
        }
    }

    pub fn open_wizard(&mut self) {
        self.access_notice = None;
        self.mode = AppMode::Wizard;
    }

    pub fn open_dashboard(&mut self) {
        if self.lifecycle.identity().is_none() {
            self.deny(LifecycleError::Unauthenticated);
            return;
        }
        self.access_notice = None;
        self.mode = AppMode::Dashboard;
        if let Err(error) = self.dashboard.refresh(&self.lifecycle, self.store.as_ref(), &mut self.toasts) {
            if error.is_authorization() {
                self.deny(error);
            }
        }
    }

    /// Opens the admin board, refusing non-admins before any store call.
    pub fn open_admin(&mut self) {
        if !self.lifecycle.is_admin() {
            let error = if self.lifecycle.identity().is_some() {
                LifecycleError::Forbidden
            } else {
                LifecycleError::Unauthenticated
            };
            self.deny(error);
            return;
        }
        self.access_notice = None;
        self.mode = AppMode::Admin;
        if let Err(error) = self.admin.refresh(&self.lifecycle, self.store.as_ref(), &mut self.toasts) {
            if error.is_authorization() {
                self.deny(error);
            }
        }
    }

    /// Redirects away from a refused screen.
    fn deny(&mut self, error: LifecycleError) {
        warn!(%error, "access denied");
        match error {
            LifecycleError::Forbidden => {
                self.access_notice = Some("Access denied. Admin privileges required.".to_string());
                self.mode = AppMode::Dashboard;
                if let Err(error) = self.dashboard.refresh(&self.lifecycle, self.store.as_ref(), &mut self.toasts) {
                    warn!(%error, "dashboard refresh after redirect failed");
                }
            }
            _ => {
                self.access_notice = Some("Sign in to view quote requests.".to_string());
                self.mode = AppMode::Wizard;
            }
        }
    }

    pub fn refresh(&mut self) {
        match self.mode {
            AppMode::Dashboard => self.open_dashboard(),
            AppMode::Admin | AppMode::Search => {
                let mode = self.mode;
                self.open_admin();
                if self.mode == AppMode::Admin {
                    self.mode = mode;
                }
            }
            AppMode::Wizard | AppMode::Help => {}
        }
    }

    pub fn set_selected_status(&mut self, status: SubmissionStatus) {
        let result = self.admin.set_selected_status(
            &self.lifecycle,
            self.store.as_mut(),
            &mut self.toasts,
            status,
        );
        if let Err(error) = result {
            if error.is_authorization() {
                self.deny(error);
            }
        }
    }

    pub fn start_search(&mut self) {
        if self.mode == AppMode::Admin {
            self.mode = AppMode::Search;
        }
    }

    pub fn finish_search(&mut self) {
        if self.mode == AppMode::Search {
            self.mode = AppMode::Admin;
        }
    }

    pub fn show_help(&mut self) {
        if self.mode != AppMode::Help {
            self.previous_mode = self.mode;
            self.mode = AppMode::Help;
        }
    }

    pub fn close_help(&mut self) {
        if self.mode == AppMode::Help {
            self.mode = self.previous_mode;
        }
    }

    /// Processes the result of copying an email address to the clipboard.
    pub fn set_copy_result(&mut self, result: Result<String, String>) {
        match result {
            Ok(email) => self.toasts.notify_success(&format!("Copied {email} to clipboard")),
            Err(error) => self.toasts.notify_error(&format!("Copy failed: {error}")),
        }
    }

    /// Processes the result of a CSV export.
    pub fn set_export_result(&mut self, result: Result<usize, String>) {
        match result {
            Ok(count) => self.toasts.notify_success(&format!(
                "Exported {count} submissions to {}",
                self.export_path.display()
            )),
            Err(error) => self.toasts.notify_error(&format!("Export failed: {error}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ToastLevel;
    use crate::domain::CoverageType;
    use crate::infrastructure::{InMemoryStore, SessionIdentity};

    fn app_for(identity: SessionIdentity) -> App {
        App::new(Box::new(InMemoryStore::default()), &identity, "submissions.csv")
    }

    fn complete_quote(app: &mut App) {
        app.choice_down();
        app.confirm_choice();
        assert_eq!(app.wizard.draft().jurisdiction, Some(Jurisdiction::Colorado));
        assert_eq!(app.wizard.step(), WizardStep::Violation);

        app.confirm_choice();
        app.wizard_continue();
        app.choice_down();
        app.confirm_choice();
        assert_eq!(app.wizard.draft().coverage_type(), Some(CoverageType::NonOwner));
        app.wizard_continue();
        assert_eq!(app.wizard.step(), WizardStep::Contact);

        for c in "Ann".chars() {
            app.type_char(c);
        }
        app.focus_next_field();
        for c in "Lee".chars() {
            app.type_char(c);
        }
        app.focus_next_field();
        for c in "ann@example.com".chars() {
            app.type_char(c);
        }
        app.focus_previous_field();
        app.focus_previous_field();
        app.focus_previous_field();
        assert_eq!(app.contact_focus, ContactField::Consent);
        app.type_char(' ');
        assert!(app.wizard.draft().consent);

        app.wizard_continue();
    }

    #[test]
    fn test_app_default_mode() {
        let app = app_for(SessionIdentity::anonymous());
        assert_eq!(app.mode, AppMode::Wizard);
        assert_eq!(app.choice_count(), 3);
        assert_eq!(app.wizard.step(), WizardStep::Jurisdiction);
    }

    #[test]
    fn test_choice_cursor_bounds() {
        let mut app = app_for(SessionIdentity::anonymous());
        app.choice_up();
        assert_eq!(app.choice_cursor, 0);
        for _ in 0..10 {
            app.choice_down();
        }
        assert_eq!(app.choice_cursor, 2);
    }

    #[test]
    fn test_full_quote_through_app() {
        let mut app = app_for(SessionIdentity::signed_in("u1", false));
        complete_quote(&mut app);

        assert_eq!(app.wizard.step(), WizardStep::Confirmation);
        assert_eq!(app.toasts.latest().unwrap().level, ToastLevel::Success);

        app.open_dashboard();
        assert_eq!(app.mode, AppMode::Dashboard);
        assert_eq!(app.dashboard.records().len(), 1);
        assert_eq!(app.dashboard.records()[0].owner_id.as_deref(), Some("u1"));
    }

    #[test]
    fn test_back_restores_cursor_to_previous_choice() {
        let mut app = app_for(SessionIdentity::anonymous());
        app.choice_down();
        app.choice_down();
        app.confirm_choice();
        app.wizard_back();

        assert_eq!(app.wizard.step(), WizardStep::Jurisdiction);
        assert_eq!(app.choice_cursor, 2);
        assert_eq!(app.wizard.draft().jurisdiction, Some(Jurisdiction::NorthCarolina));
    }

    #[test]
    fn test_start_new_quote_only_after_confirmation() {
        let mut app = app_for(SessionIdentity::anonymous());
        app.confirm_choice();
        app.start_new_quote();
        assert_eq!(app.wizard.step(), WizardStep::Violation);

        let mut app = app_for(SessionIdentity::anonymous());
        complete_quote(&mut app);
        app.start_new_quote();
        assert_eq!(app.wizard.step(), WizardStep::Jurisdiction);
        assert!(app.wizard.draft().jurisdiction.is_none());
    }

    #[test]
    fn test_admin_denied_for_anonymous() {
        let mut app = app_for(SessionIdentity::anonymous());
        app.open_admin();
        assert_eq!(app.mode, AppMode::Wizard);
        assert!(app.access_notice.is_some());
        assert!(app.toasts.latest().is_none());

        app.open_dashboard();
        assert_eq!(app.mode, AppMode::Wizard);
    }

    #[test]
    fn test_admin_denied_for_user_redirects_to_dashboard() {
        let mut app = app_for(SessionIdentity::signed_in("u1", false));
        app.open_admin();

        assert_eq!(app.mode, AppMode::Dashboard);
        assert_eq!(app.access_notice.as_deref(), Some("Access denied. Admin privileges required."));
        assert!(!app.admin.is_loaded());
        assert!(app.dashboard.is_loaded());
    }

    #[test]
    fn test_admin_status_change_seen_on_dashboard() {
        let mut app = app_for(SessionIdentity::signed_in("boss", true));
        complete_quote(&mut app);

        app.open_admin();
        assert_eq!(app.mode, AppMode::Admin);
        assert_eq!(app.admin.records().len(), 1);

        app.set_selected_status(SubmissionStatus::Converted);
        assert_eq!(app.admin.records()[0].status, SubmissionStatus::Converted);

        app.open_dashboard();
        assert_eq!(app.dashboard.records()[0].status, SubmissionStatus::Converted);
    }

    #[test]
    fn test_search_mode_round_trip() {
        let mut app = app_for(SessionIdentity::signed_in("boss", true));
        app.start_search();
        assert_eq!(app.mode, AppMode::Wizard);

        app.open_admin();
        app.start_search();
        assert_eq!(app.mode, AppMode::Search);
        app.refresh();
        assert_eq!(app.mode, AppMode::Search);
        app.finish_search();
        assert_eq!(app.mode, AppMode::Admin);
    }

    #[test]
    fn test_help_returns_to_previous_mode() {
        let mut app = app_for(SessionIdentity::signed_in("u1", false));
        app.open_dashboard();
        app.show_help();
        assert_eq!(app.mode, AppMode::Help);
        assert_eq!(app.screen_mode(), AppMode::Dashboard);
        app.close_help();
        assert_eq!(app.mode, AppMode::Dashboard);
    }

    #[test]
    fn test_export_and_copy_results() {
        let mut app = app_for(SessionIdentity::anonymous());

        app.set_export_result(Ok(3));
        assert_eq!(app.toasts.latest().unwrap().message, "Exported 3 submissions to submissions.csv");

        app.set_copy_result(Err("no display".to_string()));
        let latest = app.toasts.latest().unwrap();
        assert_eq!(latest.level, ToastLevel::Error);
        assert_eq!(latest.message, "Copy failed: no display");
    }

    #[test]
    fn test_contact_field_cycle() {
        assert_eq!(ContactField::FirstName.previous(), ContactField::Consent);
        assert_eq!(ContactField::Consent.next(), ContactField::FirstName);
        assert_eq!(ContactField::Email.next(), ContactField::Phone);
    }
}
