use crate::application::{App, AppMode, ContactField, WizardStep};
use crate::domain::{CsvExporter, SubmissionStatus};
use crate::infrastructure::copy_to_clipboard;
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    /// Whether a bare `q` should quit rather than be typed somewhere.
    pub fn quit_key_enabled(app: &App) -> bool {
        match app.mode {
            AppMode::Wizard => app.wizard.step() != WizardStep::Contact,
            AppMode::Dashboard | AppMode::Admin => true,
            AppMode::Search | AppMode::Help => false,
        }
    }

    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            return;
        }
        app.toasts.clear();

        match key {
            KeyCode::F(1) if app.mode != AppMode::Help => {
                app.show_help();
                return;
            }
            KeyCode::F(2) => {
                app.open_wizard();
                return;
            }
            KeyCode::F(3) => {
                app.open_dashboard();
                return;
            }
            KeyCode::F(4) => {
                app.open_admin();
                return;
            }
            _ => {}
        }

        match app.mode {
            AppMode::Wizard => Self::handle_wizard(app, key),
            AppMode::Dashboard => Self::handle_dashboard(app, key),
            AppMode::Admin => Self::handle_admin(app, key),
            AppMode::Search => Self::handle_search(app, key),
            AppMode::Help => Self::handle_help(app, key),
        }
    }

    fn handle_wizard(app: &mut App, key: KeyCode) {
        match app.wizard.step() {
            WizardStep::Jurisdiction | WizardStep::Violation | WizardStep::Ownership => {
                Self::handle_choice_step(app, key)
            }
            WizardStep::Contact => Self::handle_contact_step(app, key),
            WizardStep::Confirmation => match key {
                KeyCode::Char('n') => app.start_new_quote(),
                KeyCode::Char('d') => app.open_dashboard(),
                _ => {}
            },
        }
    }

    fn handle_choice_step(app: &mut App, key: KeyCode) {
        let auto_advance = app.wizard.step() == WizardStep::Jurisdiction;
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.choice_up(),
            KeyCode::Down | KeyCode::Char('j') => app.choice_down(),
            KeyCode::Char(' ') => app.confirm_choice(),
            KeyCode::Enter if auto_advance => app.confirm_choice(),
            KeyCode::Enter => app.wizard_continue(),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < app.choice_count() {
                    app.choice_cursor = index;
                    app.confirm_choice();
                }
            }
            KeyCode::Esc | KeyCode::Left => app.wizard_back(),
            KeyCode::Char('d') => app.open_dashboard(),
            _ => {}
        }
    }

    fn handle_contact_step(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Tab | KeyCode::Down => app.focus_next_field(),
            KeyCode::BackTab | KeyCode::Up => app.focus_previous_field(),
            KeyCode::Enter if app.contact_focus == ContactField::Consent && !app.wizard.draft().consent => {
                app.toggle_consent()
            }
            KeyCode::Enter => app.wizard_continue(),
            KeyCode::Backspace => app.delete_char(),
            KeyCode::Esc => app.wizard_back(),
            KeyCode::Char(c) => app.type_char(c),
            _ => {}
        }
    }

    fn handle_dashboard(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.dashboard.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => app.dashboard.select_next(),
            KeyCode::Char('r') => app.refresh(),
            KeyCode::Char('a') => app.open_admin(),
            KeyCode::Char('w') | KeyCode::Esc => app.open_wizard(),
            _ => {}
        }
    }

    fn handle_admin(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.admin.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => app.admin.select_next(),
            KeyCode::Char('/') => app.start_search(),
            KeyCode::Char('f') => app.admin.cycle_status_filter(),
            KeyCode::Char('x') => app.admin.clear_filter(),
            KeyCode::Char(c @ '1'..='5') => {
                let status = SubmissionStatus::ALL[c as usize - '1' as usize];
                app.set_selected_status(status);
            }
            KeyCode::Char('r') => app.refresh(),
            KeyCode::Char('c') => {
                let Some(email) = app.admin.selected().map(|s| s.email.clone()) else {
                    return;
                };
                let result = copy_to_clipboard(&email)
                    .map(|_| email)
                    .map_err(|e| e.to_string());
                app.set_copy_result(result);
            }
            KeyCode::Char('e') => {
                let visible = app.admin.visible();
                let result = CsvExporter::export_submissions(&visible, &app.export_path)
                    .map_err(|e| e.to_string());
                app.set_export_result(result);
            }
            KeyCode::Char('d') => app.open_dashboard(),
            KeyCode::Char('w') | KeyCode::Esc => app.open_wizard(),
            _ => {}
        }
    }

    fn handle_search(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Esc => app.finish_search(),
            KeyCode::Backspace => app.admin.pop_filter_char(),
            KeyCode::Char(c) => app.admin.push_filter_char(c),
            _ => {}
        }
    }

    fn handle_help(app: &mut App, key: KeyCode) {
        if matches!(key, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.close_help();
        }
    }
}
