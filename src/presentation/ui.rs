use crate::application::{App, AppMode, ContactField, SubmissionBoard, ToastLevel, WizardStep};
use crate::domain::{CoverageType, Jurisdiction, SubmissionStatus, ViolationType};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    match app.screen_mode() {
        AppMode::Wizard | AppMode::Help => render_wizard(f, app, chunks[1]),
        AppMode::Dashboard => render_board(f, app, &app.dashboard, "My Quote Requests", chunks[1]),
        AppMode::Admin | AppMode::Search => {
            render_board(f, app, &app.admin, "All Quote Requests", chunks[1])
        }
    }
    render_status_bar(f, app, chunks[2]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let who = match app.identity() {
        Some(identity) if identity.is_admin => format!("{} (admin)", identity.id),
        Some(identity) => identity.id.clone(),
        None => "not signed in".to_string(),
    };
    let header = Paragraph::new(format!("reinstate - SR-22 / FR-44 quotes | {who}"))
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_wizard(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let (current, total) = app.wizard.progress();
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(app.wizard.step().title()))
        .gauge_style(Style::default().fg(Color::Blue))
        .ratio(app.wizard.progress_ratio())
        .label(format!("Step {current} of {total}"));
    f.render_widget(gauge, chunks[0]);

    match app.wizard.step() {
        WizardStep::Jurisdiction => render_jurisdictions(f, app, chunks[1]),
        WizardStep::Violation => render_violations(f, app, chunks[1]),
        WizardStep::Ownership => render_ownership(f, app, chunks[1]),
        WizardStep::Contact => render_contact(f, app, chunks[1]),
        WizardStep::Confirmation => render_confirmation(f, app, chunks[1]),
    }
}

fn choice_style(highlighted: bool, chosen: bool) -> Style {
    let style = if highlighted {
        Style::default().bg(Color::LightBlue).fg(Color::Black)
    } else {
        Style::default()
    };
    if chosen { style.add_modifier(Modifier::BOLD) } else { style }
}

fn marker(chosen: bool) -> &'static str {
    if chosen { "(*)" } else { "( )" }
}

fn render_jurisdictions(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let chosen = app.wizard.draft().jurisdiction;
    let items: Vec<ListItem> = Jurisdiction::ALL
        .iter()
        .enumerate()
        .map(|(i, j)| {
            let is_chosen = chosen == Some(*j);
            ListItem::new(format!("{} {}. {} ({})", marker(is_chosen), i + 1, j.name(), j.code()))
                .style(choice_style(i == app.choice_cursor, is_chosen))
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Where do you need your filing?"));
    f.render_widget(list, chunks[0]);

    let highlighted = Jurisdiction::ALL
        .get(app.choice_cursor)
        .copied()
        .unwrap_or(Jurisdiction::California);
    render_requirements(f, highlighted, chunks[1]);
}

fn render_requirements(f: &mut Frame, jurisdiction: Jurisdiction, area: Rect) {
    let requirements = jurisdiction.requirements();
    let mut lines = vec![
        Line::from(format!("Filing period: {} years", requirements.filing_period_years)),
        Line::from(format!("Minimum liability: {}", requirements.minimum_liability)),
        Line::from(format!("State filing fee: ${}", requirements.filing_fee_usd)),
        Line::from(format!("Processing: {}", requirements.processing_time)),
        Line::from(""),
    ];
    lines.extend(requirements.notes.iter().map(|note| Line::from(format!("- {note}"))));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} requirements", jurisdiction.name())),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_violations(f: &mut Frame, app: &App, area: Rect) {
    let chosen = app.wizard.draft().violation_type;
    let items: Vec<ListItem> = ViolationType::ALL
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let is_chosen = chosen == Some(*v);
            ListItem::new(vec![
                Line::from(format!("{} {}. {}", marker(is_chosen), i + 1, v.label())),
                Line::from(Span::styled(
                    format!("      {}", v.description()),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .style(choice_style(i == app.choice_cursor, is_chosen))
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("What led to your SR-22 requirement?"),
    );
    f.render_widget(list, area);
}

fn render_ownership(f: &mut Frame, app: &App, area: Rect) {
    let chosen = app.wizard.draft().owns_vehicle();
    let options = [
        (true, "I own a vehicle", CoverageType::Owner),
        (false, "I don't own a vehicle", CoverageType::NonOwner),
    ];
    let items: Vec<ListItem> = options
        .iter()
        .enumerate()
        .map(|(i, (owns, text, coverage))| {
            let is_chosen = chosen == Some(*owns);
            ListItem::new(format!(
                "{} {}. {} - {}",
                marker(is_chosen),
                i + 1,
                text,
                coverage_label(*coverage)
            ))
            .style(choice_style(i == app.choice_cursor, is_chosen))
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Do you own a vehicle?"));
    f.render_widget(list, area);
}

fn coverage_label(coverage: CoverageType) -> &'static str {
    match coverage {
        CoverageType::Owner => "Owner SR-22",
        CoverageType::NonOwner => "Non-Owner SR-22",
    }
}

fn render_contact(f: &mut Frame, app: &App, area: Rect) {
    let draft = app.wizard.draft();
    let mut lines: Vec<Line> = ContactField::ALL
        .iter()
        .map(|field| {
            let value = match field {
                ContactField::FirstName => draft.contact.first_name.clone(),
                ContactField::LastName => draft.contact.last_name.clone(),
                ContactField::Email => draft.contact.email.clone(),
                ContactField::Phone => draft.contact.phone.clone(),
                ContactField::ZipCode => draft.contact.zip_code.clone(),
                ContactField::Consent => format!(
                    "[{}] I agree to be contacted about my quote",
                    if draft.consent { "x" } else { " " }
                ),
            };
            let required = matches!(
                field,
                ContactField::FirstName | ContactField::LastName | ContactField::Email | ContactField::Consent
            );
            let label = format!("{:>14}{} ", field.label(), if required { "*" } else { " " });
            let focused = *field == app.contact_focus;
            let value_style = if focused {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default()
            };
            let cursor = if focused && *field != ContactField::Consent { "_" } else { "" };
            Line::from(vec![
                Span::styled(label, Style::default().fg(Color::Yellow)),
                Span::styled(format!("{value}{cursor}"), value_style),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    let (text, color) = if app.wizard.is_submitting() {
        ("Submitting...", Color::Yellow)
    } else if app.wizard.can_submit() {
        ("Press Enter to get your quote", Color::Green)
    } else {
        ("* required", Color::DarkGray)
    };
    lines.push(Line::from(Span::styled(text, Style::default().fg(color))));

    let form = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Contact details"));
    f.render_widget(form, area);
}

fn render_confirmation(f: &mut Frame, app: &App, area: Rect) {
    let Some(confirmation) = app.wizard.confirmation() else {
        return;
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(0)])
        .split(area);

    let summary = Paragraph::new(vec![
        Line::from(Span::styled(
            "Your quote request has been received.",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("We'll send your quotes to {}", confirmation.email)),
        Line::from(format!("Coverage: {}", coverage_label(confirmation.coverage_type))),
        Line::from(format!("Reference: {}", confirmation.submission_id)),
    ])
    .block(Block::default().borders(Borders::ALL).title("Quote Ready!"));
    f.render_widget(summary, chunks[0]);

    render_requirements(f, confirmation.jurisdiction, chunks[1]);
}

fn status_color(status: SubmissionStatus) -> Color {
    match status {
        SubmissionStatus::Pending => Color::Yellow,
        SubmissionStatus::Quoted => Color::Cyan,
        SubmissionStatus::Contacted => Color::Blue,
        SubmissionStatus::Converted => Color::Green,
        SubmissionStatus::Expired => Color::DarkGray,
    }
}

fn render_board(f: &mut Frame, app: &App, board: &SubmissionBoard, title: &str, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let stats = board.stats();
    let mut summary = vec![
        Span::raw(format!("Total {} ", stats.total)),
        Span::styled(format!("Pending {} ", stats.pending), Style::default().fg(status_color(SubmissionStatus::Pending))),
        Span::styled(format!("Quoted {} ", stats.quoted), Style::default().fg(status_color(SubmissionStatus::Quoted))),
        Span::styled(format!("Contacted {} ", stats.contacted), Style::default().fg(status_color(SubmissionStatus::Contacted))),
        Span::styled(format!("Converted {} ", stats.converted), Style::default().fg(status_color(SubmissionStatus::Converted))),
        Span::styled(format!("Expired {}", stats.expired), Style::default().fg(status_color(SubmissionStatus::Expired))),
    ];
    if board.filter.is_active() {
        summary.push(Span::styled(
            format!(" | search: \"{}\" status: {}", board.filter.text, board.filter.status),
            Style::default().fg(Color::Magenta),
        ));
    }
    f.render_widget(
        Paragraph::new(Line::from(summary)).block(Block::default().borders(Borders::ALL).title(title)),
        chunks[0],
    );

    let visible = board.visible();
    if visible.is_empty() {
        let text = if !board.is_loaded() {
            "Loading..."
        } else if board.records().is_empty() {
            "No quote requests yet."
        } else {
            "No quote requests match the current filter."
        };
        f.render_widget(
            Paragraph::new(text).block(Block::default().borders(Borders::ALL)),
            chunks[1],
        );
        return;
    }

    let show_contact = app.screen_mode() != AppMode::Dashboard;
    let mut header = Vec::new();
    if show_contact {
        header.extend(["Name", "Email", "Phone"]);
    }
    header.extend(["Date", "State", "Violation", "Coverage", "Status"]);
    let header_row = Row::new(
        header
            .into_iter()
            .map(|h| Cell::from(h).style(Style::default().fg(Color::Yellow))),
    );

    let rows: Vec<Row> = visible
        .iter()
        .enumerate()
        .map(|(i, submission)| {
            let mut cells = Vec::new();
            if show_contact {
                cells.push(Cell::from(submission.full_name()));
                cells.push(Cell::from(submission.email.clone()));
                cells.push(Cell::from(submission.phone.clone().unwrap_or_default()));
            }
            cells.push(Cell::from(submission.created_at.format("%Y-%m-%d").to_string()));
            cells.push(Cell::from(submission.jurisdiction.code()));
            cells.push(Cell::from(submission.violation_type.label()));
            cells.push(Cell::from(coverage_label(submission.coverage_type)));
            cells.push(
                Cell::from(submission.status.label())
                    .style(Style::default().fg(status_color(submission.status))),
            );
            let row = Row::new(cells);
            if i == board.selected_index() {
                row.style(Style::default().bg(Color::Blue).fg(Color::White))
            } else {
                row
            }
        })
        .collect();

    let widths: Vec<Constraint> = if show_contact {
        vec![
            Constraint::Length(20),
            Constraint::Length(26),
            Constraint::Length(14),
            Constraint::Length(10),
            Constraint::Length(5),
            Constraint::Length(20),
            Constraint::Length(15),
            Constraint::Length(10),
        ]
    } else {
        vec![
            Constraint::Length(10),
            Constraint::Length(5),
            Constraint::Length(22),
            Constraint::Length(16),
            Constraint::Length(10),
        ]
    };
    let table = Table::new(rows, widths)
        .header(header_row)
        .block(Block::default().borders(Borders::ALL))
        .column_spacing(1);
    f.render_widget(table, chunks[1]);
}

fn key_hints(app: &App) -> String {
    match app.mode {
        AppMode::Wizard => match app.wizard.step() {
            WizardStep::Jurisdiction => "↑↓: move | Enter/1-3: choose state | F1: help | q: quit".to_string(),
            WizardStep::Violation | WizardStep::Ownership if app.wizard.can_advance() => {
                "↑↓: move | Space/number: select | Enter: continue | Esc: back | q: quit".to_string()
            }
            WizardStep::Violation | WizardStep::Ownership => {
                "↑↓: move | Space/number: select an option to continue | Esc: back | q: quit".to_string()
            }
            WizardStep::Contact => {
                "Tab/↑↓: field | Space on consent: toggle | Enter: submit | Esc: back".to_string()
            }
            WizardStep::Confirmation => "n: new quote | d: my quotes | q: quit".to_string(),
        },
        AppMode::Dashboard => "↑↓: move | r: refresh | a: admin | w: new quote | q: quit".to_string(),
        AppMode::Admin => {
            "/: search | f: status filter | x: clear | 1-5: set status | c: copy email | e: export | r: refresh"
                .to_string()
        }
        AppMode::Search => format!("Search: {}_ (Enter/Esc to finish)", app.admin.filter.text),
        AppMode::Help => "Esc/F1/q: close help".to_string(),
    }
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if let Some(notice) = &app.access_notice {
        (notice.clone(), Style::default().fg(Color::Red))
    } else if let Some(toast) = app.toasts.latest().filter(|_| app.mode != AppMode::Search) {
        let color = match toast.level {
            ToastLevel::Success => Color::Green,
            ToastLevel::Error => Color::Red,
        };
        (toast.message.clone(), Style::default().fg(color))
    } else {
        let style = match app.mode {
            AppMode::Search => Style::default().fg(Color::Magenta),
            AppMode::Help => Style::default().fg(Color::Cyan),
            _ => Style::default(),
        };
        (key_hints(app), style)
    };

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(status, area);
}

fn render_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_widget = Paragraph::new(help_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("reinstate help")
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn help_text() -> String {
    let statuses: Vec<String> = SubmissionStatus::ALL
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}={}", i + 1, s.label()))
        .collect();
    format!(
        r#"=== SCREENS ===
F1              Show this help
F2              Quote wizard
F3              My quote requests (signed in)
F4              Admin board (admins only)
q / Ctrl+C      Quit (q is ignored while typing)

=== QUOTE WIZARD ===
↑↓ or j/k       Move between options
Space / 1-9     Select the highlighted or numbered option
Enter           Continue to the next step (choosing a state advances at once)
Esc             Go back one step; your answers are kept
Tab / Shift+Tab Move between contact fields
n               Start a new quote after submitting

=== ADMIN BOARD ===
/               Search by name or email
f               Cycle the status filter
x               Clear search and filter
1-5             Set status of the selected request ({})
c               Copy the selected email address
e               Export the filtered list to CSV
r               Reload from the store"#,
        statuses.join(", ")
    )
}
