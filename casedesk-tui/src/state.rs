//! Application state and view state definitions.
//!
//! `App` performs no I/O. Key presses and gateway outcomes go in through
//! [`App::handle_key`] and [`App::handle_event`]; the side effects the loop
//! must run come back out as [`Command`]s.

use crate::config::TuiConfig;
use crate::error::TuiError;
use crate::events::TuiEvent;
use crate::keys::{map_key, Action};
use crate::nav::View;
use crate::notifications::{Notification, NotificationLevel};
use crate::persistence::PersistedState;
use crate::theme::LedgerTheme;
use casedesk_core::{
    court_selector, location_selector, Applied, CascadingSelector, Date, FetchTicket, FieldInput,
    FieldSpec, FileViewer, FlatRow, FormDraft, Hearing, Record, RecordId, RecordKind,
    RecordStatus, RecordTable, SessionProvider, Submission,
};
use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::{Block, Borders};
use std::path::PathBuf;
use std::sync::Arc;
use tui_textarea::{CursorMove, TextArea};

/// How long a notification stays in the footer.
pub const NOTIFICATION_TTL_MS: i64 = 5_000;

/// Side effect requested by the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadRecords(RecordKind),
    FetchOptions {
        kind: RecordKind,
        ticket: FetchTicket,
    },
    UpdateStatus {
        kind: RecordKind,
        id: RecordId,
        status: RecordStatus,
    },
    Submit(Submission),
    LoadHearings(RecordId),
    AddHearing {
        case_id: RecordId,
        date: Date,
    },
    Export {
        kind: RecordKind,
        rows: Vec<FlatRow>,
    },
}

// ============================================================================
// LIST VIEWS
// ============================================================================

#[derive(Debug, Clone)]
pub struct ListViewState {
    pub table: RecordTable,
    /// Row index within the current page.
    pub selected: usize,
    pub loading: bool,
}

impl ListViewState {
    pub fn new(kind: RecordKind, page_size: usize) -> Result<Self, TuiError> {
        Ok(Self {
            table: RecordTable::new(kind, page_size)?,
            selected: 0,
            loading: false,
        })
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.table.page().rows.get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        let len = self.table.page().rows.len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % len;
    }

    pub fn select_previous(&mut self) {
        let len = self.table.page().rows.len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = if self.selected == 0 {
            len - 1
        } else {
            self.selected - 1
        };
    }

    fn clamp_selection(&mut self) {
        let len = self.table.page().rows.len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

/// One value per record kind.
#[derive(Debug, Clone)]
pub struct PerKind<T> {
    pub case: T,
    pub land: T,
    pub misc: T,
}

impl<T> PerKind<T> {
    pub fn try_build<E>(mut build: impl FnMut(RecordKind) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            case: build(RecordKind::Case)?,
            land: build(RecordKind::Land)?,
            misc: build(RecordKind::Miscellaneous)?,
        })
    }

    pub fn get(&self, kind: RecordKind) -> &T {
        match kind {
            RecordKind::Case => &self.case,
            RecordKind::Land => &self.land,
            RecordKind::Miscellaneous => &self.misc,
        }
    }

    pub fn get_mut(&mut self, kind: RecordKind) -> &mut T {
        match kind {
            RecordKind::Case => &mut self.case,
            RecordKind::Land => &mut self.land,
            RecordKind::Miscellaneous => &mut self.misc,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordKind, &T)> {
        RecordKind::all().iter().map(move |&kind| (kind, self.get(kind)))
    }
}

// ============================================================================
// FORM VIEWS
// ============================================================================

#[derive(Debug, Clone)]
pub struct FormViewState {
    pub draft: FormDraft,
    /// Cascade feeding the draft's cascade fields, if the kind has one.
    pub selector: Option<CascadingSelector>,
    pub focus: usize,
}

impl FormViewState {
    pub fn new(kind: RecordKind) -> Self {
        let selector = match kind {
            RecordKind::Case => Some(court_selector()),
            RecordKind::Land => Some(location_selector()),
            RecordKind::Miscellaneous => None,
        };
        Self {
            draft: FormDraft::new(kind),
            selector,
            focus: 0,
        }
    }

    pub fn focused(&self) -> Option<&'static FieldSpec> {
        self.draft.fields().get(self.focus)
    }

    fn focus_next(&mut self) {
        let last = self.draft.fields().len().saturating_sub(1);
        self.focus = (self.focus + 1).min(last);
    }

    fn focus_previous(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    fn mount(&mut self) -> Vec<FetchTicket> {
        self.selector
            .as_mut()
            .map(CascadingSelector::mount)
            .unwrap_or_default()
    }

    /// Clear the draft and the cascade, returning fresh root tickets.
    fn reset(&mut self) -> Vec<FetchTicket> {
        self.draft.reset();
        self.focus = 0;
        let tickets = self
            .selector
            .as_mut()
            .map(CascadingSelector::reset)
            .unwrap_or_default();
        if let Some(selector) = &self.selector {
            self.draft.apply_cascade(selector);
        }
        tickets
    }
}

// ============================================================================
// OVERLAYS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Help,
    StatusPicker {
        kind: RecordKind,
        id: RecordId,
        choice: usize,
    },
    ConfirmStatus {
        kind: RecordKind,
        id: RecordId,
        status: RecordStatus,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPurpose {
    /// Live search; `previous` is restored on cancel.
    Search { kind: RecordKind, previous: String },
    FormField {
        kind: RecordKind,
        field: &'static str,
    },
    AddFile(RecordKind),
    HearingDate(RecordId),
}

/// Single-line text input shown over the active view.
pub struct Prompt {
    pub purpose: PromptPurpose,
    pub input: TextArea<'static>,
}

impl Prompt {
    pub fn new(purpose: PromptPurpose, title: impl Into<String>, initial: &str) -> Self {
        let mut input = TextArea::new(vec![initial.to_string()]);
        input.move_cursor(CursorMove::End);
        input.set_block(Block::default().borders(Borders::ALL).title(title.into()));
        Self { purpose, input }
    }

    pub fn text(&self) -> String {
        self.input.lines().join(" ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HearingsPanel {
    pub case_id: RecordId,
    pub hearings: Vec<Hearing>,
    pub loading: bool,
}

// ============================================================================
// APP
// ============================================================================

pub struct App {
    pub config: TuiConfig,
    pub theme: LedgerTheme,
    pub session: Arc<dyn SessionProvider>,
    pub active_view: View,

    pub lists: PerKind<ListViewState>,
    pub forms: PerKind<FormViewState>,

    pub viewer: FileViewer,
    pub hearings: Option<HearingsPanel>,
    pub modal: Option<Modal>,
    pub prompt: Option<Prompt>,
    pub notifications: Vec<Notification>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: TuiConfig, session: Arc<dyn SessionProvider>) -> Result<Self, TuiError> {
        let lists = PerKind::try_build(|kind| {
            ListViewState::new(kind, config.pagination.page_size(kind))
        })?;
        let forms = PerKind::try_build(|kind| Ok::<_, TuiError>(FormViewState::new(kind)))?;
        Ok(Self {
            config,
            theme: LedgerTheme::ledger(),
            session,
            active_view: View::Cases,
            lists,
            forms,
            viewer: FileViewer::default(),
            hearings: None,
            modal: None,
            prompt: None,
            notifications: Vec::new(),
            should_quit: false,
        })
    }

    /// Initial loads: every record list and the root level of each cascade.
    pub fn start(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        for &kind in RecordKind::all() {
            commands.extend(self.load_records(kind));
            let tickets = self.form_mut(kind).mount();
            commands.extend(fetch_commands(kind, tickets));
        }
        commands
    }

    pub fn restore(&mut self, state: &PersistedState) {
        self.active_view = state.active_view;
        for (kind, query) in &state.queries {
            self.list_mut(*kind).table.search(query);
        }
    }

    pub fn persisted(&self) -> PersistedState {
        let queries = self
            .lists
            .iter()
            .filter(|(_, list)| !list.table.query().is_empty())
            .map(|(kind, list)| (kind, list.table.query().to_string()))
            .collect();
        PersistedState {
            active_view: self.active_view,
            queries,
        }
    }

    pub fn list(&self, kind: RecordKind) -> &ListViewState {
        self.lists.get(kind)
    }

    pub fn form(&self, kind: RecordKind) -> &FormViewState {
        self.forms.get(kind)
    }

    pub fn list_mut(&mut self, kind: RecordKind) -> &mut ListViewState {
        self.lists.get_mut(kind)
    }

    pub fn form_mut(&mut self, kind: RecordKind) -> &mut FormViewState {
        self.forms.get_mut(kind)
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        let notification = Notification::new(level, message);
        if level == NotificationLevel::Error {
            tracing::error!(message = %notification.message, "user notified");
        }
        self.notifications.push(notification);
    }

    pub fn expire_notifications(&mut self, now: DateTime<Utc>) {
        self.notifications
            .retain(|n| n.is_fresh(now, NOTIFICATION_TTL_MS));
    }

    pub fn switch_view(&mut self, view: View) {
        if view != self.active_view {
            tracing::debug!(from = ?self.active_view, to = ?view, "view switched");
        }
        self.active_view = view;
        self.viewer.close();
        self.hearings = None;
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if self.prompt.is_some() {
            return self.handle_prompt_key(key);
        }
        match map_key(key) {
            Some(action) => self.handle_action(action),
            None => Vec::new(),
        }
    }

    pub fn handle_action(&mut self, action: Action) -> Vec<Command> {
        if self.modal.is_some() {
            return self.handle_modal_action(action);
        }
        if self.viewer.is_open() {
            self.handle_viewer_action(action);
            return Vec::new();
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
                return Vec::new();
            }
            Action::NextView => {
                self.switch_view(self.active_view.next());
                return Vec::new();
            }
            Action::PrevView => {
                self.switch_view(self.active_view.previous());
                return Vec::new();
            }
            Action::SwitchView(index) => {
                if let Some(view) = View::from_index(index) {
                    self.switch_view(view);
                }
                return Vec::new();
            }
            Action::OpenHelp => {
                self.modal = Some(Modal::Help);
                return Vec::new();
            }
            _ => {}
        }

        if self.active_view.is_form() {
            self.handle_form_action(action)
        } else {
            self.handle_list_action(action)
        }
    }

    fn handle_list_action(&mut self, action: Action) -> Vec<Command> {
        let kind = self.active_view.kind();
        if self.hearings.is_some() && action == Action::Cancel {
            self.hearings = None;
            return Vec::new();
        }
        match action {
            Action::MoveDown => self.list_mut(kind).select_next(),
            Action::MoveUp => self.list_mut(kind).select_previous(),
            Action::MoveRight => {
                let list = self.list_mut(kind);
                list.table.next_page();
                list.selected = 0;
            }
            Action::MoveLeft => {
                let list = self.list_mut(kind);
                list.table.previous_page();
                list.selected = 0;
            }
            Action::FirstPage => {
                let list = self.list_mut(kind);
                list.table.go_to_page(1);
                list.selected = 0;
            }
            Action::LastPage => {
                let list = self.list_mut(kind);
                let last = list.table.pages().total_pages();
                list.table.go_to_page(last);
                list.selected = 0;
            }
            Action::OpenSearch => {
                let previous = self.list(kind).table.query().to_string();
                self.prompt = Some(Prompt::new(
                    PromptPurpose::Search {
                        kind,
                        previous: previous.clone(),
                    },
                    format!("Search {}", kind.title()),
                    &previous,
                ));
            }
            Action::Cancel => {
                if !self.list(kind).table.query().is_empty() {
                    let list = self.list_mut(kind);
                    list.table.search("");
                    list.selected = 0;
                }
            }
            Action::OpenViewer | Action::Confirm => self.open_viewer(kind),
            Action::ChangeStatus => {
                let target = self.list(kind).selected_record().map(|record| {
                    let choice = record
                        .status
                        .as_ref()
                        .and_then(|s| RecordStatus::choices().iter().position(|c| c == s))
                        .unwrap_or(0);
                    (record.id.clone(), choice)
                });
                if let Some((id, choice)) = target {
                    self.modal = Some(Modal::StatusPicker { kind, id, choice });
                }
            }
            Action::ShowHearings if kind == RecordKind::Case => {
                if let Some(id) = self.selected_id(kind) {
                    self.hearings = Some(HearingsPanel {
                        case_id: id.clone(),
                        hearings: Vec::new(),
                        loading: true,
                    });
                    return vec![Command::LoadHearings(id)];
                }
            }
            Action::AddHearing if kind == RecordKind::Case => {
                let target = self
                    .hearings
                    .as_ref()
                    .map(|panel| panel.case_id.clone())
                    .or_else(|| self.selected_id(kind));
                if let Some(id) = target {
                    self.prompt = Some(Prompt::new(
                        PromptPurpose::HearingDate(id.clone()),
                        format!("Hearing date for case {} (YYYY-MM-DD)", id),
                        "",
                    ));
                }
            }
            Action::Export => {
                let rows = self.list(kind).table.export_rows();
                if rows.is_empty() {
                    self.notify(NotificationLevel::Warning, "Nothing to export");
                } else {
                    return vec![Command::Export { kind, rows }];
                }
            }
            Action::NewItem => self.switch_view(View::form_for(kind)),
            Action::Refresh => return self.load_records(kind),
            _ => {}
        }
        Vec::new()
    }

    fn handle_form_action(&mut self, action: Action) -> Vec<Command> {
        let kind = self.active_view.kind();
        match action {
            Action::MoveDown => self.form_mut(kind).focus_next(),
            Action::MoveUp => self.form_mut(kind).focus_previous(),
            Action::MoveRight => return self.cycle_cascade(kind, true),
            Action::MoveLeft => return self.cycle_cascade(kind, false),
            Action::Confirm => {
                if let Some(spec) = self.form(kind).focused() {
                    let current = self.form(kind).draft.get(spec.name).to_string();
                    self.prompt = Some(Prompt::new(
                        PromptPurpose::FormField {
                            kind,
                            field: spec.name,
                        },
                        spec.label,
                        &current,
                    ));
                }
            }
            Action::AttachFile => {
                self.prompt = Some(Prompt::new(
                    PromptPurpose::AddFile(kind),
                    "Attach file (path)",
                    "",
                ));
            }
            Action::RemoveFile => {
                let form = self.form_mut(kind);
                let last = form.draft.files().len().checked_sub(1);
                if let Some(index) = last {
                    form.draft.remove_file(index);
                }
            }
            Action::Submit => return self.submit(kind),
            Action::Refresh => {
                let tickets = self
                    .form_mut(kind)
                    .selector
                    .as_mut()
                    .map(CascadingSelector::retry_empty)
                    .unwrap_or_default();
                if tickets.is_empty() {
                    self.notify(NotificationLevel::Info, "Options are up to date");
                }
                return fetch_commands(kind, tickets);
            }
            Action::Cancel => self.switch_view(View::list_for(kind)),
            _ => {}
        }
        Vec::new()
    }

    fn handle_viewer_action(&mut self, action: Action) {
        match action {
            Action::MoveRight | Action::MoveDown => self.viewer.next(),
            Action::MoveLeft | Action::MoveUp => self.viewer.previous(),
            Action::Cancel | Action::Confirm | Action::OpenViewer => self.viewer.close(),
            Action::Quit => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_modal_action(&mut self, action: Action) -> Vec<Command> {
        let Some(modal) = self.modal.take() else {
            return Vec::new();
        };
        match modal {
            Modal::Help => {
                if !matches!(
                    action,
                    Action::Cancel | Action::Confirm | Action::OpenHelp | Action::Quit
                ) {
                    self.modal = Some(Modal::Help);
                }
            }
            Modal::StatusPicker { kind, id, choice } => match action {
                Action::MoveDown => {
                    let last = RecordStatus::choices().len() - 1;
                    self.modal = Some(Modal::StatusPicker {
                        kind,
                        id,
                        choice: (choice + 1).min(last),
                    });
                }
                Action::MoveUp => {
                    self.modal = Some(Modal::StatusPicker {
                        kind,
                        id,
                        choice: choice.saturating_sub(1),
                    });
                }
                Action::Confirm => {
                    let status = RecordStatus::choices()[choice].clone();
                    self.modal = Some(Modal::ConfirmStatus { kind, id, status });
                }
                Action::Cancel => {}
                _ => self.modal = Some(Modal::StatusPicker { kind, id, choice }),
            },
            Modal::ConfirmStatus { kind, id, status } => match action {
                Action::Confirm => return self.apply_status(kind, id, status),
                Action::Cancel => {}
                _ => self.modal = Some(Modal::ConfirmStatus { kind, id, status }),
            },
        }
        Vec::new()
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Esc => {
                if let Some(prompt) = self.prompt.take() {
                    if let PromptPurpose::Search { kind, previous } = prompt.purpose {
                        let list = self.list_mut(kind);
                        if list.table.query() != previous {
                            list.table.search(&previous);
                            list.clamp_selection();
                        }
                    }
                }
                Vec::new()
            }
            KeyCode::Enter => match self.prompt.take() {
                Some(prompt) => {
                    let raw = prompt.text();
                    let text = match prompt.purpose {
                        PromptPurpose::Search { .. } => raw.as_str(),
                        _ => raw.trim(),
                    };
                    self.commit_prompt(prompt.purpose, text)
                }
                None => Vec::new(),
            },
            _ => {
                let Some(prompt) = self.prompt.as_mut() else {
                    return Vec::new();
                };
                prompt.input.input(key);
                if let PromptPurpose::Search { kind, .. } = prompt.purpose {
                    let query = prompt.text();
                    let list = self.list_mut(kind);
                    list.table.search(&query);
                    list.selected = 0;
                }
                Vec::new()
            }
        }
    }

    fn commit_prompt(&mut self, purpose: PromptPurpose, text: &str) -> Vec<Command> {
        match purpose {
            PromptPurpose::Search { kind, .. } => {
                let list = self.list_mut(kind);
                list.table.search(text);
                list.selected = 0;
                Vec::new()
            }
            PromptPurpose::FormField { kind, field } => {
                let cascade = self
                    .form(kind)
                    .draft
                    .spec(field)
                    .is_some_and(|spec| spec.input == FieldInput::Cascade);
                if cascade {
                    return self.select_cascade(kind, field, (!text.is_empty()).then_some(text));
                }
                if let Err(err) = self.form_mut(kind).draft.set(field, text) {
                    self.notify(NotificationLevel::Warning, err.to_string());
                }
                Vec::new()
            }
            PromptPurpose::AddFile(kind) => {
                if !text.is_empty() {
                    self.form_mut(kind).draft.add_file(PathBuf::from(text));
                }
                Vec::new()
            }
            PromptPurpose::HearingDate(case_id) => {
                match chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                    Ok(date) => vec![Command::AddHearing { case_id, date }],
                    Err(_) => {
                        self.notify(
                            NotificationLevel::Warning,
                            "Hearing date must be YYYY-MM-DD",
                        );
                        Vec::new()
                    }
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Gateway outcomes
    // ------------------------------------------------------------------------

    pub fn handle_event(&mut self, event: TuiEvent) -> Vec<Command> {
        match event {
            TuiEvent::Input(key) => return self.handle_key(key),
            TuiEvent::Tick => self.expire_notifications(Utc::now()),
            TuiEvent::Resize { .. } => {}
            TuiEvent::RecordsLoaded { kind, result } => {
                let list = self.list_mut(kind);
                list.loading = false;
                match result {
                    Ok(records) => {
                        list.table.replace_records(records);
                        list.clamp_selection();
                    }
                    Err(err) => self.notify(
                        NotificationLevel::Error,
                        format!("Failed to load {}: {}", kind.title(), err),
                    ),
                }
            }
            TuiEvent::OptionsLoaded {
                kind,
                ticket,
                result,
            } => {
                let applied = self
                    .form_mut(kind)
                    .selector
                    .as_mut()
                    .map(|selector| selector.apply_options(&ticket, result));
                if let Some(Applied::Failed(err)) = applied {
                    self.notify(
                        NotificationLevel::Warning,
                        format!("Could not load {} options: {}", ticket.level, err),
                    );
                }
            }
            TuiEvent::StatusUpdated { kind, id, result } => match result {
                Ok(()) => self.notify(
                    NotificationLevel::Success,
                    format!("Status of {} {} updated", kind.title(), id),
                ),
                // The optimistic change stays in place.
                Err(err) => self.notify(
                    NotificationLevel::Error,
                    format!("Status update for {} failed: {}", id, err),
                ),
            },
            TuiEvent::Submitted { kind, result } => match result {
                Ok(()) => {
                    self.notify(
                        NotificationLevel::Success,
                        format!("{} record created", kind.title()),
                    );
                    return self.load_records(kind);
                }
                Err(err) => self.notify(
                    NotificationLevel::Error,
                    format!("Failed to create {} record: {}", kind.title(), err),
                ),
            },
            TuiEvent::HearingsLoaded { case_id, result } => match result {
                Ok(mut hearings) => {
                    if let Some(panel) = self.hearings.as_mut().filter(|p| p.case_id == case_id) {
                        hearings.sort_by_key(|h| h.hearing_date);
                        panel.hearings = hearings;
                        panel.loading = false;
                    }
                }
                Err(err) => {
                    if let Some(panel) = self.hearings.as_mut() {
                        panel.loading = false;
                    }
                    self.notify(
                        NotificationLevel::Error,
                        format!("Failed to load hearings: {}", err),
                    );
                }
            },
            TuiEvent::HearingAdded { case_id, result } => match result {
                Ok(()) => {
                    self.notify(NotificationLevel::Success, "Hearing added");
                    let panel_open = self
                        .hearings
                        .as_ref()
                        .is_some_and(|p| p.case_id == case_id);
                    if panel_open {
                        return vec![Command::LoadHearings(case_id)];
                    }
                }
                Err(err) => self.notify(
                    NotificationLevel::Error,
                    format!("Failed to add hearing: {}", err),
                ),
            },
            TuiEvent::Exported { kind, result } => match result {
                Ok(path) => self.notify(
                    NotificationLevel::Success,
                    format!("Exported {} to {}", kind.title(), path.display()),
                ),
                Err(err) => self.notify(
                    NotificationLevel::Error,
                    format!("Export failed: {}", err),
                ),
            },
        }
        Vec::new()
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    fn load_records(&mut self, kind: RecordKind) -> Vec<Command> {
        self.list_mut(kind).loading = true;
        vec![Command::LoadRecords(kind)]
    }

    fn selected_id(&self, kind: RecordKind) -> Option<RecordId> {
        self.list(kind).selected_record().map(|r| r.id.clone())
    }

    fn open_viewer(&mut self, kind: RecordKind) {
        let files = self
            .list(kind)
            .selected_record()
            .map(|r| r.attachments.clone())
            .unwrap_or_default();
        if files.is_empty() {
            self.notify(NotificationLevel::Info, "No attachments");
            return;
        }
        self.viewer.open(files, 0);
    }

    /// Optimistically set the status and ask the gateway to persist it.
    fn apply_status(&mut self, kind: RecordKind, id: RecordId, status: RecordStatus) -> Vec<Command> {
        let list = self.list_mut(kind);
        let previous = list.table.set_status(&id, status.clone());
        list.clamp_selection();
        if previous.is_none() {
            self.notify(NotificationLevel::Warning, format!("Record {} not found", id));
            return Vec::new();
        }
        tracing::info!(kind = %kind, id = %id, status = %status, "status changed locally");
        vec![Command::UpdateStatus { kind, id, status }]
    }

    fn cycle_cascade(&mut self, kind: RecordKind, forward: bool) -> Vec<Command> {
        let form = self.form(kind);
        let Some(spec) = form.focused().filter(|s| s.input == FieldInput::Cascade) else {
            return Vec::new();
        };
        let Some(selector) = form.selector.as_ref() else {
            return Vec::new();
        };
        let options = selector.options(spec.name);
        if options.is_empty() {
            self.notify(
                NotificationLevel::Info,
                format!("No {} options; press Enter to type a value", spec.label),
            );
            return Vec::new();
        }
        let current = selector
            .selected(spec.name)
            .and_then(|v| options.iter().position(|o| o.id == v));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => options.len() - 1,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(i), false) => (i + options.len() - 1) % options.len(),
        };
        let value = options[next].id.clone();
        self.select_cascade(kind, spec.name, Some(&value))
    }

    fn select_cascade(&mut self, kind: RecordKind, key: &str, value: Option<&str>) -> Vec<Command> {
        let form = self.form_mut(kind);
        let Some(selector) = form.selector.as_mut() else {
            return Vec::new();
        };
        match selector.set_selection(key, value) {
            Ok(tickets) => {
                form.draft.apply_cascade(selector);
                fetch_commands(kind, tickets)
            }
            Err(err) => {
                self.notify(NotificationLevel::Warning, err.to_string());
                Vec::new()
            }
        }
    }

    /// Validate and submit. The form is cleared right away and is not
    /// restored if the server rejects the record.
    fn submit(&mut self, kind: RecordKind) -> Vec<Command> {
        let submission = match self.form(kind).draft.validate(self.session.as_ref()) {
            Ok(submission) => submission,
            Err(err) => {
                self.notify(NotificationLevel::Warning, err.to_string());
                return Vec::new();
            }
        };
        tracing::info!(kind = %kind, files = submission.files.len(), "submitting record");
        let tickets = self.form_mut(kind).reset();
        let mut commands = vec![Command::Submit(submission)];
        commands.extend(fetch_commands(kind, tickets));
        commands
    }
}

fn fetch_commands(kind: RecordKind, tickets: Vec<FetchTicket>) -> Vec<Command> {
    tickets
        .into_iter()
        .map(|ticket| Command::FetchOptions { kind, ticket })
        .collect()
}
