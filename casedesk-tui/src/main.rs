//! CaseDesk TUI entry point.

use casedesk_core::{CourtCatalog, OptionSource, RecordKind, SessionProvider};
use casedesk_tui::config::TuiConfig;
use casedesk_tui::error::TuiError;
use casedesk_tui::events::TuiEvent;
use casedesk_tui::export;
use casedesk_tui::gateway::RestClient;
use casedesk_tui::logging;
use casedesk_tui::persistence::{self, FileSessionStore};
use casedesk_tui::state::{App, Command};
use casedesk_tui::views::render_view;
use crossterm::{
    event::{self, Event as CrosstermEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    logging::init(&config.error_log_path)?;

    let store = Arc::new(FileSessionStore::open(&config.session_path)?);
    if store.is_empty() {
        if let Some(seed) = config.session.clone() {
            store.sign_in(seed.into())?;
        }
    }
    let session: Arc<dyn SessionProvider> = store;
    let gateway = RestClient::new(&config, session.clone())?;
    let export_dir = config.export_dir.clone();

    let mut app = App::new(config, session)?;
    match persistence::load(&app.config.persistence_path) {
        Ok(Some(state)) => app.restore(&state),
        Ok(None) => {}
        Err(err) => tracing::warn!(error = %err, "ignoring unreadable UI state"),
    }

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard {};

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    spawn_input_reader(event_tx.clone());

    let executor = Executor {
        locations: Arc::new(gateway.clone()),
        courts: Arc::new(CourtCatalog),
        gateway,
        export_dir,
        sender: event_tx,
    };
    for command in app.start() {
        executor.run(command);
    }

    let tick_rate = Duration::from_millis(app.config.refresh_interval_ms);
    let mut ticker = tokio::time::interval(tick_rate);

    while !app.should_quit {
        terminal.draw(|f| render_view(f, &app))?;

        let commands = tokio::select! {
            _ = ticker.tick() => app.handle_event(TuiEvent::Tick),
            Some(event) = event_rx.recv() => app.handle_event(event),
        };
        for command in commands {
            executor.run(command);
        }
    }

    if let Err(err) = persistence::save(&app.config.persistence_path, &app.persisted()) {
        tracing::warn!(error = %err, "failed to save UI state");
    }
    tracing::info!("shutting down");

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let sent = match evt {
                    CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                        sender.blocking_send(TuiEvent::Input(key))
                    }
                    CrosstermEvent::Resize(width, height) => {
                        sender.blocking_send(TuiEvent::Resize { width, height })
                    }
                    _ => Ok(()),
                };
                if sent.is_err() {
                    break;
                }
            }
        }
    });
}

/// Runs [`Command`]s as spawned tasks that report back as events.
struct Executor {
    gateway: RestClient,
    courts: Arc<dyn OptionSource>,
    locations: Arc<dyn OptionSource>,
    export_dir: PathBuf,
    sender: mpsc::Sender<TuiEvent>,
}

impl Executor {
    fn run(&self, command: Command) {
        let gateway = self.gateway.clone();
        let sender = self.sender.clone();
        match command {
            Command::LoadRecords(kind) => {
                tokio::spawn(async move {
                    let result = gateway.list_records(kind).await.map_err(|e| {
                        tracing::warn!(kind = %kind, error = %e, "record load failed");
                        e.to_string()
                    });
                    let _ = sender.send(TuiEvent::RecordsLoaded { kind, result }).await;
                });
            }
            Command::FetchOptions { kind, ticket } => {
                let source = match kind {
                    RecordKind::Land => self.locations.clone(),
                    RecordKind::Case | RecordKind::Miscellaneous => self.courts.clone(),
                };
                tokio::spawn(async move {
                    let result = source
                        .fetch_options(&ticket.level, ticket.parent_value.as_deref())
                        .await
                        .map_err(|e| e.to_string());
                    let _ = sender
                        .send(TuiEvent::OptionsLoaded {
                            kind,
                            ticket,
                            result,
                        })
                        .await;
                });
            }
            Command::UpdateStatus { kind, id, status } => {
                tokio::spawn(async move {
                    let result = gateway
                        .update_status(&id, &status)
                        .await
                        .map_err(|e| {
                            tracing::warn!(id = %id, error = %e, "status update failed");
                            e.to_string()
                        });
                    let _ = sender
                        .send(TuiEvent::StatusUpdated { kind, id, result })
                        .await;
                });
            }
            Command::Submit(submission) => {
                tokio::spawn(async move {
                    let kind = submission.kind;
                    let result = gateway
                        .create_record(&submission)
                        .await
                        .map_err(|e| {
                            tracing::warn!(kind = %kind, error = %e, "record creation failed");
                            e.to_string()
                        });
                    let _ = sender.send(TuiEvent::Submitted { kind, result }).await;
                });
            }
            Command::LoadHearings(case_id) => {
                tokio::spawn(async move {
                    let result = gateway
                        .list_hearings(&case_id)
                        .await
                        .map_err(|e| e.to_string());
                    let _ = sender
                        .send(TuiEvent::HearingsLoaded { case_id, result })
                        .await;
                });
            }
            Command::AddHearing { case_id, date } => {
                tokio::spawn(async move {
                    let result = gateway
                        .add_hearing(&case_id, date)
                        .await
                        .map_err(|e| e.to_string());
                    let _ = sender
                        .send(TuiEvent::HearingAdded { case_id, result })
                        .await;
                });
            }
            Command::Export { kind, rows } => {
                let dir = self.export_dir.clone();
                tokio::task::spawn_blocking(move || {
                    let result = export::export_rows(&dir, kind, &rows).map_err(|e| {
                        tracing::warn!(kind = %kind, error = %e, "export failed");
                        e.to_string()
                    });
                    let _ = sender.blocking_send(TuiEvent::Exported { kind, result });
                });
            }
        }
    }
}
