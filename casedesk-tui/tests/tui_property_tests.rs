use casedesk_core::{RecordKind, RecordStatus, Session, SessionProvider};
use casedesk_test_utils::{fixtures, generators::arb_records};
use casedesk_tui::config::{ConfigError, TuiConfig};
use casedesk_tui::export::{columns, write_csv};
use casedesk_tui::keys::{map_key, Action};
use casedesk_tui::nav::View;
use casedesk_tui::persistence::{self, FileSessionStore, PersistedState};
use casedesk_tui::state::App;
use casedesk_tui::theme::{status_color, LedgerTheme};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

const BASE_CONFIG: &str = r#"
api_base_url = "https://portal.example.org/api"
upload_base_url = "https://portal.example.org/uploads"
request_timeout_ms = 5000
refresh_interval_ms = 1000
persistence_path = "tmp/casedesk-state.json"
session_path = "tmp/casedesk-session.json"
error_log_path = "tmp/casedesk.log"
export_dir = "tmp/exports"

[pagination]
case_page_size = 5
record_page_size = 10
window = 5

[theme]
name = "ledger"
"#;

fn base_config() -> TuiConfig {
    TuiConfig::from_toml(BASE_CONFIG).unwrap()
}

fn invalid_field(config: &TuiConfig) -> Option<&'static str> {
    match config.validate() {
        Err(ConfigError::InvalidValue { field, .. }) => Some(field),
        _ => None,
    }
}

#[test]
fn config_base_is_valid() {
    let config = base_config();
    assert!(config.validate().is_ok());
    assert!(config.session.is_none());
    assert_eq!(config.pagination.page_size(RecordKind::Case), 5);
    assert_eq!(config.pagination.page_size(RecordKind::Miscellaneous), 10);
}

#[test]
fn config_rejects_unknown_keys() {
    let toml = format!("{}\nws_endpoint = \"ws://x\"\n", BASE_CONFIG);
    assert!(matches!(
        TuiConfig::from_toml(&toml),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn config_requires_http_urls() {
    let mut config = base_config();
    config.api_base_url = "portal.example.org".to_string();
    assert_eq!(invalid_field(&config), Some("api_base_url"));
}

#[test]
fn config_requires_theme_name() {
    let mut config = base_config();
    config.theme.name = "synthwave".to_string();
    assert_eq!(invalid_field(&config), Some("theme.name"));
}

#[test]
fn config_rejects_zero_page_size() {
    let mut config = base_config();
    config.pagination.record_page_size = 0;
    assert_eq!(invalid_field(&config), Some("pagination.record_page_size"));
}

#[test]
fn config_rejects_partial_session_seed() {
    let toml = format!(
        "{}\n[session]\nuser_id = \"42\"\ntoken = \"  \"\n",
        BASE_CONFIG
    );
    let config = TuiConfig::from_toml(&toml).unwrap();
    assert_eq!(invalid_field(&config), Some("session"));
}

#[test]
fn config_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("casedesk.toml");
    std::fs::write(&path, BASE_CONFIG).unwrap();
    let config = TuiConfig::from_path(&path).unwrap();
    assert_eq!(config.export_dir, std::path::PathBuf::from("tmp/exports"));
}

#[test]
fn persisted_state_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state/ui.json");
    let mut queries = HashMap::new();
    queries.insert(RecordKind::Land, "khasra 12".to_string());
    let state = PersistedState {
        active_view: View::NewLand,
        queries,
    };
    persistence::save(&path, &state).unwrap();
    assert_eq!(persistence::load(&path).unwrap(), Some(state));
}

#[test]
fn persisted_state_without_queries_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ui.json");
    std::fs::write(&path, r#"{"active_view": "Miscellaneous"}"#).unwrap();
    let state = persistence::load(&path).unwrap().unwrap();
    assert_eq!(state.active_view, View::Miscellaneous);
    assert!(state.queries.is_empty());
}

#[test]
fn session_store_feeds_the_app() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileSessionStore::open(dir.path().join("session.json")).unwrap());
    let app = App::new(base_config(), store.clone()).unwrap();
    assert!(app.session.current_session().is_none());

    store.sign_in(Session::new("7", "fresh-token")).unwrap();
    assert_eq!(app.session.current_session().unwrap().token, "fresh-token");
}

#[test]
fn export_writes_filtered_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::new(base_config(), Arc::new(fixtures::signed_in())).unwrap();
    app.list_mut(RecordKind::Case)
        .table
        .replace_records(fixtures::smith_cases());
    app.list_mut(RecordKind::Case).table.search("smith");

    let rows = app.list(RecordKind::Case).table.export_rows();
    let path = dir.path().join("smith.csv");
    assert_eq!(write_csv(&path, &rows).unwrap(), 3);

    let written = std::fs::read_to_string(&path).unwrap();
    let mut lines = written.lines();
    assert_eq!(
        lines.next(),
        Some("id,caseNo,title,plaintiff,defender,status")
    );
    assert!(lines.next().unwrap_or_default().starts_with("5,WP/5/2024"));
    assert_eq!(written.lines().count(), 4);
}

#[test]
fn status_colors_follow_workflow() {
    let theme = LedgerTheme::ledger();
    assert_eq!(status_color(Some(&RecordStatus::Completed), &theme), theme.success);
    assert_eq!(status_color(Some(&RecordStatus::Cancelled), &theme), theme.error);
    assert_eq!(status_color(None, &theme), theme.text_dim);
    assert_eq!(
        status_color(Some(&RecordStatus::parse("archived")), &theme),
        theme.text_dim
    );
}

#[test]
fn tab_switches_views() {
    let event = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
    assert_eq!(map_key(event), Some(Action::NextView));
}

#[test]
fn ctrl_s_submits() {
    let event = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
    assert_eq!(map_key(event), Some(Action::Submit));
}

proptest! {
    #[test]
    fn keybinding_digit_switches_view(digit in 0u8..=9u8) {
        let ch = char::from(b'0' + digit);
        let action = map_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        if digit == 0 {
            prop_assert!(action.is_none());
        } else {
            let index = usize::from(digit - 1);
            prop_assert_eq!(action, Some(Action::SwitchView(index)));
            prop_assert_eq!(View::from_index(index).is_some(), index < View::all().len());
        }
    }

    #[test]
    fn navigation_keys_consistent(use_vim in prop::bool::ANY) {
        let key = if use_vim {
            KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE)
        } else {
            KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)
        };
        prop_assert_eq!(map_key(key), Some(Action::MoveDown));
    }

    #[test]
    fn all_action_keys_mapped(key_char in "[qsvxnfdaH?/]") {
        let ch = key_char.chars().next().unwrap();
        let action = map_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        prop_assert!(action.is_some(), "Key '{}' should map to an action", ch);
    }

    #[test]
    fn view_next_then_previous_is_identity(index in 0usize..6) {
        let view = View::from_index(index).unwrap();
        prop_assert_eq!(view.next().previous(), view);
        prop_assert_eq!(view.previous().next(), view);
    }

    #[test]
    fn view_cycle_returns_to_start(index in 0usize..6) {
        let start = View::from_index(index).unwrap();
        let mut view = start;
        for _ in 0..View::all().len() {
            view = view.next();
        }
        prop_assert_eq!(view, start);
        prop_assert_eq!(View::list_for(view.kind()).kind(), view.kind());
        prop_assert_eq!(View::form_for(view.kind()).kind(), view.kind());
    }

    #[test]
    fn export_header_covers_every_column(records in arb_records(RecordKind::Land, 20)) {
        let rows = casedesk_core::flatten(&records);
        let header = columns(&rows);
        for row in &rows {
            for (column, _) in row {
                prop_assert!(header.contains(&column.as_str()));
            }
        }
        let mut unique = header.clone();
        unique.sort_unstable();
        unique.dedup();
        prop_assert_eq!(unique.len(), header.len());
    }

    #[test]
    fn list_selection_stays_on_page(
        records in arb_records(RecordKind::Case, 40),
        moves in prop::collection::vec(prop::bool::ANY, 0..30),
    ) {
        let mut app = App::new(base_config(), Arc::new(fixtures::signed_in())).unwrap();
        let list = app.list_mut(RecordKind::Case);
        list.table.replace_records(records);
        for down in moves {
            if down {
                list.select_next();
            } else {
                list.select_previous();
            }
            let rows = list.table.page().rows.len();
            prop_assert!(rows == 0 || list.selected < rows);
        }
    }
}
