//! Event types for the TUI event loop.
//!
//! Gateway calls run as spawned tasks and report back through these events.
//! Errors are carried as display strings since they only reach notifications.

use casedesk_core::{FetchTicket, Hearing, Record, RecordId, RecordKind, SelectOption};
use crossterm::event::KeyEvent;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Tick,
    Resize {
        width: u16,
        height: u16,
    },
    RecordsLoaded {
        kind: RecordKind,
        result: Result<Vec<Record>, String>,
    },
    OptionsLoaded {
        kind: RecordKind,
        ticket: FetchTicket,
        result: Result<Vec<SelectOption>, String>,
    },
    StatusUpdated {
        kind: RecordKind,
        id: RecordId,
        result: Result<(), String>,
    },
    Submitted {
        kind: RecordKind,
        result: Result<(), String>,
    },
    HearingsLoaded {
        case_id: RecordId,
        result: Result<Vec<Hearing>, String>,
    },
    HearingAdded {
        case_id: RecordId,
        result: Result<(), String>,
    },
    Exported {
        kind: RecordKind,
        result: Result<PathBuf, String>,
    },
}
