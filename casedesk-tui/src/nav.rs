//! Navigation and view switching utilities.

use casedesk_core::RecordKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum View {
    Cases,
    LandRecords,
    Miscellaneous,
    NewCase,
    NewLand,
    NewMisc,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Cases => "Cases",
            View::LandRecords => "Land Records",
            View::Miscellaneous => "Miscellaneous",
            View::NewCase => "New Case",
            View::NewLand => "New Land Record",
            View::NewMisc => "New Misc Record",
        }
    }

    pub fn all() -> &'static [View] {
        &[
            View::Cases,
            View::LandRecords,
            View::Miscellaneous,
            View::NewCase,
            View::NewLand,
            View::NewMisc,
        ]
    }

    pub fn index(&self) -> usize {
        Self::all()
            .iter()
            .position(|v| v == self)
            .unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<View> {
        Self::all().get(index).copied()
    }

    pub fn next(&self) -> View {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(&self) -> View {
        let idx = self.index();
        let all = Self::all();
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        all[prev]
    }

    /// Record kind shown or created by this view.
    pub fn kind(&self) -> RecordKind {
        match self {
            View::Cases | View::NewCase => RecordKind::Case,
            View::LandRecords | View::NewLand => RecordKind::Land,
            View::Miscellaneous | View::NewMisc => RecordKind::Miscellaneous,
        }
    }

    pub fn is_form(&self) -> bool {
        matches!(self, View::NewCase | View::NewLand | View::NewMisc)
    }

    pub fn list_for(kind: RecordKind) -> View {
        match kind {
            RecordKind::Case => View::Cases,
            RecordKind::Land => View::LandRecords,
            RecordKind::Miscellaneous => View::Miscellaneous,
        }
    }

    pub fn form_for(kind: RecordKind) -> View {
        match kind {
            RecordKind::Case => View::NewCase,
            RecordKind::Land => View::NewLand,
            RecordKind::Miscellaneous => View::NewMisc,
        }
    }
}
