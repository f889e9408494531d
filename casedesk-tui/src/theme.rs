//! Ledger theme and color utilities.

use casedesk_core::{FileKind, RecordStatus};
use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct LedgerTheme {
    pub bg: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl LedgerTheme {
    pub fn ledger() -> Self {
        Self {
            bg: Color::Rgb(18, 20, 24),
            bg_highlight: Color::Rgb(40, 44, 52),
            primary: Color::Rgb(214, 168, 82),
            primary_dim: Color::Rgb(128, 100, 50),
            secondary: Color::Rgb(120, 170, 210),
            success: Color::Rgb(110, 190, 120),
            warning: Color::Rgb(230, 190, 80),
            error: Color::Rgb(220, 90, 80),
            info: Color::Rgb(120, 170, 210),
            text: Color::Rgb(230, 230, 225),
            text_dim: Color::Rgb(140, 140, 135),
            border: Color::Rgb(70, 74, 82),
            border_focus: Color::Rgb(214, 168, 82),
        }
    }
}

pub fn status_color(status: Option<&RecordStatus>, theme: &LedgerTheme) -> Color {
    match status {
        Some(RecordStatus::Pending) => theme.warning,
        Some(RecordStatus::InProgress) => theme.info,
        Some(RecordStatus::Completed) => theme.success,
        Some(RecordStatus::Cancelled) => theme.error,
        Some(RecordStatus::Other(_)) | None => theme.text_dim,
    }
}

pub fn file_kind_color(kind: FileKind, theme: &LedgerTheme) -> Color {
    match kind {
        FileKind::Image => theme.secondary,
        FileKind::Pdf => theme.primary,
        FileKind::Other => theme.text_dim,
    }
}
