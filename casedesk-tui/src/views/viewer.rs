//! Attachment viewer overlay.
//!
//! A terminal cannot draw the file itself, so the viewer shows its kind and
//! the resolved URL for opening elsewhere.

use crate::state::App;
use crate::theme::file_kind_color;
use crate::views::centered;
use casedesk_core::{resolve_url, FileKind};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (Some(file), Some(kind), Some((index, len))) = (
        app.viewer.current(),
        app.viewer.current_kind(),
        app.viewer.position(),
    ) else {
        return;
    };

    let label = match kind {
        FileKind::Image => "Image",
        FileKind::Pdf => "PDF document",
        FileKind::Other => "Unsupported file type",
    };
    let lines = vec![
        Line::from(Span::styled(
            label,
            Style::default().fg(file_kind_color(kind, &app.theme)),
        )),
        Line::from(""),
        Line::from(file.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            resolve_url(&app.config.upload_base_url, file),
            Style::default().fg(app.theme.secondary),
        )),
    ];

    let popup = centered(area, 70, 50);
    let widget = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(format!("File {} / {}", index, len))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border_focus)),
    );
    f.render_widget(Clear, popup);
    f.render_widget(widget, popup);
}
