//! Modal dialogs and the text prompt.

use crate::state::{App, Modal};
use crate::views::centered;
use casedesk_core::RecordStatus;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

const HELP: &[&str] = &[
    "Tab / Shift+Tab or 1-6   switch view",
    "j / k                    move selection or field",
    "h / l                    page, file or option",
    "Home / End               first or last page",
    "/                        search the list",
    "v or Enter               view attachments",
    "s                        change status",
    "H / a                    hearings / add hearing (cases)",
    "x                        export the filtered list to CSV",
    "n                        new record",
    "f / d                    attach / detach file (forms)",
    "Ctrl+s                   submit form",
    "Ctrl+r                   reload",
    "q                        quit",
];

pub fn render_modal(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(modal) = &app.modal else {
        return;
    };
    let border = Style::default().fg(app.theme.border_focus);
    match modal {
        Modal::Help => {
            let popup = centered(area, 60, 60);
            let lines: Vec<Line> = HELP.iter().map(|l| Line::from(*l)).collect();
            let widget = Paragraph::new(lines).block(
                Block::default()
                    .title("Keybindings")
                    .borders(Borders::ALL)
                    .border_style(border),
            );
            f.render_widget(Clear, popup);
            f.render_widget(widget, popup);
        }
        Modal::StatusPicker { id, choice, .. } => {
            let popup = centered(area, 40, 30);
            let items: Vec<ListItem> = RecordStatus::choices()
                .iter()
                .map(|s| ListItem::new(s.to_string()))
                .collect();
            let mut state = ListState::default();
            state.select(Some(*choice));
            let list = List::new(items)
                .block(
                    Block::default()
                        .title(format!("Status for {}", id))
                        .borders(Borders::ALL)
                        .border_style(border),
                )
                .highlight_style(Style::default().bg(app.theme.bg_highlight));
            f.render_widget(Clear, popup);
            f.render_stateful_widget(list, popup, &mut state);
        }
        Modal::ConfirmStatus { id, status, .. } => {
            let popup = centered(area, 40, 20);
            let widget = Paragraph::new(format!(
                "Set status of {} to {}?\n\nEnter confirm • Esc cancel",
                id, status
            ))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title("Confirm")
                    .borders(Borders::ALL)
                    .border_style(border),
            );
            f.render_widget(Clear, popup);
            f.render_widget(widget, popup);
        }
    }
}

/// Prompt docked to the bottom of `area`.
pub fn render_prompt(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(prompt) = &app.prompt else {
        return;
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);
    f.render_widget(Clear, rows[1]);
    f.render_widget(prompt.input.widget(), rows[1]);
}
