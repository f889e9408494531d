//! View rendering dispatch.

pub mod form;
pub mod list;
pub mod overlay;
pub mod viewer;

use crate::nav::View;
use crate::notifications::NotificationLevel;
use crate::state::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    if app.active_view.is_form() {
        form::render(f, app, layout[1]);
    } else {
        list::render(f, app, layout[1]);
    }
    if app.viewer.is_open() {
        viewer::render(f, app, layout[1]);
    }

    render_footer(f, app, layout[2]);

    if app.modal.is_some() {
        overlay::render_modal(f, app, f.size());
    }
    if app.prompt.is_some() {
        overlay::render_prompt(f, app, layout[1]);
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let user = app
        .session
        .current_session()
        .map(|s| format!("User: {}", s.user_id))
        .unwrap_or_else(|| "Signed out".to_string());
    let tabs: Vec<String> = View::all()
        .iter()
        .enumerate()
        .map(|(i, view)| {
            if *view == app.active_view {
                format!("[{} {}]", i + 1, view.title())
            } else {
                format!(" {} {} ", i + 1, view.title())
            }
        })
        .collect();
    let title = format!("CASEDESK | {}", user);
    let header = Paragraph::new(tabs.join(" "))
        .style(Style::default().fg(app.theme.text))
        .block(Block::default().borders(Borders::ALL).title(Span::styled(
            title,
            Style::default().fg(app.theme.primary),
        )));
    f.render_widget(header, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let help = if app.viewer.is_open() {
        "h/l previous/next file • Esc close"
    } else if app.active_view.is_form() {
        "j/k field • h/l choose option • Enter edit • f attach • d detach • Ctrl+s submit • Esc back"
    } else {
        "j/k row • h/l page • / search • v files • s status • H hearings • x export • n new • ? help"
    };
    let (text, style) = match app.notifications.last() {
        Some(note) => (
            format!("{}: {}", note.level.label(), note.message),
            Style::default().fg(notification_color(app, note.level)),
        ),
        None => (help.to_string(), Style::default().fg(app.theme.text_dim)),
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}

fn notification_color(app: &App, level: NotificationLevel) -> Color {
    match level {
        NotificationLevel::Info => app.theme.info,
        NotificationLevel::Warning => app.theme.warning,
        NotificationLevel::Error => app.theme.error,
        NotificationLevel::Success => app.theme.success,
    }
}

/// Rectangle of `percent_x` by `percent_y` centred in `area`.
pub fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
