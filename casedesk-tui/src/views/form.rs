//! Record entry forms.

use crate::state::{App, FormViewState};
use casedesk_core::{FieldInput, FieldSpec};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let kind = app.active_view.kind();
    let form = app.form(kind);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(8)])
        .split(columns[1]);

    render_fields(f, app, form, columns[0]);
    render_options(f, app, form, right[0]);
    render_files(f, app, form, right[1]);
}

fn render_fields(f: &mut Frame<'_>, app: &App, form: &FormViewState, area: Rect) {
    let items: Vec<ListItem> = form
        .draft
        .fields()
        .iter()
        .map(|spec| {
            let marker = if spec.required { "*" } else { " " };
            let value = form.draft.get(spec.name);
            let value_style = if value.is_empty() {
                Style::default().fg(app.theme.text_dim)
            } else {
                Style::default().fg(app.theme.text)
            };
            let shown = if value.is_empty() {
                placeholder(spec).to_string()
            } else {
                value.to_string()
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{}{:<20}", marker, spec.label),
                    Style::default().fg(app.theme.secondary),
                ),
                Span::styled(shown, value_style),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(form.focus));

    let list = List::new(items)
        .block(
            Block::default()
                .title(app.active_view.title())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_focus)),
        )
        .highlight_style(
            Style::default()
                .bg(app.theme.bg_highlight)
                .add_modifier(Modifier::BOLD),
        );
    f.render_stateful_widget(list, area, &mut state);
}

fn placeholder(spec: &FieldSpec) -> &'static str {
    match spec.input {
        FieldInput::Date => "YYYY-MM-DD",
        FieldInput::Number => "0",
        FieldInput::Cascade => "h/l to choose",
        FieldInput::Text | FieldInput::LongText => "",
    }
}

/// Options of the focused cascade level, with the selection highlighted.
fn render_options(f: &mut Frame<'_>, app: &App, form: &FormViewState, area: Rect) {
    let block = Block::default().title("Options").borders(Borders::ALL);
    let focused = form
        .focused()
        .filter(|spec| spec.input == FieldInput::Cascade);
    let (Some(spec), Some(selector)) = (focused, form.selector.as_ref()) else {
        let hint = Paragraph::new("Enter edits the highlighted field.")
            .style(Style::default().fg(app.theme.text_dim))
            .block(block)
            .wrap(Wrap { trim: true });
        f.render_widget(hint, area);
        return;
    };

    let pending = selector.level(spec.name).is_some_and(|l| l.pending);
    let options = selector.options(spec.name);
    let items: Vec<ListItem> = if pending {
        vec![ListItem::new("Loading...")]
    } else if options.is_empty() {
        vec![ListItem::new("No options; Enter to type a value")]
    } else {
        options
            .iter()
            .map(|o| ListItem::new(o.label.clone()))
            .collect()
    };

    let mut state = ListState::default();
    if let Some(selected) = selector.selected(spec.name) {
        state.select(options.iter().position(|o| o.id == selected));
    }
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(app.theme.primary));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_files(f: &mut Frame<'_>, app: &App, form: &FormViewState, area: Rect) {
    let slot = form.draft.kind().file_slot();
    let title = format!(
        "Files ({}{})",
        slot.part,
        if slot.required { ", required" } else { "" }
    );
    let items: Vec<ListItem> = form
        .draft
        .files()
        .iter()
        .map(|path| ListItem::new(path.display().to_string()))
        .collect();
    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(list, area);
}
