//! Record list views: table, page bar and detail or hearings panel.

use crate::state::{App, ListViewState};
use crate::theme::status_color;
use crate::widgets::{DetailPanel, PageBar};
use casedesk_core::{Record, RecordKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, List, ListItem, Row, Table, TableState},
    Frame,
};

/// Table columns shown per kind; the full set is in the detail panel.
const VISIBLE_COLUMNS: usize = 4;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let kind = app.active_view.kind();
    let list = app.list(kind);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(columns[0]);

    render_table(f, app, list, left[0]);

    let pages = list.table.pages();
    let bar = PageBar {
        current: pages.current_page(),
        total: pages.total_pages(),
        rows: list.table.filtered_len(),
        width: app.config.pagination.window,
        active_style: Style::default().fg(app.theme.primary),
        inactive_style: Style::default().fg(app.theme.text_dim),
    };
    bar.render(f, left[1]);

    match &app.hearings {
        Some(_) if kind == RecordKind::Case => {
            let right = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(columns[1]);
            render_detail(f, app, list.selected_record(), right[0]);
            render_hearings(f, app, right[1]);
        }
        _ => render_detail(f, app, list.selected_record(), columns[1]),
    }
}

fn render_table(f: &mut Frame<'_>, app: &App, list: &ListViewState, area: Rect) {
    let kind = list.table.kind();
    let names: Vec<&str> = kind.columns().iter().copied().take(VISIBLE_COLUMNS).collect();

    let mut header: Vec<Cell> = names.iter().map(|n| Cell::from(*n)).collect();
    header.push(Cell::from("status"));

    let page = list.table.page();
    let rows: Vec<Row> = page
        .rows
        .iter()
        .map(|record| {
            let mut cells: Vec<Cell> = names.iter().map(|n| Cell::from(record.text(n))).collect();
            let status = record
                .status
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            cells.push(
                Cell::from(status)
                    .style(Style::default().fg(status_color(record.status.as_ref(), &app.theme))),
            );
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Ratio(1, names.len() as u32 + 1); names.len()];
    widths.push(Constraint::Length(12));

    let mut title = kind.title().to_string();
    if list.loading {
        title.push_str(" (loading)");
    }
    if !list.table.query().is_empty() {
        title.push_str(&format!(" / {}", list.table.query()));
    }

    let table = Table::new(rows, widths)
        .header(
            Row::new(header).style(
                Style::default()
                    .fg(app.theme.primary)
                    .add_modifier(Modifier::BOLD),
            ),
        )
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().bg(app.theme.bg_highlight));

    let mut state = TableState::default();
    if !page.rows.is_empty() {
        state.select(Some(list.selected));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn render_detail(f: &mut Frame<'_>, app: &App, record: Option<&Record>, area: Rect) {
    let fields = record.map(detail_fields).unwrap_or_default();
    let detail = DetailPanel {
        title: "Details",
        fields,
        label_style: Style::default().fg(app.theme.secondary),
        border_style: Style::default().fg(app.theme.border),
    };
    detail.render(f, area);
}

/// Every exported column of a record, in export order.
pub fn detail_fields(record: &Record) -> Vec<(String, String)> {
    let mut fields = record.to_row();
    if let Some((_, files)) = fields.iter_mut().find(|(name, _)| name == "attachments") {
        *files = format!("{} (v to view)", files);
    }
    fields
}

fn render_hearings(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(panel) = &app.hearings else {
        return;
    };
    let items: Vec<ListItem> = if panel.loading {
        vec![ListItem::new("Loading...")]
    } else if panel.hearings.is_empty() {
        vec![ListItem::new("No hearings scheduled")]
    } else {
        panel
            .hearings
            .iter()
            .map(|h| ListItem::new(Line::from(h.hearing_date.format("%d %b %Y").to_string())))
            .collect()
    };
    let list = List::new(items).block(
        Block::default()
            .title(format!("Hearings for {} (a add, Esc close)", panel.case_id))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border_focus)),
    );
    f.render_widget(list, area);
}
