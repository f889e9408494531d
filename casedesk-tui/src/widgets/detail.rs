//! Bordered label/value panel for the selected record.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct DetailPanel<'a> {
    pub title: &'a str,
    pub fields: Vec<(String, String)>,
    pub label_style: Style,
    pub border_style: Style,
}

impl<'a> DetailPanel<'a> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let lines: Vec<Line> = if self.fields.is_empty() {
            vec![Line::from("Nothing selected")]
        } else {
            self.fields
                .iter()
                .map(|(label, value)| {
                    Line::from(vec![
                        Span::styled(format!("{}: ", label), self.label_style),
                        Span::raw(value.as_str()),
                    ])
                })
                .collect()
        };

        let widget = Paragraph::new(Text::from(lines))
            .block(
                Block::default()
                    .title(self.title)
                    .borders(Borders::ALL)
                    .border_style(self.border_style),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(widget, area);
    }
}
