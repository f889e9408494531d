//! Page-button bar for paginated lists.

use casedesk_core::page_window;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct PageBar {
    pub current: usize,
    pub total: usize,
    /// Matching rows after filtering.
    pub rows: usize,
    pub width: usize,
    pub active_style: Style,
    pub inactive_style: Style,
}

impl PageBar {
    /// Labels in display order, e.g. `["‹", "3", "[4]", "5", "›"]`.
    pub fn labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        if self.current > 1 {
            labels.push("‹".to_string());
        }
        for page in page_window(self.current, self.total, self.width) {
            if page == self.current {
                labels.push(format!("[{}]", page));
            } else {
                labels.push(page.to_string());
            }
        }
        if self.current < self.total {
            labels.push("›".to_string());
        }
        labels
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let mut spans: Vec<Span> = self
            .labels()
            .into_iter()
            .map(|label| {
                let style = if label.starts_with('[') {
                    self.active_style.add_modifier(Modifier::BOLD)
                } else {
                    self.inactive_style
                };
                Span::styled(format!(" {} ", label), style)
            })
            .collect();
        spans.push(Span::styled(
            format!("  {} rows", self.rows),
            self.inactive_style,
        ));

        let paragraph = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title("Pages"));
        f.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(current: usize, total: usize) -> PageBar {
        PageBar {
            current,
            total,
            rows: 0,
            width: 3,
            active_style: Style::default(),
            inactive_style: Style::default(),
        }
    }

    #[test]
    fn test_labels_mark_current_page() {
        assert_eq!(bar(1, 1).labels(), vec!["[1]"]);
        assert_eq!(bar(1, 5).labels(), vec!["[1]", "2", "3", "›"]);
        assert_eq!(bar(5, 5).labels(), vec!["‹", "3", "4", "[5]"]);
        assert_eq!(bar(3, 5).labels(), vec!["‹", "2", "[3]", "4", "›"]);
    }
}
