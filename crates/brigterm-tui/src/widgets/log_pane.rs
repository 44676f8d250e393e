//! Tail view of a log buffer

use brigterm_app::LogView;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::styles;

pub struct LogPane<'a> {
    log: &'a LogView,
}

impl<'a> LogPane<'a> {
    pub fn new(log: &'a LogView) -> Self {
        Self { log }
    }

    /// Index of the first line shown in a viewport of `height` lines.
    fn first_visible(&self, height: usize) -> usize {
        self.log
            .line_count
            .saturating_sub(height)
            .saturating_sub(self.log.scroll_back)
    }
}

impl Widget for LogPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(self.log.scroll_back == 0)
            .title(Span::styled(format!(" {} ", self.log.title), styles::text_primary()))
            .title_bottom(Line::from(Span::styled(
                format!(" {} ", self.log.status),
                styles::text_secondary(),
            )));
        let inner = block.inner(area);
        block.render(area, buf);

        let height = inner.height as usize;
        let first = self.first_visible(height);
        let lines: Vec<Line> = self
            .log
            .text
            .lines()
            .skip(first)
            .take(height)
            .map(|l| Line::from(Span::styled(l, styles::text_primary())))
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;

    fn log(lines: usize, scroll_back: usize) -> LogView {
        let text: String = (0..lines).map(|i| format!("line {:02}\n", i)).collect();
        LogView {
            title: "Worker logs e1".to_string(),
            text,
            line_count: lines,
            scroll_back,
            status: "streaming".to_string(),
        }
    }

    #[test]
    fn test_follows_tail() {
        let view = log(30, 0);
        let mut term = TestTerminal::with_size(40, 7);
        term.render_widget(LogPane::new(&view), Rect::new(0, 0, 40, 7));

        // 5 inner lines: 25..=29
        assert!(term.line_contains(1, "line 25"));
        assert!(term.line_contains(5, "line 29"));
        assert!(!term.buffer_contains("line 24"));
        assert!(term.line_contains(6, "streaming"));
    }

    #[test]
    fn test_scroll_back_moves_window() {
        let view = log(30, 10);
        let mut term = TestTerminal::with_size(40, 7);
        term.render_widget(LogPane::new(&view), Rect::new(0, 0, 40, 7));

        assert!(term.line_contains(1, "line 15"));
        assert!(term.line_contains(5, "line 19"));
    }

    #[test]
    fn test_scroll_back_past_start_shows_top() {
        let view = log(8, 50);
        let mut term = TestTerminal::with_size(40, 7);
        term.render_widget(LogPane::new(&view), Rect::new(0, 0, 40, 7));
        assert!(term.line_contains(1, "line 00"));
    }

    #[test]
    fn test_short_log_starts_at_top() {
        let view = log(2, 0);
        let mut term = TestTerminal::with_size(40, 7);
        term.render_widget(LogPane::new(&view), Rect::new(0, 0, 40, 7));
        assert!(term.line_contains(1, "line 00"));
        assert!(term.line_contains(2, "line 01"));
    }
}
