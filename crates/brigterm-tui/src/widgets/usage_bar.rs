//! One-line key usage footer

use brigterm_app::KeyHint;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::styles;

pub struct UsageBar<'a> {
    hints: &'a [KeyHint],
}

impl<'a> UsageBar<'a> {
    pub fn new(hints: &'a [KeyHint]) -> Self {
        Self { hints }
    }
}

impl Widget for UsageBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::with_capacity(self.hints.len() * 3);
        for hint in self.hints {
            spans.push(Span::styled(format!(" ({})", hint.key), styles::keybinding()));
            spans.push(Span::styled(format!(" {} ", hint.action), styles::text_secondary()));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
