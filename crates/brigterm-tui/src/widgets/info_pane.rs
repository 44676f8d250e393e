//! Bordered `label: value` block

use brigterm_app::InfoPane;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::styles;

pub struct InfoPaneWidget<'a> {
    pane: &'a InfoPane,
}

impl<'a> InfoPaneWidget<'a> {
    pub fn new(pane: &'a InfoPane) -> Self {
        Self { pane }
    }
}

impl Widget for InfoPaneWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::phase_block(self.pane.phase)
            .title(Span::styled(format!(" {} ", self.pane.title), styles::text_primary()));

        let lines: Vec<Line> = self
            .pane
            .fields
            .iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{}: ", label), styles::text_secondary()),
                    Span::styled(value.as_str(), styles::text_primary()),
                ])
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
