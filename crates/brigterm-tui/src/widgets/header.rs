//! Header bar showing the app name and the visible page.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::{icons::IconSet, palette, styles};

pub struct MainHeader<'a> {
    title: &'a str,
    server: Option<&'a str>,
    icons: IconSet,
}

impl<'a> MainHeader<'a> {
    pub fn new(title: &'a str, icons: IconSet) -> Self {
        Self {
            title,
            server: None,
            icons,
        }
    }

    /// Show the API server address on the right edge
    pub fn with_server(mut self, server: &'a str) -> Self {
        self.server = Some(server);
        self
    }
}

impl Widget for MainHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let mut spans = vec![
            Span::styled(format!(" {} ", self.icons.terminal()), styles::accent_bold()),
            Span::styled("brigterm", styles::accent_bold()),
        ];
        if !self.title.is_empty() {
            spans.push(Span::styled("  \u{2502}  ", styles::text_muted()));
            spans.push(Span::styled(self.title, styles::text_primary()));
        }
        let left = Line::from(spans);
        let left_width = left.width() as u16;
        buf.set_line(inner.x, inner.y, &left, inner.width);

        if let Some(server) = self.server {
            let right = Line::from(Span::styled(format!("{} ", server), styles::text_secondary()));
            let right_width = right.width() as u16;
            // Drop the address rather than overlap the title
            if left_width + right_width + 2 <= inner.width {
                let x = inner.x + inner.width - right_width;
                buf.set_line(x, inner.y, &right, right_width);
            }
        }
    }
}
