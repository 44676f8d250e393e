//! Selectable table with a leading phase icon column

use brigterm_app::TableView;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget},
};

use crate::theme::{icons::IconSet, styles};

pub struct ObjectTable<'a> {
    table: &'a TableView,
    icons: IconSet,
}

impl<'a> ObjectTable<'a> {
    pub fn new(table: &'a TableView, icons: IconSet) -> Self {
        Self { table, icons }
    }
}

impl Widget for ObjectTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = self.table;
        let block = styles::phase_block(view.phase)
            .title(Span::styled(format!(" {} ", view.title), styles::text_primary()));

        if view.rows.is_empty() {
            Paragraph::new(Line::from(Span::styled("Nothing to show", styles::text_muted())))
                .block(block)
                .render(area, buf);
            return;
        }

        let header = Row::new(
            std::iter::once(Cell::from(""))
                .chain(view.header.iter().map(|h| Cell::from(*h))),
        )
        .style(styles::accent_bold());

        let rows = view.rows.iter().map(|row| {
            let tone = styles::phase(row.phase);
            let icon = Cell::from(Span::styled(self.icons.phase(row.phase), tone));
            Row::new(
                std::iter::once(icon).chain(row.cells.iter().map(|c| Cell::from(c.as_str()))),
            )
            .style(tone)
        });

        let widths = std::iter::once(Constraint::Length(2))
            .chain(view.header.iter().map(|_| Constraint::Fill(1)));

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(styles::focused_selected());

        let mut state = TableState::default().with_selected(view.selected);
        StatefulWidget::render(table, area, buf, &mut state);
    }
}
