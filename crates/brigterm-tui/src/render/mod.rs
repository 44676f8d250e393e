//! Main render/view function

use brigterm_app::PageView;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{icons::IconSet, styles};
use crate::widgets::{InfoPaneWidget, LogPane, MainHeader, ObjectTable, UsageBar};

/// Static context drawn on every frame
#[derive(Debug, Clone, Default)]
pub struct Chrome {
    pub icons: IconSet,
    /// API server address shown in the header
    pub server: Option<String>,
}

/// Render the complete UI for one page snapshot
pub fn view(frame: &mut Frame, page: &PageView, chrome: &Chrome) {
    let error_height = u16::from(page.error.is_some());
    let [header_area, body_area, error_area, usage_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(error_height),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let mut header = MainHeader::new(&page.title, chrome.icons);
    if let Some(server) = &chrome.server {
        header = header.with_server(server);
    }
    frame.render_widget(header, header_area);

    render_body(frame, body_area, page, chrome.icons);

    if let Some(error) = &page.error {
        let line = Line::from(vec![
            Span::styled(format!(" {} ", chrome.icons.alert()), styles::status_red()),
            Span::styled(error.as_str(), styles::status_red()),
        ]);
        frame.render_widget(Paragraph::new(line), error_area);
    }

    frame.render_widget(UsageBar::new(&page.hints), usage_area);
}

/// Info panes side by side on top, then the table or log filling the rest
fn render_body(frame: &mut Frame, area: Rect, page: &PageView, icons: IconSet) {
    let has_main = page.table.is_some() || page.log.is_some();

    if page.panes.is_empty() {
        if has_main {
            render_main(frame, area, page, icons);
        } else {
            let loading = Paragraph::new(Line::from(Span::styled(" Loading…", styles::text_muted())));
            frame.render_widget(loading, area);
        }
        return;
    }

    let tallest = page.panes.iter().map(|p| p.fields.len()).max().unwrap_or(0);
    let pane_height = u16::try_from(tallest).unwrap_or(u16::MAX).saturating_add(2);

    let panes_area = if has_main {
        let [top, rest] =
            Layout::vertical([Constraint::Length(pane_height), Constraint::Min(0)]).areas(area);
        render_main(frame, rest, page, icons);
        top
    } else {
        area
    };

    let columns =
        Layout::horizontal(page.panes.iter().map(|_| Constraint::Fill(1))).split(panes_area);
    for (pane, rect) in page.panes.iter().zip(columns.iter()) {
        frame.render_widget(InfoPaneWidget::new(pane), *rect);
    }
}

fn render_main(frame: &mut Frame, area: Rect, page: &PageView, icons: IconSet) {
    if let Some(table) = &page.table {
        frame.render_widget(ObjectTable::new(table, icons), area);
    } else if let Some(log) = &page.log {
        frame.render_widget(LogPane::new(log), area);
    }
}
