//! Bottom status bar: refresh progress, last status message, panel hints.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    spans.push(Span::styled(" 1:Snapshot 2:Chart 3:Help R:Refresh q:Quit", theme::muted()));
    spans.push(Span::raw(" | "));

    if app.synthetic {
        spans.push(Span::styled("SYNTHETIC ", theme::warning()));
    }

    if app.refresh.in_progress {
        let current = app.refresh.current.as_deref().unwrap_or("starting");
        spans.push(Span::styled(
            format!(
                "Loading {}/{}: {current}",
                app.refresh.done, app.refresh.total
            ),
            theme::accent(),
        ));
    } else if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
