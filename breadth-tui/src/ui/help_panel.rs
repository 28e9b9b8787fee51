//! Help panel (3): keyboard shortcuts.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global");
    key(&mut lines, "1-3", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "R / F5", "Refresh now (clears cached prices and constituents)");
    key(&mut lines, "q", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1 - Snapshot");
    key(&mut lines, "j / k", "Move selection down / up");
    key(&mut lines, "Enter", "Open the selected index in the chart");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 2 - Chart");
    key(&mut lines, "[ / ]  h / l", "Previous / next index");
    key(&mut lines, "a", "Toggle MA20 series");
    key(&mut lines, "s", "Toggle MA50 series");
    key(&mut lines, "d", "Toggle MA200 series");
    key(&mut lines, "r", "Cycle range (1m, 6m, YTD, 1y, All)");
    lines.push(Line::from(""));

    section(&mut lines, "Colours");
    key(
        &mut lines,
        "green",
        &format!("Strong breadth (>= {:.0}%)", app.strong_threshold),
    );
    key(
        &mut lines,
        "pink",
        &format!("Weak breadth (<= {:.0}%)", app.weak_threshold),
    );
    key(&mut lines, "orange list", "Constituent scrape failed, short fallback list in use");

    f.render_widget(Paragraph::new(lines), area);
}

fn section(lines: &mut Vec<Line<'_>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key(lines: &mut Vec<Line<'_>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>16}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
