//! Snapshot panel (1): latest breadth per index, coloured by threshold.

use breadth_core::domain::MaWindow;
use breadth_runner::IndexReport;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub const NO_DATA: &str = "no data available";

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(area);

    f.render_widget(Paragraph::new(header_line(app)), chunks[0]);

    match &app.report {
        Some(report) => render_table(f, chunks[1], app, &report.rows),
        None => render_empty(f, chunks[1], app),
    }
}

fn header_line(app: &AppState) -> Line<'static> {
    let mut spans = Vec::new();
    match &app.report {
        Some(report) => {
            spans.push(Span::styled("Last updated: ", theme::muted()));
            spans.push(Span::styled(
                report.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                theme::text(),
            ));
        }
        None => spans.push(Span::styled("Not loaded yet", theme::muted())),
    }
    if app.synthetic {
        spans.push(Span::styled("  [synthetic data]", theme::warning()));
    }
    spans.push(Span::styled(
        format!(
            "  strong >= {:.0}%  weak <= {:.0}%",
            app.strong_threshold, app.weak_threshold
        ),
        theme::muted(),
    ));
    Line::from(spans)
}

fn render_empty(f: &mut Frame, area: Rect, app: &AppState) {
    let msg = if app.refresh.in_progress {
        "Loading... fetching prices for every index."
    } else {
        "Press R to load the dashboard."
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(msg, theme::muted()))),
        area,
    );
}

fn render_table(f: &mut Frame, area: Rect, app: &AppState, rows: &[IndexReport]) {
    let header = Row::new(
        ["Index", "Tickers", "List"]
            .into_iter()
            .map(String::from)
            .chain(MaWindow::ALL.iter().map(|w| w.label().to_string()))
            .chain(std::iter::once(String::new()))
            .map(|h| Cell::from(h).style(theme::header())),
    );

    let body: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut cells = vec![
                Cell::from(row.name.clone()).style(theme::text()),
                Cell::from(row.ticker_count.to_string()).style(theme::muted()),
                Cell::from(row.origin.label()).style(origin_style(row)),
            ];
            match row.snapshot() {
                Some(snap) => {
                    for w in MaWindow::ALL {
                        let v = snap.value(w);
                        let style = theme::level_style(app.classify(v));
                        cells.push(Cell::from(format!("{v:.2}")).style(style));
                    }
                }
                None => {
                    let dash = || Cell::from("-").style(theme::muted());
                    cells.extend(MaWindow::ALL.iter().map(|_| dash()));
                    cells.push(Cell::from(NO_DATA).style(theme::negative()));
                }
            }
            let r = Row::new(cells);
            if i == app.chart.selected {
                r.style(theme::selected_row())
            } else {
                r
            }
        })
        .collect();

    let widths = [
        Constraint::Min(18),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(18),
    ];
    let table = Table::new(body, widths).header(header).column_spacing(2);
    f.render_widget(table, area);
}

fn origin_style(row: &IndexReport) -> ratatui::style::Style {
    match row.origin {
        breadth_core::data::TickerOrigin::Fallback => theme::warning(),
        _ => theme::muted(),
    }
}
