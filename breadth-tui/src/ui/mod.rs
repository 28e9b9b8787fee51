//! Top-level UI layout: active panel with a one-line status bar.

pub mod chart_panel;
pub mod help_panel;
pub mod snapshot_panel;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::app::{AppState, Panel};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    draw_panel(f, chunks[0], app);
    status_bar::render(f, chunks[1], app);
}

fn draw_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let panel = app.active_panel;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} [{}] ", panel.label(), panel.index() + 1))
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match panel {
        Panel::Snapshot => snapshot_panel::render(f, inner, app),
        Panel::Chart => chart_panel::render(f, inner, app),
        Panel::Help => help_panel::render(f, inner, app),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use breadth_core::data::TickerOrigin;
    use breadth_core::domain::{BreadthHistory, BreadthOutput, BreadthPoint, BreadthSnapshot};
    use breadth_runner::{DashboardReport, IndexReport};
    use chrono::{Duration, NaiveDate};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::path::PathBuf;
    use std::sync::{mpsc, Arc};

    fn report() -> DashboardReport {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points = (0..90)
            .map(|d| BreadthPoint {
                date: start + Duration::days(d),
                pct_above_ma20: 85.0,
                pct_above_ma50: 50.0,
                pct_above_ma200: 10.0,
            })
            .collect();
        let history = BreadthHistory::new(points);
        let output = BreadthOutput {
            snapshot: BreadthSnapshot::from_history("FBM KLCI", &history),
            history,
        };
        DashboardReport {
            rows: vec![
                IndexReport {
                    name: "S&P 500 (SPX)".into(),
                    slug: "sp500".into(),
                    ticker_count: 3,
                    origin: TickerOrigin::Fallback,
                    output: None,
                },
                IndexReport {
                    name: "FBM KLCI".into(),
                    slug: "klci".into(),
                    ticker_count: 30,
                    origin: TickerOrigin::Static,
                    output: Some(Arc::new(output)),
                },
            ],
            updated_at: NaiveDate::from_ymd_opt(2024, 3, 30)
                .unwrap()
                .and_hms_opt(9, 15, 0)
                .unwrap(),
            synthetic: false,
        }
    }

    fn app_with_report() -> AppState {
        let (tx, _rx) = mpsc::channel();
        let (_tx2, rx2) = mpsc::channel();
        let names = vec!["S&P 500 (SPX)".to_string(), "FBM KLCI".to_string()];
        let mut app = AppState::new(tx, rx2, names, PathBuf::from("."));
        app.report = Some(report());
        app
    }

    fn render(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn snapshot_panel_shows_rows() {
        let screen = render(&app_with_report());
        assert!(screen.contains("Snapshot [1]"));
        assert!(screen.contains("FBM KLCI"));
        assert!(screen.contains("85.00"));
        assert!(screen.contains("no data available"));
        assert!(screen.contains("2024-03-30 09:15"));
    }

    #[test]
    fn chart_panel_renders_selected_index() {
        let mut app = app_with_report();
        app.active_panel = Panel::Chart;
        app.chart.selected = 1;
        let screen = render(&app);
        assert!(screen.contains("Chart [2]"));
        assert!(screen.contains("FBM KLCI"));
        assert!(screen.contains("2024-01-01"));
        assert!(screen.contains("100"));
    }

    #[test]
    fn chart_panel_without_data() {
        let mut app = app_with_report();
        app.active_panel = Panel::Chart;
        let screen = render(&app);
        assert!(screen.contains("no data available"));
    }

    #[test]
    fn help_panel_lists_keys() {
        let mut app = app_with_report();
        app.active_panel = Panel::Help;
        let screen = render(&app);
        assert!(screen.contains("Toggle MA20"));
    }

    #[test]
    fn loading_state_renders() {
        let (tx, _rx) = mpsc::channel();
        let (_tx2, rx2) = mpsc::channel();
        let mut app = AppState::new(tx, rx2, vec!["FBM KLCI".into()], PathBuf::from("."));
        app.refresh.in_progress = true;
        let screen = render(&app);
        assert!(screen.contains("Loading"));
    }
}
