//! Chart panel (2): breadth history of the selected index.

use breadth_core::domain::{BreadthPoint, MaWindow};
use ratatui::layout::Rect;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;
use crate::ui::snapshot_panel::NO_DATA;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let name = app.selected_name().unwrap_or("");
    let row = app.selected_row();

    match row.and_then(|r| r.output.as_ref()) {
        Some(output) => {
            let points = output.history.range(app.chart.range);
            if points.is_empty() {
                render_message(f, area, name, "no history in this range");
            } else {
                render_chart(f, area, app, name, points);
            }
        }
        None if app.report.is_none() => render_message(f, area, name, "Loading..."),
        None => render_message(f, area, name, NO_DATA),
    }
}

fn render_message(f: &mut Frame, area: Rect, name: &str, msg: &str) {
    let lines = vec![
        Line::from(Span::styled(name.to_string(), theme::accent_bold())),
        Line::from(""),
        Line::from(Span::styled(msg.to_string(), theme::muted())),
        Line::from(""),
        Line::from(Span::styled(
            "[ / ] select index   a/s/d toggle MA20/MA50/MA200   r range",
            theme::muted(),
        )),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

/// (x, y) pairs with x as days since the first point.
pub fn series_data(points: &[BreadthPoint], window: MaWindow) -> Vec<(f64, f64)> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    points
        .iter()
        .map(|p| ((p.date - first.date).num_days() as f64, p.value(window)))
        .collect()
}

fn render_chart(f: &mut Frame, area: Rect, app: &AppState, name: &str, points: &[BreadthPoint]) {
    let visible = app.chart.visible();
    let data: Vec<(MaWindow, Vec<(f64, f64)>)> = visible
        .iter()
        .map(|w| (*w, series_data(points, *w)))
        .collect();

    let datasets: Vec<Dataset> = data
        .iter()
        .map(|(w, d)| {
            Dataset::default()
                .name(w.label())
                .marker(symbols::Marker::Braille)
                .style(theme::series_style(*w))
                .graph_type(GraphType::Line)
                .data(d)
        })
        .collect();

    let first = points[0].date;
    let last = points[points.len() - 1].date;
    let mid = first + (last - first) / 2;
    let x_max = ((last - first).num_days() as f64).max(1.0);

    let title = format!(
        "{name} | {} | {}",
        app.chart.range.label(),
        if visible.is_empty() {
            "no series selected (a/s/d)".to_string()
        } else {
            visible.iter().map(|w| w.label()).collect::<Vec<_>>().join(", ")
        }
    );

    let chart = Chart::new(datasets)
        .block(ratatui::widgets::Block::default().title(Span::styled(title, theme::accent_bold())))
        .x_axis(
            Axis::default()
                .style(theme::muted())
                .bounds([0.0, x_max])
                .labels(vec![
                    Span::styled(first.to_string(), theme::muted()),
                    Span::styled(mid.to_string(), theme::muted()),
                    Span::styled(last.to_string(), theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("% above", theme::muted()))
                .style(theme::muted())
                .bounds([0.0, 100.0])
                .labels(vec![
                    Span::styled("0", theme::muted()),
                    Span::styled("50", theme::muted()),
                    Span::styled("100", theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn series_x_is_calendar_days() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let points = vec![
            BreadthPoint {
                date: d(5),
                pct_above_ma20: 10.0,
                pct_above_ma50: 20.0,
                pct_above_ma200: 30.0,
            },
            BreadthPoint {
                date: d(8),
                pct_above_ma20: 40.0,
                pct_above_ma50: 50.0,
                pct_above_ma200: 60.0,
            },
        ];
        assert_eq!(series_data(&points, MaWindow::Ma50), vec![(0.0, 20.0), (3.0, 50.0)]);
        assert!(series_data(&[], MaWindow::Ma20).is_empty());
    }
}
