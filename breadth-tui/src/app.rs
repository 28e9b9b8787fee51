//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};

use breadth_core::domain::{BreadthLevel, HistoryRange, MaWindow};
use breadth_runner::{DashboardReport, IndexReport};
use serde::{Deserialize, Serialize};

use crate::worker::{WorkerCommand, WorkerResponse};

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Panel {
    Snapshot,
    Chart,
    Help,
}

impl Panel {
    pub const COUNT: usize = 3;

    pub fn index(self) -> usize {
        match self {
            Panel::Snapshot => 0,
            Panel::Chart => 1,
            Panel::Help => 2,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Snapshot),
            1 => Some(Panel::Chart),
            2 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Snapshot => "Snapshot",
            Panel::Chart => "Chart",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        match self {
            Panel::Snapshot => Panel::Chart,
            Panel::Chart => Panel::Help,
            Panel::Help => Panel::Snapshot,
        }
    }

    pub fn prev(self) -> Panel {
        match self {
            Panel::Snapshot => Panel::Help,
            Panel::Chart => Panel::Snapshot,
            Panel::Help => Panel::Chart,
        }
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Index selection and series toggles shared by the snapshot and chart
/// panels.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    pub selected: usize,
    /// Visible series, indexed by `MaWindow::index`.
    pub series: [bool; 3],
    pub range: HistoryRange,
}

impl Default for ChartState {
    fn default() -> Self {
        Self {
            selected: 0,
            series: [false, true, false],
            range: HistoryRange::All,
        }
    }
}

impl ChartState {
    pub fn shows(&self, window: MaWindow) -> bool {
        self.series[window.index()]
    }

    pub fn toggle(&mut self, window: MaWindow) {
        let slot = &mut self.series[window.index()];
        *slot = !*slot;
    }

    /// Visible windows in display order.
    pub fn visible(&self) -> Vec<MaWindow> {
        MaWindow::ALL
            .into_iter()
            .filter(|w| self.shows(*w))
            .collect()
    }

    pub fn select_next(&mut self, count: usize) {
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    pub fn select_prev(&mut self, count: usize) {
        if count > 0 {
            self.selected = (self.selected + count - 1) % count;
        }
    }

    pub fn cycle_range(&mut self) {
        self.range = self.range.next();
    }
}

/// Progress of the refresh currently running in the worker.
#[derive(Debug, Clone, Default)]
pub struct RefreshState {
    pub in_progress: bool,
    pub current: Option<String>,
    pub done: usize,
    pub total: usize,
}

/// Top-level application state.
pub struct AppState {
    pub active_panel: Panel,
    pub running: bool,

    /// Display names of every index, in dashboard order.
    pub index_names: Vec<String>,
    pub report: Option<DashboardReport>,
    pub chart: ChartState,
    pub refresh: RefreshState,
    pub strong_threshold: f64,
    pub weak_threshold: f64,
    pub synthetic: bool,

    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    pub status_message: Option<(String, StatusLevel)>,
    pub state_path: PathBuf,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        index_names: Vec<String>,
        state_path: PathBuf,
    ) -> Self {
        Self {
            active_panel: Panel::Snapshot,
            running: true,
            index_names,
            report: None,
            chart: ChartState::default(),
            refresh: RefreshState::default(),
            strong_threshold: breadth_core::domain::DEFAULT_STRONG_THRESHOLD,
            weak_threshold: breadth_core::domain::DEFAULT_WEAK_THRESHOLD,
            synthetic: false,
            worker_tx,
            worker_rx,
            status_message: None,
            state_path,
        }
    }

    pub fn index_count(&self) -> usize {
        self.index_names.len()
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.index_names.get(self.chart.selected).map(String::as_str)
    }

    /// Select an index by display name; unknown names are ignored.
    pub fn select_by_name(&mut self, name: &str) -> bool {
        match self.index_names.iter().position(|n| n == name) {
            Some(i) => {
                self.chart.selected = i;
                true
            }
            None => false,
        }
    }

    /// Report row for the selected index, once a refresh has completed.
    pub fn selected_row(&self) -> Option<&IndexReport> {
        let name = self.selected_name()?;
        self.report.as_ref()?.rows.iter().find(|r| r.name == name)
    }

    pub fn classify(&self, value: f64) -> BreadthLevel {
        BreadthLevel::classify(value, self.strong_threshold, self.weak_threshold)
    }

    /// Ask the worker for a refresh. Ignored while one is running.
    pub fn request_refresh(&mut self, invalidate: bool) {
        if self.refresh.in_progress {
            self.set_warning("Refresh already running");
            return;
        }
        if self
            .worker_tx
            .send(WorkerCommand::Refresh { invalidate })
            .is_err()
        {
            self.set_error("Worker is not running");
            return;
        }
        self.refresh = RefreshState {
            in_progress: true,
            ..RefreshState::default()
        };
        self.set_status(if invalidate {
            "Refreshing (caches cleared)..."
        } else {
            "Loading..."
        });
    }

    /// Apply one worker message.
    pub fn handle_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::IndexStarted { name, index, total } => {
                self.refresh.current = Some(name);
                self.refresh.done = index;
                self.refresh.total = total;
            }
            WorkerResponse::IndexDone { name, has_data, index, total } => {
                self.refresh.done = index + 1;
                self.refresh.total = total;
                if !has_data {
                    self.set_warning(format!("{name}: no data available"));
                }
            }
            WorkerResponse::RefreshDone { report } => {
                self.apply_report(*report);
            }
        }
    }

    fn apply_report(&mut self, report: DashboardReport) {
        let selected = self.selected_name().map(str::to_string);
        self.index_names = report.rows.iter().map(|r| r.name.clone()).collect();
        if let Some(name) = selected {
            self.select_by_name(&name);
        }
        if self.chart.selected >= self.index_count() {
            self.chart.selected = 0;
        }

        let with_data = report.with_data();
        let total = report.rows.len();
        self.synthetic = report.synthetic;
        self.report = Some(report);
        self.refresh = RefreshState::default();
        if with_data == total {
            self.set_status(format!("Updated {total} indices"));
        } else {
            self.set_warning(format!("Updated: {with_data} of {total} indices have data"));
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use breadth_core::data::TickerOrigin;
    use std::sync::mpsc;

    fn names() -> Vec<String> {
        ["A", "B", "C"].iter().map(|s| s.to_string()).collect()
    }

    fn app() -> (AppState, Receiver<WorkerCommand>) {
        let (tx, rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        (AppState::new(tx, resp_rx, names(), PathBuf::from(".")), rx)
    }

    fn row(name: &str) -> IndexReport {
        IndexReport {
            name: name.into(),
            slug: name.to_lowercase(),
            ticker_count: 0,
            origin: TickerOrigin::Custom,
            output: None,
        }
    }

    #[test]
    fn panel_cycle() {
        assert_eq!(Panel::Snapshot.next(), Panel::Chart);
        assert_eq!(Panel::Help.next(), Panel::Snapshot);
        assert_eq!(Panel::Snapshot.prev(), Panel::Help);
        for i in 0..Panel::COUNT {
            assert_eq!(Panel::from_index(i).unwrap().index(), i);
        }
        assert!(Panel::from_index(3).is_none());
    }

    #[test]
    fn default_series_is_ma50_only() {
        let chart = ChartState::default();
        assert_eq!(chart.visible(), vec![MaWindow::Ma50]);
    }

    #[test]
    fn toggles_and_selection_wrap() {
        let mut chart = ChartState::default();
        chart.toggle(MaWindow::Ma20);
        chart.toggle(MaWindow::Ma50);
        assert_eq!(chart.visible(), vec![MaWindow::Ma20]);

        chart.select_prev(3);
        assert_eq!(chart.selected, 2);
        chart.select_next(3);
        assert_eq!(chart.selected, 0);
        chart.select_next(0);
        assert_eq!(chart.selected, 0);
    }

    #[test]
    fn range_cycles_through_all_presets() {
        let mut chart = ChartState::default();
        let start = chart.range;
        for _ in 0..HistoryRange::ALL.len() {
            chart.cycle_range();
        }
        assert_eq!(chart.range, start);
    }

    #[test]
    fn refresh_is_not_doubled() {
        let (mut app, rx) = app();
        app.request_refresh(true);
        app.request_refresh(false);
        assert_eq!(rx.try_recv().unwrap(), WorkerCommand::Refresh { invalidate: true });
        assert!(rx.try_recv().is_err());
        assert!(app.refresh.in_progress);
    }

    #[test]
    fn report_keeps_selection_by_name() {
        let (mut app, _rx) = app();
        app.request_refresh(false);
        app.chart.selected = 1;
        let report = DashboardReport {
            rows: vec![row("Z"), row("A"), row("B")],
            updated_at: chrono::Local::now().naive_local(),
            synthetic: true,
        };
        app.handle_response(WorkerResponse::RefreshDone {
            report: Box::new(report),
        });
        assert_eq!(app.selected_name(), Some("B"));
        assert_eq!(app.selected_row().unwrap().name, "B");
        assert!(!app.refresh.in_progress);
        assert!(app.synthetic);
        assert_eq!(app.status_message.as_ref().unwrap().1, StatusLevel::Warning);
    }

    #[test]
    fn progress_updates_counts() {
        let (mut app, _rx) = app();
        app.handle_response(WorkerResponse::IndexStarted {
            name: "B".into(),
            index: 1,
            total: 3,
        });
        assert_eq!(app.refresh.current.as_deref(), Some("B"));
        assert_eq!(app.refresh.done, 1);
        app.handle_response(WorkerResponse::IndexDone {
            name: "B".into(),
            has_data: true,
            index: 1,
            total: 3,
        });
        assert_eq!(app.refresh.done, 2);
    }
}
