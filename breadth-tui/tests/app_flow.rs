//! Drives the app state against a live worker on synthetic data.

use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use breadth_core::data::MarketIndex;
use breadth_runner::{Dashboard, DashboardConfig};
use breadth_tui::{input, persistence, spawn_worker, AppState, Panel, WorkerCommand};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn press(app: &mut AppState, code: KeyCode) {
    input::handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

#[test]
fn refresh_then_browse_chart() {
    let config = DashboardConfig {
        lookback_years: 1,
        ..DashboardConfig::default()
    };
    let names = MarketIndex::ALL.iter().map(|i| i.name().to_string()).collect();
    let dashboard = Dashboard::synthetic(config);

    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let handle = spawn_worker(dashboard, cmd_rx, resp_tx).unwrap();
    let mut app = AppState::new(cmd_tx.clone(), resp_rx, names, PathBuf::from("."));

    press(&mut app, KeyCode::F(5));
    assert!(app.refresh.in_progress);

    let deadline = Instant::now() + Duration::from_secs(120);
    while app.report.is_none() {
        assert!(Instant::now() < deadline, "refresh timed out");
        if let Ok(resp) = app.worker_rx.recv_timeout(Duration::from_millis(50)) {
            app.handle_response(resp);
        }
    }
    assert!(!app.refresh.in_progress);
    assert!(app.synthetic);

    press(&mut app, KeyCode::Char('2'));
    press(&mut app, KeyCode::Char(']'));
    press(&mut app, KeyCode::Char(']'));
    assert_eq!(app.active_panel, Panel::Chart);
    assert_eq!(app.selected_name(), Some("Hang Seng (HSI)"));
    let row = app.selected_row().unwrap();
    assert_eq!(row.ticker_count, 89);
    assert!(row.has_data());

    let saved = persistence::extract(&app);
    assert_eq!(saved.selected_index.as_deref(), Some("Hang Seng (HSI)"));

    cmd_tx.send(WorkerCommand::Shutdown).unwrap();
    handle.join().unwrap();
}
