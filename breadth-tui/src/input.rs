//! Keyboard input dispatch: global keys → panel-specific handlers.

use breadth_core::domain::MaWindow;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{AppState, Panel};

pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
            return;
        }
        KeyCode::Char('1') => { app.active_panel = Panel::Snapshot; return; }
        KeyCode::Char('2') => { app.active_panel = Panel::Chart; return; }
        KeyCode::Char('3') => { app.active_panel = Panel::Help; return; }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_panel = app.active_panel.prev();
            } else {
                app.active_panel = app.active_panel.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_panel = app.active_panel.prev();
            return;
        }
        KeyCode::Char('R') | KeyCode::F(5) => {
            app.request_refresh(true);
            return;
        }
        _ => {}
    }

    match app.active_panel {
        Panel::Snapshot => handle_snapshot_key(app, key),
        Panel::Chart => handle_chart_key(app, key),
        Panel::Help => {}
    }
}

fn handle_snapshot_key(app: &mut AppState, key: KeyEvent) {
    let count = app.index_count();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.chart.select_next(count),
        KeyCode::Char('k') | KeyCode::Up => app.chart.select_prev(count),
        KeyCode::Enter => app.active_panel = Panel::Chart,
        _ => {}
    }
}

fn handle_chart_key(app: &mut AppState, key: KeyEvent) {
    let count = app.index_count();
    match key.code {
        KeyCode::Char(']') | KeyCode::Char('l') | KeyCode::Right => app.chart.select_next(count),
        KeyCode::Char('[') | KeyCode::Char('h') | KeyCode::Left => app.chart.select_prev(count),
        KeyCode::Char('a') => app.chart.toggle(MaWindow::Ma20),
        KeyCode::Char('s') => app.chart.toggle(MaWindow::Ma50),
        KeyCode::Char('d') => app.chart.toggle(MaWindow::Ma200),
        KeyCode::Char('r') => {
            app.chart.cycle_range();
            app.set_status(format!("Range: {}", app.chart.range.label()));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::WorkerCommand;
    use breadth_core::domain::HistoryRange;
    use std::path::PathBuf;
    use std::sync::mpsc::{self, Receiver};

    fn app() -> (AppState, Receiver<WorkerCommand>) {
        let (tx, rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        let names = ["A", "B", "C"].iter().map(|s| s.to_string()).collect();
        (AppState::new(tx, resp_rx, names, PathBuf::from(".")), rx)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn quit() {
        let (mut a, _rx) = app();
        handle_key(&mut a, press(KeyCode::Char('q')));
        assert!(!a.running);
    }

    #[test]
    fn release_events_are_ignored() {
        let (mut a, _rx) = app();
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        handle_key(&mut a, key);
        assert!(a.running);
    }

    #[test]
    fn number_keys_switch_panels() {
        let (mut a, _rx) = app();
        handle_key(&mut a, press(KeyCode::Char('2')));
        assert_eq!(a.active_panel, Panel::Chart);
        handle_key(&mut a, press(KeyCode::Char('3')));
        assert_eq!(a.active_panel, Panel::Help);
        handle_key(&mut a, press(KeyCode::Tab));
        assert_eq!(a.active_panel, Panel::Snapshot);
        handle_key(&mut a, press(KeyCode::BackTab));
        assert_eq!(a.active_panel, Panel::Help);
    }

    #[test]
    fn chart_keys() {
        let (mut a, _rx) = app();
        a.active_panel = Panel::Chart;
        handle_key(&mut a, press(KeyCode::Char(']')));
        handle_key(&mut a, press(KeyCode::Char('l')));
        assert_eq!(a.chart.selected, 2);
        handle_key(&mut a, press(KeyCode::Char('[')));
        assert_eq!(a.chart.selected, 1);

        handle_key(&mut a, press(KeyCode::Char('a')));
        handle_key(&mut a, press(KeyCode::Char('d')));
        handle_key(&mut a, press(KeyCode::Char('s')));
        assert_eq!(a.chart.visible(), vec![MaWindow::Ma20, MaWindow::Ma200]);

        handle_key(&mut a, press(KeyCode::Char('r')));
        assert_eq!(a.chart.range, HistoryRange::OneMonth);
    }

    #[test]
    fn chart_keys_do_nothing_on_snapshot() {
        let (mut a, _rx) = app();
        handle_key(&mut a, press(KeyCode::Char('a')));
        assert!(!a.chart.shows(MaWindow::Ma20));
        handle_key(&mut a, press(KeyCode::Down));
        assert_eq!(a.chart.selected, 1);
        handle_key(&mut a, press(KeyCode::Enter));
        assert_eq!(a.active_panel, Panel::Chart);
    }

    #[test]
    fn refresh_keys_invalidate() {
        let (mut a, rx) = app();
        handle_key(&mut a, press(KeyCode::F(5)));
        assert_eq!(rx.try_recv().unwrap(), WorkerCommand::Refresh { invalidate: true });
        a.refresh.in_progress = false;
        handle_key(&mut a, press(KeyCode::Char('R')));
        assert_eq!(rx.try_recv().unwrap(), WorkerCommand::Refresh { invalidate: true });
    }
}
