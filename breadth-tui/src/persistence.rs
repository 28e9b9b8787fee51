//! UI preferences persisted as JSON across restarts.

use std::path::{Path, PathBuf};

use breadth_core::domain::HistoryRange;
use serde::{Deserialize, Serialize};

use crate::app::{AppState, Panel};

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub selected_index: Option<String>,
    pub show_ma20: bool,
    pub show_ma50: bool,
    pub show_ma200: bool,
    pub range: HistoryRange,
    pub active_panel: Panel,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            selected_index: None,
            show_ma20: false,
            show_ma50: true,
            show_ma200: false,
            range: HistoryRange::All,
            active_panel: Panel::Snapshot,
        }
    }
}

/// `<config dir>/market-breadth/state.json`, or the working directory when
/// the platform has no config dir.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("market-breadth")
        .join("state.json")
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        selected_index: app.selected_name().map(str::to_string),
        show_ma20: app.chart.series[0],
        show_ma50: app.chart.series[1],
        show_ma200: app.chart.series[2],
        range: app.chart.range,
        active_panel: app.active_panel,
    }
}

pub fn apply(app: &mut AppState, state: PersistedState) {
    if let Some(name) = &state.selected_index {
        app.select_by_name(name);
    }
    app.chart.series = [state.show_ma20, state.show_ma50, state.show_ma200];
    app.chart.range = state.range;
    app.active_panel = state.active_panel;
}
