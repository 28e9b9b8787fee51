//! Market breadth TUI: terminal dashboard over `breadth-runner`.
//!
//! Panels:
//! 1. Snapshot: latest % above MA20/50/200 per index
//! 2. Chart: breadth history of one index
//! 3. Help: keyboard shortcuts

pub mod app;
pub mod input;
pub mod persistence;
pub mod theme;
pub mod ui;
pub mod worker;

pub use app::{AppState, Panel};
pub use theme::Theme;
pub use worker::{spawn_worker, WorkerCommand, WorkerHandle, WorkerResponse};
