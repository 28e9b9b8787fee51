//! Background worker thread: every refresh runs here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. The
//! dashboard (and its caches) is owned by the worker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use breadth_runner::{Dashboard, DashboardReport, IndexReport, RefreshProgress};
use tracing::{debug, info};

/// Commands sent from the TUI to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerCommand {
    /// Recompute every index; `invalidate` clears the caches first.
    Refresh { invalidate: bool },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    IndexStarted {
        name: String,
        index: usize,
        total: usize,
    },
    IndexDone {
        name: String,
        has_data: bool,
        index: usize,
        total: usize,
    },
    RefreshDone {
        report: Box<DashboardReport>,
    },
}

/// Forwards refresh progress over the response channel.
struct ChannelProgress<'a> {
    tx: &'a Sender<WorkerResponse>,
    cancel: &'a AtomicBool,
}

impl RefreshProgress for ChannelProgress<'_> {
    fn on_index_start(&self, name: &str, index: usize, total: usize) {
        let _ = self.tx.send(WorkerResponse::IndexStarted {
            name: name.to_string(),
            index,
            total,
        });
    }

    fn on_index_complete(&self, report: &IndexReport, index: usize, total: usize) {
        let _ = self.tx.send(WorkerResponse::IndexDone {
            name: report.name.clone(),
            has_data: report.has_data(),
            index,
            total,
        });
    }

    fn on_refresh_complete(&self, report: &DashboardReport) {
        info!(
            with_data = report.with_data(),
            total = report.rows.len(),
            "dashboard refreshed"
        );
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

/// Running worker thread plus its cancellation flag.
pub struct WorkerHandle {
    thread: JoinHandle<()>,
    cancel: Arc<AtomicBool>,
}

impl WorkerHandle {
    /// Stop any refresh in flight before its next index. The worker exits
    /// once it sees the flag.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    pub fn join(self) -> thread::Result<()> {
        self.thread.join()
    }
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    dashboard: Dashboard,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> std::io::Result<WorkerHandle> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    let thread = thread::Builder::new()
        .name("breadth-worker".into())
        .spawn(move || worker_loop(dashboard, rx, tx, &flag))?;
    Ok(WorkerHandle { thread, cancel })
}

fn worker_loop(
    dashboard: Dashboard,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    cancel: &AtomicBool,
) {
    while let Ok(cmd) = rx.recv() {
        if cancel.load(Ordering::Relaxed) {
            break;
        }
        match cmd {
            WorkerCommand::Refresh { invalidate } => {
                // collapse refresh requests queued while the last one ran
                let mut invalidate = invalidate;
                let mut shutdown = false;
                while let Ok(next) = rx.try_recv() {
                    match next {
                        WorkerCommand::Refresh { invalidate: inv } => invalidate |= inv,
                        WorkerCommand::Shutdown => shutdown = true,
                    }
                }
                if shutdown {
                    break;
                }
                if invalidate {
                    dashboard.invalidate();
                }
                let report = dashboard.refresh(&ChannelProgress { tx: &tx, cancel });
                if cancel.load(Ordering::Relaxed) {
                    break;
                }
                if tx
                    .send(WorkerResponse::RefreshDone {
                        report: Box::new(report),
                    })
                    .is_err()
                {
                    break;
                }
            }
            WorkerCommand::Shutdown => break,
        }
    }
    debug!("worker stopped");
}
