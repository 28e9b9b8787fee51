//! Market breadth TUI: % of index members above their 20/50/200-day moving
//! averages, refreshed in a background worker.

use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use breadth_core::data::MarketIndex;
use breadth_runner::{Dashboard, DashboardConfig};
use breadth_tui::worker::{self, WorkerCommand};
use breadth_tui::{input, persistence, ui, AppState};

/// How long shutdown waits for the worker to notice cancellation.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

#[derive(Parser, Debug)]
#[command(name = "breadth-tui", about = "Terminal market breadth dashboard")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use generated prices and static constituent lists (no network)
    #[arg(long)]
    synthetic: bool,

    /// Log file (defaults to breadth-tui.log next to the saved UI state)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = DashboardConfig::load(args.config.as_deref())?;

    let state_path = persistence::default_path();
    let log_path = args.log_file.clone().unwrap_or_else(|| {
        state_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("breadth-tui.log")
    });
    init_logging(&log_path)?;

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let index_names: Vec<String> = MarketIndex::ALL
        .iter()
        .map(|i| i.name().to_string())
        .chain(config.custom_indices.iter().map(|c| c.name.trim().to_string()))
        .collect();
    let (strong, weak) = (config.strong_threshold, config.weak_threshold);

    let dashboard = if args.synthetic {
        Dashboard::synthetic(config)
    } else {
        Dashboard::live(config)?
    };
    info!(synthetic = dashboard.is_synthetic(), "starting dashboard");

    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle =
        worker::spawn_worker(dashboard, cmd_rx, resp_tx).context("failed to spawn worker thread")?;

    let mut app = AppState::new(cmd_tx.clone(), resp_rx, index_names, state_path.clone());
    app.strong_threshold = strong;
    app.weak_threshold = weak;
    app.synthetic = args.synthetic;
    persistence::apply(&mut app, persistence::load(&state_path));

    // first load runs against whatever is cached
    app.request_refresh(false);

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    let _ = persistence::save(&state_path, &persistence::extract(&app));

    worker_handle.cancel();
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    drop(app);
    // a fetch already in flight is not waited for
    let deadline = Instant::now() + SHUTDOWN_GRACE;
    while !worker_handle.is_finished() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(20));
    }
    if worker_handle.is_finished() {
        let _ = worker_handle.join();
    } else {
        info!("leaving worker mid-refresh");
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log dir: {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file: {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        while let Ok(resp) = app.worker_rx.try_recv() {
            app.handle_response(resp);
        }

        // 50ms poll, ~20 FPS
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
