//! Market breadth CLI: snapshot, history, tickers and export commands.
//!
//! Commands:
//! - `snapshot`: % of constituents above MA20/50/200 for every index
//! - `history`: breadth history of one index as CSV
//! - `tickers`: constituent counts, or the tickers of one index
//! - `export`: snapshot JSON plus one history CSV per index

use anyhow::{bail, Context, Result};
use breadth_core::data::universe::short_label;
use breadth_core::data::IndexSpec;
use breadth_core::domain::{BreadthLevel, HistoryRange, MaWindow};
use breadth_runner::{
    export_points_csv, export_snapshot_json, save_report, Dashboard, DashboardConfig,
    DashboardReport, LogProgress,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "breadth",
    about = "Market breadth: % of index members above their moving averages"
)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Generated prices and static constituent lists; no network access.
    #[arg(long, global = true, default_value_t = false)]
    synthetic: bool,

    /// Debug logging (overridden by RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Latest breadth for every index.
    Snapshot {
        /// Print JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Breadth history of one index as CSV.
    History {
        /// Index name, short label, or slug (e.g. "FBM KLCI", "S&P 500", "hsi").
        #[arg(long)]
        index: String,

        /// 1m, 6m, ytd, 1y or all.
        #[arg(long, default_value = "all")]
        range: HistoryRange,

        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Constituent counts, or the tickers of one index.
    Tickers {
        #[arg(long)]
        index: Option<String>,
    },
    /// Write snapshot.json and history_<slug>.csv files.
    Export {
        #[arg(long, default_value = "breadth-export")]
        output_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = DashboardConfig::load(cli.config.as_deref())?;
    let dashboard = if cli.synthetic {
        Dashboard::synthetic(config)
    } else {
        Dashboard::live(config)?
    };

    match cli.command {
        Commands::Snapshot { json } => run_snapshot(&dashboard, json),
        Commands::History {
            index,
            range,
            output,
        } => run_history(&dashboard, &index, range, output),
        Commands::Tickers { index } => run_tickers(&dashboard, index.as_deref()),
        Commands::Export { output_dir } => run_export(&dashboard, output_dir),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run_snapshot(dashboard: &Dashboard, json: bool) -> Result<()> {
    let report = dashboard.refresh(&LogProgress);
    if json {
        println!("{}", export_snapshot_json(&report)?);
    } else {
        let config = dashboard.config();
        print!(
            "{}",
            format_snapshot(&report, config.strong_threshold, config.weak_threshold)
        );
    }
    if report.with_data() == 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn run_history(
    dashboard: &Dashboard,
    index: &str,
    range: HistoryRange,
    output: Option<PathBuf>,
) -> Result<()> {
    let specs = dashboard.indices();
    let Some(spec) = find_spec(&specs, index) else {
        bail!(
            "unknown index '{index}' (known: {})",
            specs.iter().map(|s| s.name.as_str()).collect::<Vec<_>>().join(", ")
        );
    };
    let Some(output_data) = dashboard.compute(spec) else {
        bail!("{}: no data available", spec.name);
    };

    let csv = export_points_csv(output_data.history.range(range))?;
    match output {
        Some(path) => {
            std::fs::write(&path, csv)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(index = %spec.name, path = %path.display(), "history written");
            println!("History saved to: {}", path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}

fn run_tickers(dashboard: &Dashboard, index: Option<&str>) -> Result<()> {
    let specs = dashboard.indices();
    match index {
        Some(name) => {
            let Some(spec) = find_spec(&specs, name) else {
                bail!("unknown index '{name}'");
            };
            for t in &spec.tickers {
                println!("{t}");
            }
        }
        None => {
            println!("{:<22} {:>8}  {:<9}", "Index", "Tickers", "List");
            println!("{}", "-".repeat(42));
            for spec in &specs {
                println!(
                    "{:<22} {:>8}  {:<9}",
                    spec.name,
                    spec.ticker_count(),
                    spec.origin.label()
                );
            }
        }
    }
    Ok(())
}

fn run_export(dashboard: &Dashboard, output_dir: PathBuf) -> Result<()> {
    let report = dashboard.refresh(&LogProgress);
    let written = save_report(&report, &output_dir)?;
    println!(
        "Exported {} files ({} of {} indices with data) to: {}",
        written.len(),
        report.with_data(),
        report.rows.len(),
        output_dir.display()
    );
    Ok(())
}

/// Match a full name, short label, or slug, ignoring case.
fn find_spec<'a>(specs: &'a [IndexSpec], needle: &str) -> Option<&'a IndexSpec> {
    let needle = needle.trim();
    specs.iter().find(|s| {
        s.name.eq_ignore_ascii_case(needle)
            || short_label(&s.name).eq_ignore_ascii_case(needle)
            || s.slug().eq_ignore_ascii_case(needle)
    })
}

/// `85.00 +` for strong, `12.50 -` for weak.
fn format_cell(value: f64, strong: f64, weak: f64) -> String {
    let mark = match BreadthLevel::classify(value, strong, weak) {
        BreadthLevel::Strong => "+",
        BreadthLevel::Weak => "-",
        BreadthLevel::Neutral => " ",
    };
    format!("{value:.2} {mark}")
}

fn format_snapshot(report: &DashboardReport, strong: f64, weak: f64) -> String {
    let mut out = String::new();
    let stamp = report.updated_at.format("%Y-%m-%d %H:%M:%S");
    out.push_str(&format!("Last updated: {stamp}"));
    if report.synthetic {
        out.push_str("  [synthetic data]");
    }
    out.push_str("\n\n");

    out.push_str(&format!("{:<22} {:>8}", "Index", "Tickers"));
    for w in MaWindow::ALL {
        out.push_str(&format!(" {:>10}", w.label()));
    }
    out.push('\n');
    out.push_str(&"-".repeat(22 + 9 + 11 * 3));
    out.push('\n');

    for row in &report.rows {
        out.push_str(&format!("{:<22} {:>8}", row.name, row.ticker_count));
        match row.snapshot() {
            Some(snap) => {
                for w in MaWindow::ALL {
                    out.push_str(&format!(" {:>10}", format_cell(snap.value(w), strong, weak)));
                }
            }
            None => out.push_str("  no data available"),
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "\n+ strong (>= {strong:.0}%)   - weak (<= {weak:.0}%)\n"
    ));
    out
}
