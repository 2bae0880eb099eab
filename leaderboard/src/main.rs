use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use leaderboard::{LeaderboardConfig, LeaderboardManager, Snapshot};
use model::Platform;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Build the tiered addon leaderboard from one collection snapshot.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// TOML file overriding the built-in weights and thresholds
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the collectors' JSON output
    #[arg(long, default_value = "data/raw")]
    input: PathBuf,

    /// Root under which `data/` and README.md are written
    #[arg(long, default_value = ".")]
    output: PathBuf,

    /// Run date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,
}

fn init_logger() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_target(false),
        )
        .init();
}

fn main() -> Result<()> {
    // 初始化日志记录器
    init_logger();
    let args = Args::parse();
    let run_date = args.date.unwrap_or_else(|| Local::now().date_naive());
    info!("Addon leaderboard run for {}", run_date);

    // 加载配置
    let config = LeaderboardConfig::load_config(args.config.as_deref())?;

    // 读取采集数据
    let snapshot = Snapshot::load(&args.input, run_date)
        .with_context(|| format!("Failed to load snapshot from {}", args.input.display()))?;
    if snapshot.platform(Platform::Github).is_empty() {
        anyhow::bail!(
            "No GitHub repositories in {}; cannot build a leaderboard without the primary source",
            args.input.display()
        );
    }

    // 聚合、分层、排名
    let manager = LeaderboardManager::new(&config)?;
    let run = manager.run(snapshot);

    // 输出 CSV 与 README
    let written = run.write_reports(&args.output, run_date)?;
    for path in &written {
        info!("Wrote {}", path.display());
    }

    let board = &run.board;
    info!(
        "Completed: {} repositories ({} established, {} rising, {} new)",
        board.len(),
        board.established.len(),
        board.rising.len(),
        board.new.len()
    );
    Ok(())
}
