use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use tavle_core::AppConfig;
use tavle_domain::{build_cards, BoardState};
use tavle_persistence::{JsonLayoutStore, LayoutStore};
use tavle_tui::{load_snapshot, App, AppOptions};

#[derive(Parser)]
#[command(name = "tavle")]
#[command(about = "A terminal kanban board over tracker issue snapshots", long_about = None)]
#[command(version, arg_required_else_help = false)]
struct Cli {
    /// Path to the snapshot JSON (or set TAVLE_SNAPSHOT)
    #[arg(value_name = "SNAPSHOT", env = "TAVLE_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Path of the persisted board layout (or set TAVLE_LAYOUT)
    #[arg(long, env = "TAVLE_LAYOUT")]
    layout: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the board to a static HTML page and exit
    Export {
        #[arg(long, default_value = "board.html")]
        out: PathBuf,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("TAVLE_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .init();
    }

    let cli = Cli::parse();
    let config = AppConfig::load();

    let snapshot_path = cli
        .snapshot
        .or_else(|| config.snapshot_path.as_deref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data/jira.json"));
    let layout_path = cli
        .layout
        .or_else(|| config.layout_path.as_deref().map(PathBuf::from))
        .unwrap_or_else(JsonLayoutStore::default_path);
    let store = Arc::new(JsonLayoutStore::new(layout_path));
    let plan = config.sprint_plan();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "tavle", &mut std::io::stdout());
        }
        Some(Commands::Export { out }) => {
            let snapshot = load_snapshot(&snapshot_path)
                .await
                .map_err(|message| anyhow::anyhow!(message))?;
            let cards = build_cards(snapshot.issues, &plan);
            let mut board = BoardState::assemble(&cards);
            if let Some(saved) = store.load().await {
                board.apply_layout(&saved.lanes);
            }
            let page = tavle_tui::export::board_page(&board, &cards);
            tokio::fs::write(&out, page)
                .await
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Wrote {}", out.display());
        }
        None => {
            let mut app = App::new(AppOptions {
                snapshot_path,
                export_path: PathBuf::from("board.html"),
                store,
                plan,
            });
            app.run().await?;
        }
    }

    Ok(())
}
