// Taskboard - local project board store
// Entry point: inspect and maintain the saved board state

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taskboard::app;
use taskboard::models::TemplateType;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "Inspect and maintain a local project board store")]
struct Cli {
    /// Directory holding the saved state (defaults to the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List active boards with task counts and progress
    Boards,
    /// Create a board from a template
    CreateBoard {
        name: String,
        /// blank, todo, software, crm or smart
        #[arg(short, long, default_value = "blank")]
        template: TemplateType,
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Write the full state as a dated JSON file
    Export {
        /// Target directory (defaults to <data-dir>/exports)
        dir: Option<PathBuf>,
    },
    /// Replace the full state with an exported file
    Import { file: PathBuf },
    /// Delete every board and remove the saved state
    Clear,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut state = app::setup(cli.data_dir)?;

    match cli.command {
        Commands::Boards => {
            let view = state.store.state();
            for board in view.active_boards() {
                println!(
                    "{}{}  {}  {} tasks  {}%",
                    if board.pinned { "* " } else { "" },
                    board.name,
                    board.id,
                    view.board_task_count(&board.id),
                    view.board_progress(&board.id)
                );
            }
        }
        Commands::CreateBoard {
            name,
            template,
            color,
        } => {
            let board = state.store.create_board(&name, template, color.as_deref());
            state.store.flush()?;
            println!("{}", board.id);
        }
        Commands::Export { dir } => {
            let dir = dir.unwrap_or_else(|| state.exports_dir());
            let path = state.store.export_to_dir(&dir)?;
            println!("{}", path.display());
        }
        Commands::Import { file } => {
            state.store.import_from_path(&file)?;
            state.store.flush()?;
            println!("Imported {} boards", state.store.state().boards.len());
        }
        Commands::Clear => {
            state.store.clear_all()?;
            println!("Cleared all board data");
        }
    }

    Ok(())
}
