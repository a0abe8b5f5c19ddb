use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use notekeeper::api::HttpNotesService;
use notekeeper::cli::{self, Command};
use notekeeper::core::NoteBoard;
use notekeeper::core::config;
use simplelog::{ConfigBuilder, WriteLogger};

#[derive(Parser)]
#[command(name = "notekeeper", about = "Terminal client for a notes REST API")]
struct Args {
    /// Base URL of the notes server (overrides config and NOTEKEEPER_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Run a single command instead of the interactive board
    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Loaded before the logger exists; errors are logged once it does.
    let loaded = config::load_config();
    let resolved = config::resolve(
        loaded.as_ref().unwrap_or(&config::NotekeeperConfig::default()),
        args.base_url.as_deref(),
    );

    // File logger: the terminal belongs to the TUI
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    if let Err(e) = &loaded {
        log::warn!("Ignoring config file: {}", e);
    }
    log::info!("Notekeeper starting up against {}", resolved.base_url);

    let service = Arc::new(HttpNotesService::new(resolved.base_url.clone()));

    match args.command {
        None => match notekeeper::tui::run(service) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("notekeeper: {e}");
                ExitCode::FAILURE
            }
        },
        Some(command) => {
            let mut board = NoteBoard::new(service);
            let mut stdout = std::io::stdout();
            match cli::execute(&mut board, command, &mut stdout).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    log::warn!("Command failed: {}", e);
                    eprintln!("notekeeper: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
