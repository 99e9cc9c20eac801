use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tokio::sync::mpsc;

use workflow_chat::config::{self, AppConfig};
use workflow_chat::network::NetworkWorker;
use workflow_chat::storage::SessionDatabase;
use workflow_chat::store::{ChatStore, StoreOptions};
use workflow_chat::ui::ChatApp;

#[derive(Parser)]
#[command(
    name = "workflow_chat",
    version,
    about = "WorkFlowConnect realtime chat client"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Serve the built-in sample data instead of talking to the backend
    #[arg(long)]
    mock: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Forget the stored session token and exit
    Logout,
    /// Write the effective configuration to the config path and exit
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let mut app_config = config::load_with_env(&cli.config);
    if cli.mock {
        app_config.use_mock_data = true;
    }

    match cli.command {
        Some(Command::InitConfig) => {
            match config::save_config(&cli.config, &app_config) {
                Ok(()) => log::info!("Wrote config to {}", cli.config),
                Err(err) => log::error!("Failed to write config {}: {err}", cli.config),
            }
            return Ok(());
        }
        Some(Command::Logout) => {
            match SessionDatabase::with_path(&app_config.database_path).and_then(|db| {
                db.clear_token()?;
                Ok(())
            }) {
                Ok(()) => log::info!("Stored session cleared"),
                Err(err) => log::error!("Failed to clear stored session: {err}"),
            }
            return Ok(());
        }
        None => {}
    }

    run_client(app_config).await
}

async fn run_client(app_config: AppConfig) -> Result<(), eframe::Error> {
    // UI -> Network
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // Network -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    let sessions = match SessionDatabase::with_path(&app_config.database_path) {
        Ok(db) => Some(db),
        Err(err) => {
            log::warn!("Session storage unavailable, sign-in will not persist: {err}");
            None
        }
    };

    match NetworkWorker::new(&app_config, event_tx, cmd_rx, sessions) {
        Ok(worker) => {
            tokio::spawn(worker.run());
        }
        Err(err) => log::error!("Network worker could not start: {err}"),
    }

    let options = eframe::NativeOptions::default();
    let store = ChatStore::new(Box::new(cmd_tx), StoreOptions::from_config(&app_config));

    log::info!(
        "Client started against {} ({})",
        app_config.api_url,
        if app_config.use_mock_data { "mock data" } else { "live" }
    );

    eframe::run_native(
        "WorkFlowConnect Chat",
        options,
        Box::new(move |cc| Ok(Box::new(ChatApp::new(cc, store, event_rx)))),
    )
}
