mod common;
mod config;
mod simulation;
mod storage;
mod store;
mod ui;

use std::error::Error;
use std::path::Path;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use eframe::egui;
use simulation::Simulator;
use storage::{PersistenceSubscriber, SnapshotDatabase};
use store::Store;
use tokio::sync::mpsc;
use ui::ChatApp;

#[derive(Parser)]
#[command(
    name = "gemini_chat",
    version,
    about = "Simulated Gemini-style chat client"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Print the stored snapshot as JSON and exit (no UI)
    Export,
    /// Delete the stored snapshot and exit
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    // Khởi tạo Logger để debug
    env_logger::init();

    let cli = Cli::parse();
    if !Path::new(&cli.config).exists() {
        if let Err(err) = config::save_config(&cli.config, &config::AppConfig::default()) {
            log::warn!("Unable to create {}: {err}", cli.config);
        }
    }
    let app_config = config::load_config(&cli.config);

    match cli.mode {
        Some(Mode::Export) => export_snapshot(&app_config),
        Some(Mode::Reset) => reset_snapshot(&app_config),
        None => run_client(app_config).map_err(Into::into),
    }
}

fn export_snapshot(app_config: &config::AppConfig) -> Result<(), Box<dyn Error>> {
    let db = SnapshotDatabase::with_path(&app_config.storage_path)?;
    match db.load_snapshot()? {
        Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        None => log::info!("No snapshot stored at {}", app_config.storage_path),
    }
    Ok(())
}

fn reset_snapshot(app_config: &config::AppConfig) -> Result<(), Box<dyn Error>> {
    let db = SnapshotDatabase::with_path(&app_config.storage_path)?;
    if db.clear_snapshot()? {
        log::info!("Cleared snapshot at {}", app_config.storage_path);
    } else {
        log::info!("Nothing to clear at {}", app_config.storage_path);
    }
    Ok(())
}

fn open_store(app_config: &config::AppConfig) -> Store {
    let db = match SnapshotDatabase::with_path(&app_config.storage_path) {
        Ok(db) => Some(db),
        Err(err) => {
            log::error!(
                "Cannot open {} ({err}); changes will not be saved",
                app_config.storage_path
            );
            None
        }
    };

    let state = db
        .as_ref()
        .map(storage::rehydrate)
        .unwrap_or_default()
        .with_message_cap(app_config.max_messages_per_room);

    let mut store = Store::new(state);
    if let Some(db) = db {
        store.subscribe(Box::new(PersistenceSubscriber::new(db)));
    }
    store
}

fn run_client(app_config: config::AppConfig) -> Result<(), eframe::Error> {
    let store = open_store(&app_config);

    // 1. Tạo các kênh giao tiếp (Channels)
    // UI -> Simulator
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // Simulator -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    // 2. Khởi chạy Simulator (Chạy ngầm)
    tokio::spawn(Simulator::new(event_tx, cmd_rx, app_config.clone()).run());

    // 3. Khởi chạy UI (Chạy trên Main Thread)
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 680.0])
            .with_min_inner_size([480.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Gemini Chat",
        options,
        Box::new(move |cc| {
            log::info!(
                "Client started with {} stored chatrooms",
                store.state().chatrooms().len()
            );
            Ok(Box::new(ChatApp::new(cc, store, app_config, cmd_tx, event_rx)))
        }),
    )
}
