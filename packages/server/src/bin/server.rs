//! Room chat server with file transfer channels.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin parlor-server
//! cargo run --bin parlor-server -- --host 0.0.0.0 --port 1900 --uploads-dir /tmp/uploads
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use parlor_server::{
    infrastructure::{
        file_store::FileStore, message_pusher::TcpMessagePusher,
        repository::InMemoryRoomRepository,
    },
    ui::{Server, state::AppState},
};
use parlor_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "parlor-server")]
#[command(about = "TCP room chat server with file transfer support", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "1900")]
    port: u16,

    /// Directory uploaded files are stored in
    #[arg(short = 'u', long, default_value = "uploads")]
    uploads_dir: PathBuf,

    /// Do not read commands from stdin
    #[arg(long)]
    no_console: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. FileStore
    // 4. UseCases (AppState)
    // 5. Server

    // 1. Create Repository (in-memory room registry)
    let repository = Arc::new(InMemoryRoomRepository::default());

    // 2. Create MessagePusher (channel per TCP session)
    let message_pusher = Arc::new(TcpMessagePusher::default());

    // 3. Create FileStore
    let file_store = Arc::new(FileStore::new(args.uploads_dir));
    if let Err(e) = file_store.ensure_root().await {
        tracing::error!(
            "Failed to create uploads directory {}: {}",
            file_store.root().display(),
            e
        );
        std::process::exit(1);
    }
    tracing::info!("Storing uploads in {}", file_store.root().display());

    // 4. Create UseCases
    let state = AppState::new(
        repository,
        message_pusher,
        Arc::new(SystemClock),
        file_store,
    );

    // 5. Create and run the server
    let server = Server::new(state, !args.no_console);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
