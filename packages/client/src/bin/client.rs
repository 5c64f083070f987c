//! Room chat client with file transfer support.
//!
//! Connects to a Parlor server, prints incoming messages as `sender: text`
//! and sends typed lines. `/send <path>` uploads a file to the current room,
//! `/download <file>` fetches one, `/close` ends the session.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin parlor-client -- --name alice
//! cargo run --bin parlor-client -- -H 127.0.0.1 -p 1900 -d ./downloads
//! ```

use std::path::PathBuf;

use clap::Parser;
use parlor_client::{ClientConfig, ClientError, run_client};
use parlor_shared::logger::setup_logger;
use rustyline::DefaultEditor;

#[derive(Parser, Debug)]
#[command(name = "parlor-client")]
#[command(about = "TCP room chat client with file transfer support", long_about = None)]
struct Args {
    /// Server host
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short = 'p', long, default_value = "1900")]
    port: u16,

    /// User name (must be unique on the server); prompted for if omitted
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Directory downloaded files are written to
    #[arg(short = 'd', long, default_value = ".")]
    download_dir: PathBuf,
}

/// Ask for a user name until a non-empty one is entered
fn prompt_user_name() -> Result<String, ClientError> {
    let mut rl = DefaultEditor::new().map_err(|e| ClientError::Readline(e.to_string()))?;
    println!("Enter your username: ");
    loop {
        let line = rl
            .readline("> ")
            .map_err(|e| ClientError::Readline(e.to_string()))?;
        let name = line.trim();
        if !name.is_empty() {
            return Ok(name.to_string());
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();

    let user_name = match args.name {
        Some(name) => name,
        None => match prompt_user_name() {
            Ok(name) => name,
            Err(e) => {
                tracing::error!("Client error: {}", e);
                std::process::exit(1);
            }
        },
    };

    let config = ClientConfig {
        host: args.host,
        port: args.port,
        user_name,
        download_dir: args.download_dir,
    };

    // Run the client
    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
