//! Client execution logic.

use std::path::PathBuf;

use crate::{
    error::ClientError,
    session::{SessionContext, run_client_session},
};

/// Client settings resolved from the command line
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub user_name: String,
    pub download_dir: PathBuf,
}

impl ClientConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Run the chat client.
///
/// A connection timeout is reported to the user and ends the client
/// normally; the server is not retried after the session ends.
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    tracing::info!("Connecting to {} as '{}'", config.addr(), config.user_name);

    let context = SessionContext {
        addr: config.addr(),
        user_name: config.user_name,
        download_dir: config.download_dir,
    };

    match run_client_session(context).await {
        Ok(()) => {
            tracing::info!("Client session ended normally");
            Ok(())
        }
        Err(ClientError::Timeout) => {
            println!("{}", ClientError::Timeout);
            Ok(())
        }
        Err(e) => Err(e),
    }
}
