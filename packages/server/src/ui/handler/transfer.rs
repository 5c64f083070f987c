//! File transfer connections.
//!
//! Upload and download run on their own TCP connection, outside the chat
//! session. Their outcome is reported to the user's chat session by the use
//! cases; here it is only logged.

use std::sync::Arc;

use tokio::{
    io::{AsyncWriteExt, BufReader},
    net::tcp::{OwnedReadHalf, OwnedWriteHalf},
};

use crate::{domain::UserName, ui::state::AppState};

/// Store every byte after the handshake as the uploaded file.
///
/// `reader` may already hold bytes the client sent right behind the
/// handshake line; they are part of the file.
pub async fn handle_upload(
    mut reader: BufReader<OwnedReadHalf>,
    _writer: OwnedWriteHalf,
    user_name: String,
    file_name: String,
    state: Arc<AppState>,
) {
    let Ok(user) = UserName::new(user_name) else {
        tracing::warn!("Upload of '{}' with an empty user name rejected", file_name);
        return;
    };

    match state
        .upload_file_usecase
        .execute(&user, &file_name, &mut reader)
        .await
    {
        Ok(bytes) => tracing::info!("Upload of '{}' by '{}' done, {} bytes", file_name, user, bytes),
        Err(e) => tracing::warn!("Upload of '{}' by '{}' failed: {}", file_name, user, e),
    }
}

/// Stream a stored file to the client, then close the connection
pub async fn handle_download(
    mut writer: OwnedWriteHalf,
    user_name: String,
    file_name: String,
    state: Arc<AppState>,
) {
    let Ok(user) = UserName::new(user_name) else {
        tracing::warn!("Download of '{}' with an empty user name rejected", file_name);
        return;
    };

    match state
        .download_file_usecase
        .execute(&user, &file_name, &mut writer)
        .await
    {
        Ok(bytes) => {
            tracing::info!("Download of '{}' by '{}' done, {} bytes", file_name, user, bytes)
        }
        Err(e) => tracing::warn!("Download of '{}' by '{}' failed: {}", file_name, user, e),
    }
    if let Err(e) = writer.shutdown().await {
        tracing::debug!("Failed to close download connection: {}", e);
    }
}
