//! File transfers over dedicated connections.
//!
//! Each transfer opens its own connection whose handshake names the user and
//! the file. The server reports failures in the chat session, so a download
//! that receives nothing is only known to have failed, not why.

use std::path::{Path, PathBuf};

use parlor_shared::protocol::Intent;
use tokio::{fs::File, io::AsyncWriteExt};

use crate::{
    connection::{RETRY_INTERVAL, TRANSFER_CONNECT_DEADLINE, connect_with_retry},
    error::ClientError,
};

/// Upload a local file to the user's current room.
///
/// Returns the number of bytes sent.
pub async fn upload_file(addr: &str, user_name: &str, path: &Path) -> Result<u64, ClientError> {
    let file_name = handshake_file_name(path)?;
    let mut source = File::open(path).await?;

    let intent = Intent::Upload {
        user_name: user_name.to_string(),
        file_name,
    };
    let mut stream =
        connect_with_retry(addr, &intent, TRANSFER_CONNECT_DEADLINE, RETRY_INTERVAL).await?;

    let bytes = tokio::io::copy(&mut source, &mut stream).await?;
    stream.shutdown().await?;
    tracing::debug!("Sent {} bytes of {}", bytes, path.display());
    Ok(bytes)
}

/// Download a file of the user's current room into `download_dir`.
///
/// Bytes land in a temporary file next to the target, which replaces the
/// target only once something was received. A failed or empty download
/// leaves an existing local file untouched.
pub async fn download_file(
    addr: &str,
    user_name: &str,
    file_name: &str,
    download_dir: &Path,
) -> Result<(PathBuf, u64), ClientError> {
    if file_name.is_empty()
        || file_name == "."
        || file_name == ".."
        || file_name.contains(['/', '\\'])
    {
        return Err(ClientError::InvalidFileName(file_name.to_string()));
    }
    let target = download_dir.join(file_name);
    let intent = Intent::Download {
        user_name: user_name.to_string(),
        file_name: file_name.to_string(),
    };
    let mut stream =
        connect_with_retry(addr, &intent, TRANSFER_CONNECT_DEADLINE, RETRY_INTERVAL).await?;

    // dropping `partial` removes the temporary file
    let (file, partial) = tempfile::Builder::new()
        .prefix(".parlor-download-")
        .tempfile_in(download_dir)?
        .into_parts();
    let mut sink = File::from_std(file);
    let bytes = tokio::io::copy(&mut stream, &mut sink).await?;
    sink.flush().await?;
    drop(sink);

    if bytes == 0 {
        return Err(ClientError::NothingReceived(file_name.to_string()));
    }
    partial.persist(&target).map_err(|e| e.error)?;
    Ok((target, bytes))
}

/// The name the server stores an upload under
fn handshake_file_name(path: &Path) -> Result<String, ClientError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ClientError::InvalidFileName(path.display().to_string()))?;
    if file_name.chars().any(char::is_whitespace) {
        return Err(ClientError::InvalidFileName(file_name.to_string()));
    }
    Ok(file_name.to_string())
}
