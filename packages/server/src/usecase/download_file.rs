//! UseCase: ファイルダウンロード処理
//!
//! ### どのような状況を想定しているか
//! - 正常系：同じルームにアップロードされたファイルのダウンロード
//! - 異常系：別のルームのファイル、ディスク上に存在しないファイル
//! - 異常系：アップロード中のファイル

use std::sync::Arc;

use parlor_shared::protocol::ChatMessage;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{
    domain::{FileName, MessagePusher, RegistryError, RoomRepository, UserName},
    infrastructure::file_store::FileStore,
};

use super::error::TransferError;

/// ファイルダウンロードのユースケース
pub struct DownloadFileUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    file_store: Arc<FileStore>,
}

impl DownloadFileUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        file_store: Arc<FileStore>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            file_store,
        }
    }

    /// Stream `file_name` from the requester's current room into `sink`.
    ///
    /// Failures are reported to the requester's chat session and nothing is
    /// written. Returns the number of bytes sent.
    pub async fn execute<W>(
        &self,
        user_name: &UserName,
        file_name: &str,
        sink: &mut W,
    ) -> Result<u64, TransferError>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        let result = self.download(user_name, file_name, sink).await;
        if let Err(error) = &result {
            if let Err(e) = self
                .message_pusher
                .push_to(user_name, ChatMessage::from_server(error.to_string()))
                .await
            {
                tracing::warn!(
                    "Could not report failed download of '{}' to '{}': {}",
                    file_name,
                    user_name,
                    e
                );
            }
        }
        result
    }

    async fn download<W>(
        &self,
        user_name: &UserName,
        file_name: &str,
        sink: &mut W,
    ) -> Result<u64, TransferError>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        let file = FileName::new(file_name.to_string())
            .map_err(|_| TransferError::InvalidFileName(file_name.to_string()))?;

        let room = match self.repository.room_of(user_name).await {
            Ok(Some(room)) => room,
            Ok(None) => return Err(TransferError::NotInRoom),
            Err(RegistryError::UnknownUser(name)) => {
                return Err(TransferError::UnknownUser(name.into_string()));
            }
            Err(e) => return Err(download_failed(&file, e)),
        };

        if !self.repository.has_file(&room, &file).await {
            return Err(TransferError::FileNotFound(file.to_string()));
        }
        let Some(_guard) = self.file_store.begin_download(&file) else {
            return Err(TransferError::Busy(file.to_string()));
        };
        let Some(mut source) = self
            .file_store
            .open(&file)
            .await
            .map_err(|e| download_failed(&file, e))?
        else {
            return Err(TransferError::FileNotFound(file.to_string()));
        };

        let bytes = tokio::io::copy(&mut source, sink)
            .await
            .map_err(|e| download_failed(&file, e))?;
        sink.flush().await.map_err(|e| download_failed(&file, e))?;
        tracing::info!(
            "'{}' downloaded '{}' ({} bytes) from room '{}'",
            user_name,
            file,
            bytes,
            room
        );
        Ok(bytes)
    }
}

fn download_failed(file: &FileName, reason: impl std::fmt::Display) -> TransferError {
    TransferError::DownloadFailed {
        file: file.to_string(),
        reason: reason.to_string(),
    }
}
