//! UseCase: ファイルアップロード処理
//!
//! ### 何をテストしているか
//! - UploadFileUseCase::execute() メソッド
//! - 受信したバイト列の保存、ルームへの登録、アップロード者への通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルーム参加中のユーザーのアップロード
//! - 異常系：ルーム未参加、不正なファイル名、同名ファイルのアップロード中
//! - 異常系：途中で読み込みに失敗（部分ファイルは残る）

use std::sync::Arc;

use parlor_shared::protocol::ChatMessage;
use tokio::io::{AsyncRead, AsyncWriteExt};

use crate::{
    domain::{FileName, MessagePusher, RegistryError, RoomRepository, UserName},
    infrastructure::file_store::FileStore,
};

use super::error::TransferError;

/// ファイルアップロードのユースケース
pub struct UploadFileUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    file_store: Arc<FileStore>,
}

impl UploadFileUseCase {
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

    /// Store everything readable from `source` as `file_name` in the
    /// uploader's current room.
    ///
    /// The outcome, success or failure, is also pushed to the uploader's chat
    /// session. Returns the number of bytes stored.
    pub async fn execute<R>(
        &self,
        user_name: &UserName,
        file_name: &str,
        source: &mut R,
    ) -> Result<u64, TransferError>
    where
        R: AsyncRead + Unpin + Send + ?Sized,
    {
        let result = self.upload(user_name, file_name, source).await;
        let reply = match &result {
            Ok((room, _)) => format!("File {} uploaded to room {}", file_name, room),
            Err(e) => e.to_string(),
        };
        if let Err(e) = self
            .message_pusher
            .push_to(user_name, ChatMessage::from_server(reply))
            .await
        {
            tracing::warn!("Could not report upload of '{}' to '{}': {}", file_name, user_name, e);
        }
        result.map(|(_, bytes)| bytes)
    }

    async fn upload<R>(
        &self,
        user_name: &UserName,
        file_name: &str,
        source: &mut R,
    ) -> Result<(String, u64), TransferError>
    where
        R: AsyncRead + Unpin + Send + ?Sized,
    {
        let file = FileName::new(file_name.to_string())
            .map_err(|_| TransferError::InvalidFileName(file_name.to_string()))?;

        let room = match self.repository.room_of(user_name).await {
            Ok(Some(room)) => room,
            Ok(None) => return Err(TransferError::NotInRoom),
            Err(RegistryError::UnknownUser(name)) => {
                return Err(TransferError::UnknownUser(name.into_string()));
            }
            Err(e) => return Err(upload_failed(&file, e)),
        };

        let Some(_guard) = self.file_store.begin_upload(&file) else {
            return Err(TransferError::Busy(file.to_string()));
        };

        let mut target = self
            .file_store
            .create(&file)
            .await
            .map_err(|e| upload_failed(&file, e))?;
        let bytes = tokio::io::copy(source, &mut target)
            .await
            .map_err(|e| upload_failed(&file, e))?;
        target.flush().await.map_err(|e| upload_failed(&file, e))?;

        self.repository
            .register_upload(&room, file.clone())
            .await
            .map_err(|e| upload_failed(&file, e))?;
        tracing::info!(
            "'{}' uploaded '{}' ({} bytes) to room '{}'",
            user_name,
            file,
            bytes,
            room
        );
        Ok((room.to_string(), bytes))
    }
}

fn upload_failed(file: &FileName, reason: impl std::fmt::Display) -> TransferError {
    TransferError::UploadFailed {
        file: file.to_string(),
        reason: reason.to_string(),
    }
}
