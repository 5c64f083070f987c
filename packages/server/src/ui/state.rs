//! Server state shared by every connection handler.

use std::sync::Arc;

use parlor_shared::time::Clock;

use crate::{
    domain::{MessagePusher, RoomRepository},
    infrastructure::file_store::FileStore,
    usecase::{
        ConnectUserUseCase, CreateRoomUseCase, DisconnectUserUseCase, DownloadFileUseCase,
        JoinRoomUseCase, ListClientsUseCase, QuitRoomUseCase, SendMessageUseCase,
        UploadFileUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectUserUseCase（ユーザー接続のユースケース）
    pub connect_user_usecase: Arc<ConnectUserUseCase>,
    /// DisconnectUserUseCase（ユーザー切断のユースケース）
    pub disconnect_user_usecase: Arc<DisconnectUserUseCase>,
    /// CreateRoomUseCase（ルーム作成のユースケース）
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    /// JoinRoomUseCase（ルーム参加のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// QuitRoomUseCase（ルーム退出のユースケース）
    pub quit_room_usecase: Arc<QuitRoomUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// ListClientsUseCase（ユーザー一覧のユースケース）
    pub list_clients_usecase: Arc<ListClientsUseCase>,
    /// UploadFileUseCase（ファイルアップロードのユースケース）
    pub upload_file_usecase: Arc<UploadFileUseCase>,
    /// DownloadFileUseCase（ファイルダウンロードのユースケース）
    pub download_file_usecase: Arc<DownloadFileUseCase>,
}

impl AppState {
    /// Wire every use case onto the same repository, pusher, clock and file store
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        file_store: Arc<FileStore>,
    ) -> Self {
        Self {
            connect_user_usecase: Arc::new(ConnectUserUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            disconnect_user_usecase: Arc::new(DisconnectUserUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            create_room_usecase: Arc::new(CreateRoomUseCase::new(repository.clone())),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            )),
            quit_room_usecase: Arc::new(QuitRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock,
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            list_clients_usecase: Arc::new(ListClientsUseCase::new(repository.clone())),
            upload_file_usecase: Arc::new(UploadFileUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                file_store.clone(),
            )),
            download_file_usecase: Arc::new(DownloadFileUseCase::new(
                repository,
                message_pusher,
                file_store,
            )),
        }
    }
}
