//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! `RoomRegistry` を単一の `Mutex` で保護し、各メソッドを 1 回のロック内で
//! 完結させることで、全セッションからの変更を直列化します。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Departure, FileName, RegistryError, RoomName, RoomRegistry, RoomRepository, UserName,
};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// 全ルームとユーザーディレクトリ
    registry: Arc<Mutex<RoomRegistry>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(registry: Arc<Mutex<RoomRegistry>>) -> Self {
        Self { registry }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(RoomRegistry::new())))
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn register_user(&self, user_name: UserName) -> Result<(), RegistryError> {
        self.registry.lock().await.register_user(user_name)
    }

    async fn unregister_user(
        &self,
        user_name: &UserName,
    ) -> Result<Option<Departure>, RegistryError> {
        self.registry.lock().await.unregister_user(user_name)
    }

    async fn create_room(
        &self,
        user_name: &UserName,
        room_name: RoomName,
    ) -> Result<(), RegistryError> {
        self.registry.lock().await.create_room(user_name, room_name)
    }

    async fn join_room(
        &self,
        user_name: &UserName,
        room_name: &RoomName,
    ) -> Result<Vec<UserName>, RegistryError> {
        self.registry.lock().await.join_room(user_name, room_name)
    }

    async fn quit_room(&self, user_name: &UserName) -> Result<Departure, RegistryError> {
        self.registry.lock().await.quit_room(user_name)
    }

    async fn room_of(&self, user_name: &UserName) -> Result<Option<RoomName>, RegistryError> {
        self.registry.lock().await.room_of(user_name)
    }

    async fn peers_of(&self, user_name: &UserName) -> Option<(RoomName, Vec<UserName>)> {
        self.registry.lock().await.peers_of(user_name)
    }

    async fn members_of(&self, room_name: &RoomName) -> Vec<UserName> {
        self.registry.lock().await.members_of(room_name)
    }

    async fn user_names(&self) -> Vec<UserName> {
        self.registry.lock().await.user_names()
    }

    async fn register_upload(
        &self,
        room_name: &RoomName,
        file_name: FileName,
    ) -> Result<(), RegistryError> {
        self.registry
            .lock()
            .await
            .register_upload(room_name, file_name)
    }

    async fn has_file(&self, room_name: &RoomName, file_name: &FileName) -> bool {
        self.registry.lock().await.has_file(room_name, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 複数タスクから同時に操作しても RoomRegistry の整合性が保たれること
    //
    // 【なぜこのテストが必要か】
    // - セッションごとにタスクが動くため、変更の直列化が必須
    //
    // 【どのようなシナリオをテストするか】
    // 1. 同じユーザー名での同時登録は 1 件だけ成功する
    // 2. 同じルームへの同時作成は 1 件だけ成功する
    // 3. 同時参加・退出の後も整合性が保たれる
    // ========================================

    fn user(name: &str) -> UserName {
        UserName::new(name.to_string()).unwrap()
    }

    fn room(name: &str) -> RoomName {
        RoomName::new(name.to_string()).unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_registration_admits_one() {
        // テスト項目: 同じユーザー名の同時登録は 1 件だけ成功する
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::default());

        // when (操作):
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let repository = repository.clone();
                tokio::spawn(async move { repository.register_user(user("alice")).await })
            })
            .collect();
        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        // then (期待する結果):
        assert_eq!(successes, 1);
        assert_eq!(repository.user_names().await, vec![user("alice")]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_create_of_same_room_admits_one() {
        // テスト項目: 同じルームの同時作成は 1 件だけ成功し、作成者だけがメンバーになる
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::default());
        let names: Vec<String> = (0..16).map(|i| format!("user{i}")).collect();
        for name in &names {
            repository.register_user(user(name)).await.unwrap();
        }

        // when (操作):
        let handles: Vec<_> = names
            .iter()
            .map(|name| {
                let repository = repository.clone();
                let name = user(name);
                tokio::spawn(async move { repository.create_room(&name, room("lobby")).await })
            })
            .collect();
        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        // then (期待する結果):
        assert_eq!(successes, 1);
        assert_eq!(repository.members_of(&room("lobby")).await.len(), 1);
        assert!(repository.registry.lock().await.is_consistent());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_join_and_quit_stay_consistent() {
        // テスト項目: 同時に参加・退出を繰り返しても整合性が保たれる
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::default());
        repository.register_user(user("owner")).await.unwrap();
        repository
            .create_room(&user("owner"), room("lobby"))
            .await
            .unwrap();
        let names: Vec<String> = (0..8).map(|i| format!("user{i}")).collect();
        for name in &names {
            repository.register_user(user(name)).await.unwrap();
        }

        // when (操作):
        let handles: Vec<_> = names
            .iter()
            .map(|name| {
                let repository = repository.clone();
                let name = user(name);
                tokio::spawn(async move {
                    for _ in 0..50 {
                        let _ = repository.join_room(&name, &room("lobby")).await;
                        let _ = repository.quit_room(&name).await;
                    }
                    repository.join_room(&name, &room("lobby")).await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // then (期待する結果):
        assert_eq!(repository.members_of(&room("lobby")).await.len(), 9);
        assert!(repository.registry.lock().await.is_consistent());
    }
}
