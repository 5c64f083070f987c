//! Room registry: every room plus the directory of connected users.
//!
//! The registry is the single owner of membership state. Each method is one
//! transaction over both structures, so the directory entry of a user and the
//! member sets of the rooms always agree: `directory[u] == Some(r)` exactly
//! when `u` is a member of room `r`, and a user is in at most one room.
//!
//! The registry itself is synchronous and has no interior locking; the
//! repository wraps it in a single mutex so that concurrent sessions see the
//! methods as serialized.

use std::collections::HashMap;

use super::{
    entity::Room,
    error::RegistryError,
    value_object::{FileName, RoomName, UserName},
};

/// Result of a user leaving a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// The room that was left
    pub room: RoomName,
    /// Members still in the room after the departure
    pub remaining: Vec<UserName>,
}

#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomName, Room>,
    directory: HashMap<UserName, Option<RoomName>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly connected user with no room.
    pub fn register_user(&mut self, user_name: UserName) -> Result<(), RegistryError> {
        if self.directory.contains_key(&user_name) {
            return Err(RegistryError::DuplicateUser(user_name));
        }
        self.directory.insert(user_name, None);
        Ok(())
    }

    /// Remove a user from the directory and from their room, if any.
    ///
    /// Returns the departure when the user was in a room. Removing a user that
    /// is no longer registered fails with `UnknownUser` and changes nothing, so
    /// a second teardown of the same session is harmless.
    pub fn unregister_user(
        &mut self,
        user_name: &UserName,
    ) -> Result<Option<Departure>, RegistryError> {
        let Some(room_name) = self.directory.remove(user_name) else {
            return Err(RegistryError::UnknownUser(user_name.clone()));
        };
        Ok(room_name.map(|room_name| self.leave(user_name, room_name)))
    }

    /// Create a room with the requester as its first member.
    pub fn create_room(
        &mut self,
        user_name: &UserName,
        room_name: RoomName,
    ) -> Result<(), RegistryError> {
        let current = self.current_room(user_name)?;
        if self.rooms.contains_key(&room_name) {
            return Err(RegistryError::RoomAlreadyExists(room_name));
        }
        if let Some(current) = current {
            return Err(RegistryError::AlreadyInRoom(current));
        }

        let mut room = Room::new(room_name.clone());
        room.add_member(user_name.clone());
        self.rooms.insert(room_name.clone(), room);
        self.directory.insert(user_name.clone(), Some(room_name));
        Ok(())
    }

    /// Add the requester to an existing room.
    ///
    /// Returns the other members of the room, who are to be told about the
    /// join.
    pub fn join_room(
        &mut self,
        user_name: &UserName,
        room_name: &RoomName,
    ) -> Result<Vec<UserName>, RegistryError> {
        if let Some(current) = self.current_room(user_name)? {
            return Err(RegistryError::AlreadyInRoom(current));
        }
        let Some(room) = self.rooms.get_mut(room_name) else {
            return Err(RegistryError::RoomNotFound(room_name.clone()));
        };

        let others = room.member_names();
        room.add_member(user_name.clone());
        self.directory
            .insert(user_name.clone(), Some(room_name.clone()));
        Ok(others)
    }

    /// Take the requester out of their room. The room is kept even when it
    /// becomes empty.
    pub fn quit_room(&mut self, user_name: &UserName) -> Result<Departure, RegistryError> {
        let Some(room_name) = self.current_room(user_name)? else {
            return Err(RegistryError::NotInRoom);
        };
        self.directory.insert(user_name.clone(), None);
        Ok(self.leave(user_name, room_name))
    }

    /// Room the user is currently in.
    pub fn room_of(&self, user_name: &UserName) -> Result<Option<RoomName>, RegistryError> {
        self.current_room(user_name)
    }

    /// The user's room and its members other than the user.
    ///
    /// `None` when the user is unknown or not in a room.
    pub fn peers_of(&self, user_name: &UserName) -> Option<(RoomName, Vec<UserName>)> {
        let room_name = self.directory.get(user_name)?.as_ref()?;
        let room = self.rooms.get(room_name)?;
        let peers = room
            .member_names()
            .into_iter()
            .filter(|member| member != user_name)
            .collect();
        Some((room_name.clone(), peers))
    }

    /// Members of a room; an unknown room has no members.
    pub fn members_of(&self, room_name: &RoomName) -> Vec<UserName> {
        self.rooms
            .get(room_name)
            .map(Room::member_names)
            .unwrap_or_default()
    }

    /// All connected users, sorted.
    pub fn user_names(&self) -> Vec<UserName> {
        let mut names: Vec<UserName> = self.directory.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn room(&self, room_name: &RoomName) -> Option<&Room> {
        self.rooms.get(room_name)
    }

    /// Record a finished upload in the room's file set.
    pub fn register_upload(
        &mut self,
        room_name: &RoomName,
        file_name: FileName,
    ) -> Result<(), RegistryError> {
        let Some(room) = self.rooms.get_mut(room_name) else {
            return Err(RegistryError::RoomNotFound(room_name.clone()));
        };
        room.register_file(file_name);
        Ok(())
    }

    pub fn has_file(&self, room_name: &RoomName, file_name: &FileName) -> bool {
        self.rooms
            .get(room_name)
            .is_some_and(|room| room.has_file(file_name))
    }

    fn current_room(&self, user_name: &UserName) -> Result<Option<RoomName>, RegistryError> {
        self.directory
            .get(user_name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownUser(user_name.clone()))
    }

    fn leave(&mut self, user_name: &UserName, room_name: RoomName) -> Departure {
        let remaining = match self.rooms.get_mut(&room_name) {
            Some(room) => {
                room.remove_member(user_name);
                room.member_names()
            }
            None => Vec::new(),
        };
        Departure {
            room: room_name,
            remaining,
        }
    }

    /// Check the directory/membership invariant.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let directory_agrees = self.directory.iter().all(|(user, room)| match room {
            Some(room) => self.rooms.get(room).is_some_and(|r| r.has_member(user)),
            None => self.rooms.values().all(|r| !r.has_member(user)),
        });
        let rooms_agree = self.rooms.values().all(|room| {
            room.member_names()
                .iter()
                .all(|member| self.directory.get(member) == Some(&Some(room.name.clone())))
        });
        directory_agrees && rooms_agree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - RoomRegistry の create / join / quit / unregister
    // - ディレクトリとルームメンバーの整合性
    //
    // 【なぜこのテストが必要か】
    // - 全セッションが共有する状態の中核であり、1 ユーザー 1 ルームの不変条件を守る必要がある
    //
    // 【どのようなシナリオをテストするか】
    // 1. 重複ユーザー名の拒否
    // 2. ルーム作成の成功と重複作成
    // 3. 参加中の別ルームへの参加拒否
    // 4. 退出と空ルームの保持
    // 5. 切断の冪等性
    // 6. 任意の操作列に対する整合性
    // ========================================

    fn user(name: &str) -> UserName {
        UserName::new(name.to_string()).unwrap()
    }

    fn room(name: &str) -> RoomName {
        RoomName::new(name.to_string()).unwrap()
    }

    fn file(name: &str) -> FileName {
        FileName::new(name.to_string()).unwrap()
    }

    fn registry_with(users: &[&str]) -> RoomRegistry {
        let mut registry = RoomRegistry::new();
        for name in users {
            registry.register_user(user(name)).unwrap();
        }
        registry
    }

    #[test]
    fn test_register_duplicate_user_is_rejected() {
        // テスト項目: 接続中のユーザー名での登録は拒否される
        // given (前提条件):
        let mut registry = registry_with(&["alice"]);

        // when (操作):
        let result = registry.register_user(user("alice"));

        // then (期待する結果):
        assert_eq!(result, Err(RegistryError::DuplicateUser(user("alice"))));
        assert_eq!(registry.user_names(), vec![user("alice")]);
    }

    #[test]
    fn test_create_room_adds_creator_as_member() {
        // テスト項目: ルームを作成すると作成者が唯一のメンバーになる
        // given (前提条件):
        let mut registry = registry_with(&["alice"]);

        // when (操作):
        let result = registry.create_room(&user("alice"), room("lobby"));

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(registry.members_of(&room("lobby")), vec![user("alice")]);
        assert_eq!(registry.room_of(&user("alice")), Ok(Some(room("lobby"))));
        assert!(registry.is_consistent());
    }

    #[test]
    fn test_create_existing_room_leaves_membership_unchanged() {
        // テスト項目: 既存ルームの再作成は already exists となり状態は変わらない
        // given (前提条件):
        let mut registry = registry_with(&["alice", "bob"]);
        registry.create_room(&user("alice"), room("lobby")).unwrap();

        // when (操作):
        let result = registry.create_room(&user("bob"), room("lobby"));

        // then (期待する結果):
        assert_eq!(result, Err(RegistryError::RoomAlreadyExists(room("lobby"))));
        assert_eq!(result.unwrap_err().to_string(), "Room lobby already exists");
        assert_eq!(registry.members_of(&room("lobby")), vec![user("alice")]);
        assert_eq!(registry.room_of(&user("bob")), Ok(None));
        assert!(registry.is_consistent());
    }

    #[test]
    fn test_create_room_while_in_another_room_is_rejected() {
        // テスト項目: ルーム参加中に新しいルームを作成することはできない
        // given (前提条件):
        let mut registry = registry_with(&["alice"]);
        registry.create_room(&user("alice"), room("office")).unwrap();

        // when (操作):
        let result = registry.create_room(&user("alice"), room("lobby"));

        // then (期待する結果):
        assert_eq!(result, Err(RegistryError::AlreadyInRoom(room("office"))));
        assert!(registry.room(&room("lobby")).is_none());
        assert!(registry.is_consistent());
    }

    #[test]
    fn test_join_room_returns_existing_members() {
        // テスト項目: 参加すると既存メンバー（通知対象）が返される
        // given (前提条件):
        let mut registry = registry_with(&["alice", "bob", "charlie"]);
        registry.create_room(&user("alice"), room("lobby")).unwrap();
        registry.join_room(&user("bob"), &room("lobby")).unwrap();

        // when (操作):
        let others = registry.join_room(&user("charlie"), &room("lobby")).unwrap();

        // then (期待する結果):
        assert_eq!(others, vec![user("alice"), user("bob")]);
        assert_eq!(registry.members_of(&room("lobby")).len(), 3);
        assert!(registry.is_consistent());
    }

    #[test]
    fn test_join_while_in_another_room_is_rejected() {
        // テスト項目: 別ルームに参加中のユーザーの参加は拒否され、元のルームに留まる
        // given (前提条件):
        let mut registry = registry_with(&["alice", "bob"]);
        registry.create_room(&user("bob"), room("lobby")).unwrap();
        registry.create_room(&user("alice"), room("office")).unwrap();

        // when (操作):
        let result = registry.join_room(&user("alice"), &room("lobby"));

        // then (期待する結果):
        assert_eq!(result, Err(RegistryError::AlreadyInRoom(room("office"))));
        assert_eq!(registry.room_of(&user("alice")), Ok(Some(room("office"))));
        assert_eq!(registry.members_of(&room("lobby")), vec![user("bob")]);
        assert!(registry.is_consistent());
    }

    #[test]
    fn test_join_unknown_room_is_rejected() {
        // テスト項目: 存在しないルームへの参加は does not exist となる
        // given (前提条件):
        let mut registry = registry_with(&["alice"]);

        // when (操作):
        let result = registry.join_room(&user("alice"), &room("nowhere"));

        // then (期待する結果):
        assert_eq!(result, Err(RegistryError::RoomNotFound(room("nowhere"))));
        assert_eq!(result.unwrap_err().to_string(), "Room nowhere does not exist");
    }

    #[test]
    fn test_quit_room_keeps_empty_room() {
        // テスト項目: 最後のメンバーが退出してもルームは残る
        // given (前提条件):
        let mut registry = registry_with(&["alice"]);
        registry.create_room(&user("alice"), room("lobby")).unwrap();

        // when (操作):
        let departure = registry.quit_room(&user("alice")).unwrap();

        // then (期待する結果):
        assert_eq!(departure.room, room("lobby"));
        assert!(departure.remaining.is_empty());
        assert!(registry.room(&room("lobby")).is_some());
        assert_eq!(registry.room_of(&user("alice")), Ok(None));
        assert!(registry.is_consistent());
    }

    #[test]
    fn test_quit_without_room_is_rejected() {
        // テスト項目: ルーム未参加での退出は not connected となる
        // given (前提条件):
        let mut registry = registry_with(&["alice"]);

        // when (操作):
        let result = registry.quit_room(&user("alice"));

        // then (期待する結果):
        assert_eq!(result, Err(RegistryError::NotInRoom));
    }

    #[test]
    fn test_unregister_is_idempotent() {
        // テスト項目: 2 回目の登録解除は何も変更せず UnknownUser を返す
        // given (前提条件):
        let mut registry = registry_with(&["alice", "bob"]);
        registry.create_room(&user("alice"), room("lobby")).unwrap();
        registry.join_room(&user("bob"), &room("lobby")).unwrap();

        // when (操作):
        let first = registry.unregister_user(&user("alice"));
        let second = registry.unregister_user(&user("alice"));

        // then (期待する結果):
        assert_eq!(
            first,
            Ok(Some(Departure {
                room: room("lobby"),
                remaining: vec![user("bob")],
            }))
        );
        assert_eq!(second, Err(RegistryError::UnknownUser(user("alice"))));
        assert_eq!(registry.members_of(&room("lobby")), vec![user("bob")]);
        assert!(registry.is_consistent());
    }

    #[test]
    fn test_unregister_after_quit_has_no_departure() {
        // テスト項目: 退出済みユーザーの切断ではルーム離脱が発生しない
        // given (前提条件):
        let mut registry = registry_with(&["alice"]);
        registry.create_room(&user("alice"), room("lobby")).unwrap();
        registry.quit_room(&user("alice")).unwrap();

        // when (操作):
        let result = registry.unregister_user(&user("alice"));

        // then (期待する結果):
        assert_eq!(result, Ok(None));
        assert!(registry.user_names().is_empty());
    }

    #[test]
    fn test_peers_of_excludes_the_user() {
        // テスト項目: peers_of は本人を除いたルームメンバーを返す
        // given (前提条件):
        let mut registry = registry_with(&["alice", "bob", "carol"]);
        registry.create_room(&user("alice"), room("lobby")).unwrap();
        registry.join_room(&user("bob"), &room("lobby")).unwrap();

        // when (操作):
        let peers = registry.peers_of(&user("bob"));

        // then (期待する結果):
        assert_eq!(peers, Some((room("lobby"), vec![user("alice")])));
        assert_eq!(registry.peers_of(&user("carol")), None);
        assert_eq!(registry.peers_of(&user("nobody")), None);
    }

    #[test]
    fn test_uploaded_files_are_scoped_to_room() {
        // テスト項目: アップロード済みファイルは登録したルームにのみ属する
        // given (前提条件):
        let mut registry = registry_with(&["alice", "bob"]);
        registry.create_room(&user("alice"), room("lobby")).unwrap();
        registry.create_room(&user("bob"), room("office")).unwrap();

        // when (操作):
        registry.register_upload(&room("lobby"), file("x.txt")).unwrap();

        // then (期待する結果):
        assert!(registry.has_file(&room("lobby"), &file("x.txt")));
        assert!(!registry.has_file(&room("office"), &file("x.txt")));
        assert!(!registry.has_file(&room("nowhere"), &file("x.txt")));
        assert_eq!(
            registry.register_upload(&room("nowhere"), file("x.txt")),
            Err(RegistryError::RoomNotFound(room("nowhere")))
        );
    }

    #[test]
    fn test_members_of_unknown_room_is_empty() {
        // テスト項目: 存在しないルームのメンバー一覧は空（エラーではない）
        // given (前提条件):
        let registry = registry_with(&["alice"]);

        // when (操作):
        let members = registry.members_of(&room("nowhere"));

        // then (期待する結果):
        assert!(members.is_empty());
    }

    #[test]
    fn test_invariants_hold_for_arbitrary_operation_sequences() {
        // テスト項目: 任意の操作列の各時点でディレクトリとメンバーが一致し、
        //             ユーザーが同時に 2 つのルームに属さない
        // given (前提条件):
        let users = ["alice", "bob", "carol", "dave"];
        let rooms = ["lobby", "office", "garden"];
        let mut registry = registry_with(&users);
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed
        };

        for _ in 0..2000 {
            let who = user(users[(next() % users.len() as u64) as usize]);
            let which = room(rooms[(next() % rooms.len() as u64) as usize]);

            // when (操作):
            match next() % 5 {
                0 => {
                    let _ = registry.create_room(&who, which);
                }
                1 => {
                    let _ = registry.join_room(&who, &which);
                }
                2 => {
                    let _ = registry.quit_room(&who);
                }
                3 => {
                    let _ = registry.unregister_user(&who);
                }
                _ => {
                    let _ = registry.register_user(who);
                }
            }

            // then (期待する結果):
            assert!(registry.is_consistent());
            for name in users {
                let memberships = rooms
                    .iter()
                    .filter(|r| registry.members_of(&room(r)).contains(&user(name)))
                    .count();
                assert!(memberships <= 1);
            }
        }
    }
}
