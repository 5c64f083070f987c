//! Domain entities.

use std::collections::BTreeSet;

use super::value_object::{FileName, RoomName, UserName};

/// A named group of chat users.
///
/// Identity is the room name alone. Membership is only changed through
/// [`RoomRegistry`](super::RoomRegistry), which keeps it in step with the
/// user directory.
#[derive(Debug, Clone)]
pub struct Room {
    pub name: RoomName,
    members: BTreeSet<UserName>,
    uploaded_files: BTreeSet<FileName>,
}

impl Room {
    pub fn new(name: RoomName) -> Self {
        Self {
            name,
            members: BTreeSet::new(),
            uploaded_files: BTreeSet::new(),
        }
    }

    pub(crate) fn add_member(&mut self, user_name: UserName) -> bool {
        self.members.insert(user_name)
    }

    pub(crate) fn remove_member(&mut self, user_name: &UserName) -> bool {
        self.members.remove(user_name)
    }

    pub fn has_member(&self, user_name: &UserName) -> bool {
        self.members.contains(user_name)
    }

    /// Member names in sorted order
    pub fn member_names(&self) -> Vec<UserName> {
        self.members.iter().cloned().collect()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub(crate) fn register_file(&mut self, file_name: FileName) -> bool {
        self.uploaded_files.insert(file_name)
    }

    pub fn has_file(&self, file_name: &FileName) -> bool {
        self.uploaded_files.contains(file_name)
    }
}

impl PartialEq for Room {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Room {}
