//! Role → members index derived from a user batch.
//!
//! Roles are created after users, so the index is what lets a new role start
//! out with the members the export declared. Key order and bucket order both
//! follow the user batch: the first user declaring a role is first in its bucket.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use rolesync_auth::{Role, UserRecord, Username};

/// Order-preserving mapping from role name to member usernames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleMembershipIndex {
    buckets: Vec<(Role, Vec<Username>)>,
    positions: HashMap<Role, usize>,
}

impl RoleMembershipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `users` in order and bucket each username under every role it declares.
    ///
    /// A user declaring the same role twice lands in that bucket twice.
    pub fn build<'a>(users: impl IntoIterator<Item = &'a UserRecord>) -> Self {
        let mut index = Self::new();
        for user in users {
            for role in user.roles() {
                index.push(role.clone(), user.username().clone());
            }
        }
        index
    }

    /// Append `username` to the bucket of `role`, creating the bucket on first sight.
    pub fn push(&mut self, role: Role, username: Username) {
        match self.positions.get(&role) {
            Some(&pos) => self.buckets[pos].1.push(username),
            None => {
                self.positions.insert(role.clone(), self.buckets.len());
                self.buckets.push((role, vec![username]));
            }
        }
    }

    /// Members of `role`; empty when no user declared it.
    pub fn members(&self, role: &Role) -> &[Username] {
        self.positions
            .get(role)
            .map(|&pos| self.buckets[pos].1.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains_role(&self, role: &Role) -> bool {
        self.positions.contains_key(role)
    }

    /// Number of distinct roles.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Roles in first-declared order.
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.buckets.iter().map(|(role, _)| role)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Role, &[Username])> {
        self.buckets
            .iter()
            .map(|(role, members)| (role, members.as_slice()))
    }
}

impl FromIterator<(Role, Username)> for RoleMembershipIndex {
    fn from_iter<I: IntoIterator<Item = (Role, Username)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (role, username) in iter {
            index.push(role, username);
        }
        index
    }
}

impl Serialize for RoleMembershipIndex {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (role, members) in &self.buckets {
            map.serialize_entry(role.as_str(), members)?;
        }
        map.end()
    }
}

/// Build the membership index for a user batch.
pub fn build_index(users: &[UserRecord]) -> RoleMembershipIndex {
    RoleMembershipIndex::build(users)
}
