use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::entity::Role;

/// One flattened (user, role) row as returned by the login lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetailsProjection {
    pub username: String,
    pub password: String,
    pub role_id: i64,
    pub authority: String,
}

/// Login principal: a username with every role it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub roles: BTreeSet<Role>,
}

impl UserDetails {
    /// Collapse projection rows for `username` into one principal.
    ///
    /// Rows belonging to other usernames are ignored. Returns `None`
    /// when no row matches.
    pub fn from_projection(username: &str, rows: &[UserDetailsProjection]) -> Option<Self> {
        let mut matching = rows.iter().filter(|r| r.username == username).peekable();
        let first = matching.peek()?;

        let mut details = UserDetails {
            username: first.username.clone(),
            password: first.password.clone(),
            roles: BTreeSet::new(),
        };
        for row in matching {
            details.roles.insert(Role::new(row.role_id, row.authority.clone()));
        }
        Some(details)
    }

    pub fn has_role(&self, authority: &str) -> bool {
        self.roles.iter().any(|r| r.authority == authority)
    }
}
