use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

pub const ROLE_CLIENT: &str = "ROLE_CLIENT";
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Authorization role granted to a user
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub authority: String,
}

impl Role {
    pub fn new(id: i64, authority: impl Into<String>) -> Self {
        Self {
            id,
            authority: authority.into(),
        }
    }
}

/// A stored account. Users are provisioned outside this crate and only read here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,

    /// Unique login key
    pub username: String,

    /// Stored credential, opaque to this crate
    #[serde(skip_serializing)]
    pub password: String,

    pub roles: BTreeSet<Role>,
}

impl User {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password: password.into(),
            roles: BTreeSet::new(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    pub fn has_role(&self, authority: &str) -> bool {
        self.roles.iter().any(|r| r.authority == authority)
    }
}
