// src/repositories/user_repository.rs
//
// Read-only user lookups. Accounts are provisioned outside this crate.

use std::collections::BTreeSet;

use rusqlite::{params, Connection, Row};

use crate::domain::{Role, User, UserDetailsProjection};
use crate::error::StoreResult;
use crate::repositories::store::parse_uuid;

pub trait UserRepository {
    /// The user with all of its roles
    fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// One row per (user, role) pair; empty for unknown usernames
    fn search_user_and_roles_by_username(
        &self,
        username: &str,
    ) -> StoreResult<Vec<UserDetailsProjection>>;
}

pub struct SqliteUserRepository<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteUserRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn row_to_user(row: &Row) -> rusqlite::Result<User> {
        let id_str: String = row.get("id")?;
        Ok(User {
            id: parse_uuid(0, &id_str)?,
            username: row.get("username")?,
            password: row.get("password")?,
            roles: BTreeSet::new(),
        })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, username, password FROM users WHERE username = ?1")?;

        let mut user = match stmt.query_row(params![username], Self::row_to_user) {
            Ok(user) => user,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut roles_stmt = self.conn.prepare(
            "SELECT r.id, r.authority FROM roles r
             INNER JOIN user_roles ur ON ur.role_id = r.id
             WHERE ur.user_id = ?1",
        )?;
        user.roles = roles_stmt
            .query_map(params![user.id.to_string()], |row| {
                Ok(Role::new(row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Some(user))
    }

    fn search_user_and_roles_by_username(
        &self,
        username: &str,
    ) -> StoreResult<Vec<UserDetailsProjection>> {
        let mut stmt = self.conn.prepare(
            "SELECT u.username, u.password, r.id AS role_id, r.authority
             FROM users u
             INNER JOIN user_roles ur ON u.id = ur.user_id
             INNER JOIN roles r ON r.id = ur.role_id
             WHERE u.username = ?1",
        )?;

        let rows = stmt
            .query_map(params![username], |row| {
                Ok(UserDetailsProjection {
                    username: row.get("username")?,
                    password: row.get("password")?,
                    role_id: row.get("role_id")?,
                    authority: row.get("authority")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_connection, initialize_database, seed_demo_data};
    use crate::domain::{ROLE_ADMIN, ROLE_CLIENT};

    fn setup() -> Connection {
        let conn = create_test_connection().unwrap();
        initialize_database(&conn).unwrap();
        seed_demo_data(&conn).unwrap();
        conn
    }

    #[test]
    fn test_find_by_username_loads_roles() {
        let conn = setup();
        let repo = SqliteUserRepository::new(&conn);

        let maria = repo.find_by_username("maria@gmail.com").unwrap().unwrap();

        assert_eq!(maria.username, "maria@gmail.com");
        assert!(maria.has_role(ROLE_ADMIN));
        assert!(maria.has_role(ROLE_CLIENT));
        assert!(repo.find_by_username("test@gmail.com").unwrap().is_none());
    }

    #[test]
    fn test_projection_has_one_row_per_role() {
        let conn = setup();
        let repo = SqliteUserRepository::new(&conn);

        let rows = repo.search_user_and_roles_by_username("maria@gmail.com").unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.username == "maria@gmail.com"));

        let none = repo.search_user_and_roles_by_username("test@gmail.com").unwrap();
        assert!(none.is_empty());
    }
}
