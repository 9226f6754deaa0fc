// src/services/user_service.rs
//
// Authentication resolver: maps principals onto stored users.

use std::sync::Arc;

use crate::domain::{User, UserDetails};
use crate::error::{AppError, AppResult};
use crate::repositories::Store;
use crate::services::security_context::SecurityContext;

pub struct UserService {
    store: Arc<dyn Store>,
    security: Arc<dyn SecurityContext>,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>, security: Arc<dyn SecurityContext>) -> Self {
        Self { store, security }
    }

    /// The stored user behind the current session.
    ///
    /// A session without a backing user record is treated as an
    /// authentication failure, never as a plain not-found.
    pub fn authenticated(&self) -> AppResult<User> {
        let username = match self.security.logged_username() {
            Some(username) => username,
            None => {
                log::warn!("no principal bound to the current session");
                return Err(AppError::username_not_found());
            }
        };

        let tx = self.store.read()?;
        let user = tx.users().find_by_username(&username)?;

        user.ok_or_else(|| {
            log::warn!("principal {} has no stored user", username);
            AppError::username_not_found()
        })
    }

    /// Login lookup: collapses the (user, role) projection into one principal
    pub fn load_user_by_username(&self, username: &str) -> AppResult<UserDetails> {
        let tx = self.store.read()?;
        let rows = tx.users().search_user_and_roles_by_username(username)?;

        log::debug!("{} role rows for {}", rows.len(), username);

        UserDetails::from_projection(username, &rows).ok_or_else(|| {
            log::warn!("login lookup failed for {}", username);
            AppError::username_not_found()
        })
    }
}
