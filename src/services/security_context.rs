// src/services/security_context.rs
//
// Source of the current principal.

use std::sync::RwLock;

/// Exposes the username of the principal bound to the current session.
#[cfg_attr(test, mockall::automock)]
pub trait SecurityContext: Send + Sync {
    /// `None` when nobody is signed in
    fn logged_username(&self) -> Option<String>;
}

/// Process-wide session holding at most one signed-in principal.
#[derive(Debug, Default)]
pub struct SessionContext {
    username: RwLock<Option<String>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(username: impl Into<String>) -> Self {
        Self {
            username: RwLock::new(Some(username.into())),
        }
    }

    pub fn sign_in(&self, username: impl Into<String>) {
        let username = username.into();
        log::debug!("session bound to {}", username);
        match self.username.write() {
            Ok(mut guard) => *guard = Some(username),
            Err(poisoned) => *poisoned.into_inner() = Some(username),
        }
    }

    pub fn sign_out(&self) {
        match self.username.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }
}

impl SecurityContext for SessionContext {
    fn logged_username(&self) -> Option<String> {
        match self.username.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
