// src/application/state.rs

use std::sync::Arc;

use crate::repositories::Store;
use crate::services::{MovieService, ScoreService, SecurityContext, SessionContext, UserService};

/// Shared application state handed to every command.
/// All fields are Arc-wrapped for thread-safe sharing across commands.
pub struct AppState {
    pub session: Arc<SessionContext>,
    pub movie_service: Arc<MovieService>,
    pub score_service: Arc<ScoreService>,
    pub user_service: Arc<UserService>,
}

impl AppState {
    /// Wire the services over one store and one session
    pub fn new(store: Arc<dyn Store>, session: Arc<SessionContext>) -> Self {
        let security: Arc<dyn SecurityContext> = session.clone();
        let user_service = Arc::new(UserService::new(store.clone(), security));

        Self {
            movie_service: Arc::new(MovieService::new(store.clone())),
            score_service: Arc::new(ScoreService::new(store, user_service.clone())),
            user_service,
            session,
        }
    }
}
