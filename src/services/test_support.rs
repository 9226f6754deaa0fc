// src/services/test_support.rs
//
// Shared fixtures for the service tests.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Movie, Role, User, ROLE_ADMIN, ROLE_CLIENT};
use crate::repositories::{InMemoryStore, Store};
use crate::services::security_context::{SecurityContext, SessionContext};
use crate::services::{MovieService, ScoreService, UserService};

pub const ALEX: &str = "alex@gmail.com";
pub const MARIA: &str = "maria@gmail.com";
pub const UNKNOWN: &str = "test@gmail.com";

pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub session: Arc<SessionContext>,
    pub movies: MovieService,
    pub scores: ScoreService,
    pub users: Arc<UserService>,
    pub alex: User,
    pub maria: User,
}

impl Fixture {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let alex = User::new(ALEX, "$2a$10$alex").with_role(Role::new(1, ROLE_CLIENT));
        let maria = User::new(MARIA, "$2a$10$maria")
            .with_role(Role::new(1, ROLE_CLIENT))
            .with_role(Role::new(2, ROLE_ADMIN));
        store.provision_user(alex.clone()).unwrap();
        store.provision_user(maria.clone()).unwrap();

        let session = Arc::new(SessionContext::new());
        let dyn_store: Arc<dyn Store> = store.clone();
        let security: Arc<dyn SecurityContext> = session.clone();
        let users = Arc::new(UserService::new(dyn_store.clone(), security));

        Self {
            movies: MovieService::new(dyn_store.clone()),
            scores: ScoreService::new(dyn_store, users.clone()),
            store,
            session,
            users,
            alex,
            maria,
        }
    }

    /// Stores an unrated movie directly, bypassing the service
    pub fn stored_movie(&self, title: &str, year: i32) -> Movie {
        let movie = Movie::new(title.to_string(), year, None, None);
        let tx = self.store.write().unwrap();
        tx.movies().save(&movie).unwrap();
        tx.commit().unwrap();
        movie
    }

    pub fn score_count(&self, movie_id: Uuid) -> usize {
        let tx = self.store.read().unwrap();
        let scores = tx.scores().find_by_movie(movie_id).unwrap();
        scores.len()
    }
}
