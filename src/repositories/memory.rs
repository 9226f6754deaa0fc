// src/repositories/memory.rs
//
// In-memory persistence gateway.
//
// Same contract as the SQLite store: transactions are serialized by a
// mutex, work on a copy-on-write snapshot, and only replace the shared
// state on commit. Deleting a rated movie and scoring an unknown movie or
// user are rejected as integrity violations.

use std::cell::{RefCell, RefMut};
use std::cmp::Ordering;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::{uuid, Uuid};

use crate::domain::page::{Page, PageRequest, SortDirection, SortField};
use crate::domain::{
    Movie, Role, Score, ScoreKey, User, UserDetailsProjection, ROLE_ADMIN, ROLE_CLIENT,
};
use crate::error::{StoreError, StoreResult};
use crate::repositories::movie_repository::MovieRepository;
use crate::repositories::score_repository::ScoreRepository;
use crate::repositories::store::{Store, Transaction};
use crate::repositories::user_repository::UserRepository;

const DEMO_PASSWORD: &str = "$2a$10$eACCYoNOHEqXve8aIWT8Nu3PkMXWBaOxJ9aORUYzfMQCbVBIhZ8tG";

#[derive(Debug, Clone, Default)]
struct MemoryState {
    /// Movie rows; `scores` is always empty here
    movies: Vec<Movie>,
    /// Score rows in insertion order
    scores: Vec<Score>,
    users: Vec<User>,
}

/// Every transaction, read or write, holds the one mutex until it ends,
/// so readers queue behind each other as well as behind writers. A
/// transaction starts from a shared `Arc` snapshot; the state is cloned
/// once, on the first mutation, and lookups never copy it.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<Arc<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Arc<MemoryState>>> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    /// Register an account, as an external provisioning system would
    pub fn provision_user(&self, user: User) -> StoreResult<()> {
        let mut guard = self.lock()?;
        let state = Arc::make_mut(&mut *guard);
        if state.users.iter().any(|u| u.username == user.username || u.id == user.id) {
            return Err(StoreError::IntegrityViolation(format!(
                "user {} already exists",
                user.username
            )));
        }
        state.users.push(user);
        Ok(())
    }

    /// Load the demo catalogue and accounts into an empty store.
    /// Returns false when the store already holds data.
    pub fn seed_demo_data(&self) -> StoreResult<bool> {
        let mut guard = self.lock()?;
        let state = Arc::make_mut(&mut *guard);
        if !state.movies.is_empty() || !state.users.is_empty() {
            return Ok(false);
        }

        let client = Role::new(1, ROLE_CLIENT);
        let admin = Role::new(2, ROLE_ADMIN);
        let mut alex = User::new("alex@gmail.com", DEMO_PASSWORD).with_role(client.clone());
        alex.id = uuid!("6f1c2a44-0d7e-4f5b-9a3e-1b2c3d4e5f60");
        let mut maria = User::new("maria@gmail.com", DEMO_PASSWORD)
            .with_role(client)
            .with_role(admin);
        maria.id = uuid!("8b4e6c10-2f3a-4d5e-8c7b-9a0b1c2d3e4f");
        state.users = vec![alex, maria];

        state.movies = [
            (uuid!("0b7a4d3e-5c61-4e2f-8a90-1d2e3f4a5b6c"), "The Witcher", 2019),
            (uuid!("1c8b5e4f-6d72-4f30-9ba1-2e3f4a5b6c7d"), "Venom: Let There Be Carnage", 2021),
            (
                uuid!("2d9c6f50-7e83-4041-acb2-3f4a5b6c7d8e"),
                "O Espetacular Homem-Aranha 2: A Ameaça de Electro",
                2014,
            ),
            (uuid!("3e0d7061-8f94-4152-bdc3-4a5b6c7d8e9f"), "Matrix Resurrections", 2021),
        ]
        .into_iter()
        .map(|(id, title, year)| {
            let mut movie = Movie::new(title.to_string(), year, None, None);
            movie.id = id;
            movie
        })
        .collect();

        log::info!("demo data seeded into memory store");
        Ok(true)
    }

    fn begin(&self) -> StoreResult<Box<dyn Transaction + '_>> {
        let guard = self.lock()?;
        let working = RefCell::new(Arc::clone(&*guard));
        Ok(Box::new(MemoryTransaction { guard, working }))
    }
}

impl Store for InMemoryStore {
    fn read(&self) -> StoreResult<Box<dyn Transaction + '_>> {
        self.begin()
    }

    fn write(&self) -> StoreResult<Box<dyn Transaction + '_>> {
        self.begin()
    }
}

struct MemoryTransaction<'a> {
    guard: MutexGuard<'a, Arc<MemoryState>>,
    working: RefCell<Arc<MemoryState>>,
}

impl Transaction for MemoryTransaction<'_> {
    fn movies(&self) -> Box<dyn MovieRepository + '_> {
        Box::new(MemoryRepository { state: &self.working })
    }

    fn scores(&self) -> Box<dyn ScoreRepository + '_> {
        Box::new(MemoryRepository { state: &self.working })
    }

    fn users(&self) -> Box<dyn UserRepository + '_> {
        Box::new(MemoryRepository { state: &self.working })
    }

    fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTransaction { mut guard, working } = *self;
        *guard = working.into_inner();
        Ok(())
    }
}

/// Repository view over a transaction's working copy
struct MemoryRepository<'t> {
    state: &'t RefCell<Arc<MemoryState>>,
}

impl MemoryRepository<'_> {
    /// Unshare the snapshot before the first mutation
    fn state_mut(&self) -> RefMut<'_, MemoryState> {
        RefMut::map(self.state.borrow_mut(), Arc::make_mut)
    }
}

fn compare_movies(a: &Movie, b: &Movie, field: SortField) -> Ordering {
    match field {
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortField::Year => a.year.cmp(&b.year),
        // None < Some(_): unrated movies sort lowest
        SortField::Score => a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal),
    }
}

impl MovieRepository for MemoryRepository<'_> {
    fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Movie>> {
        let state = self.state.borrow();
        let movie = state.movies.iter().find(|m| m.id == id).map(|m| {
            let mut movie = m.clone();
            movie.scores = state
                .scores
                .iter()
                .filter(|s| s.movie_id == id)
                .cloned()
                .collect();
            movie
        });
        Ok(movie)
    }

    fn get_reference_by_id(&self, id: Uuid) -> StoreResult<Movie> {
        self.state
            .borrow()
            .movies
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| StoreError::EntityNotFound(format!("Movie {}", id)))
    }

    fn exists_by_id(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.state.borrow().movies.iter().any(|m| m.id == id))
    }

    fn save(&self, movie: &Movie) -> StoreResult<Movie> {
        let mut row = movie.clone();
        row.scores.clear();

        let mut state = self.state_mut();
        match state.movies.iter_mut().find(|m| m.id == movie.id) {
            Some(existing) => {
                // created_at is immutable once stored
                row.created_at = existing.created_at;
                *existing = row;
            }
            None => state.movies.push(row),
        }
        Ok(movie.clone())
    }

    fn delete_by_id(&self, id: Uuid) -> StoreResult<()> {
        let mut state = self.state_mut();

        if state.scores.iter().any(|s| s.movie_id == id) {
            return Err(StoreError::IntegrityViolation(format!(
                "Movie {} is referenced by scores",
                id
            )));
        }

        let before = state.movies.len();
        state.movies.retain(|m| m.id != id);
        if state.movies.len() == before {
            return Err(StoreError::EntityNotFound(format!("Movie {}", id)));
        }
        Ok(())
    }

    fn search_by_title(&self, title: &str, request: &PageRequest) -> StoreResult<Page<Movie>> {
        let needle = title.to_lowercase();
        let state = self.state.borrow();

        let mut matches: Vec<&Movie> = state
            .movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .collect();

        matches.sort_by(|a, b| {
            let primary = compare_movies(a, b, request.sort.field);
            let primary = match request.sort.direction {
                SortDirection::Asc => primary,
                SortDirection::Desc => primary.reverse(),
            };
            primary.then_with(|| a.id.cmp(&b.id))
        });

        let total = matches.len() as u64;
        let content = matches
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.size as usize)
            .cloned()
            .collect();

        Ok(Page::new(content, request, total))
    }
}

impl ScoreRepository for MemoryRepository<'_> {
    fn save_and_flush(&self, score: &Score) -> StoreResult<Score> {
        let mut state = self.state_mut();

        if !state.movies.iter().any(|m| m.id == score.movie_id) {
            return Err(StoreError::IntegrityViolation(format!(
                "Movie {} does not exist",
                score.movie_id
            )));
        }
        if !state.users.iter().any(|u| u.id == score.user_id) {
            return Err(StoreError::IntegrityViolation(format!(
                "User {} does not exist",
                score.user_id
            )));
        }

        match state.scores.iter_mut().find(|s| s.key() == score.key()) {
            Some(existing) => existing.value = score.value,
            None => state.scores.push(score.clone()),
        }
        Ok(score.clone())
    }

    fn find_by_id(&self, key: ScoreKey) -> StoreResult<Option<Score>> {
        Ok(self
            .state
            .borrow()
            .scores
            .iter()
            .find(|s| s.key() == key)
            .cloned())
    }

    fn find_by_movie(&self, movie_id: Uuid) -> StoreResult<Vec<Score>> {
        Ok(self
            .state
            .borrow()
            .scores
            .iter()
            .filter(|s| s.movie_id == movie_id)
            .cloned()
            .collect())
    }
}

impl UserRepository for MemoryRepository<'_> {
    fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self
            .state
            .borrow()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    fn search_user_and_roles_by_username(
        &self,
        username: &str,
    ) -> StoreResult<Vec<UserDetailsProjection>> {
        let state = self.state.borrow();
        let rows = state
            .users
            .iter()
            .filter(|u| u.username == username)
            .flat_map(|u| {
                u.roles.iter().map(move |r| UserDetailsProjection {
                    username: u.username.clone(),
                    password: u.password.clone(),
                    role_id: r.id,
                    authority: r.authority.clone(),
                })
            })
            .collect();
        Ok(rows)
    }
}
