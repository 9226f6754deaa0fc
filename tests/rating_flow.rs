// tests/rating_flow.rs
//
// End-to-end rating flow against a file-backed SQLite store.

use std::sync::Arc;
use std::thread;

use moviescore::db::{create_connection_pool, get_connection, initialize_database, seed_demo_data, PoolOptions};
use moviescore::services::{MovieRequest, MovieService, ScoreRequest, ScoreService, SessionContext, UserService};
use moviescore::{AppError, InMemoryStore, PageRequest, SqliteStore, Store};
use tempfile::TempDir;
use uuid::Uuid;

const ALEX: &str = "alex@gmail.com";
const MARIA: &str = "maria@gmail.com";

fn seeded_store() -> (TempDir, Arc<dyn Store>) {
    let dir = tempfile::tempdir().unwrap();
    let pool = create_connection_pool(&dir.path().join("movies.db"), PoolOptions::default()).unwrap();
    {
        let conn = get_connection(&pool).unwrap();
        initialize_database(&conn).unwrap();
        assert!(seed_demo_data(&conn).unwrap());
    }
    let store: Arc<dyn Store> = Arc::new(SqliteStore::new(Arc::new(pool)));
    (dir, store)
}

fn scorer(store: &Arc<dyn Store>, username: &str) -> ScoreService {
    let session = Arc::new(SessionContext::signed_in(username));
    let users = Arc::new(UserService::new(store.clone(), session));
    ScoreService::new(store.clone(), users)
}

fn new_movie(movies: &MovieService) -> Uuid {
    movies
        .insert(MovieRequest {
            title: "Dune: Part Two".to_string(),
            year: 2024,
            synopsis: None,
            image: None,
        })
        .unwrap()
        .id
}

#[test]
fn rating_scenario_end_to_end() {
    let (_dir, store) = seeded_store();
    let movies = MovieService::new(store.clone());
    let movie_id = new_movie(&movies);
    let alex = scorer(&store, ALEX);
    let maria = scorer(&store, MARIA);

    let rated = alex.save_score(ScoreRequest { movie_id, value: 5.0 }).unwrap();
    assert_eq!(rated.score, Some(5.0));

    let rated = maria.save_score(ScoreRequest { movie_id, value: 4.0 }).unwrap();
    assert_eq!(rated.score, Some(4.5));

    let rated = alex.save_score(ScoreRequest { movie_id, value: 3.0 }).unwrap();
    assert_eq!(rated.score, Some(3.5));
    assert_eq!(rated.count, 2);

    let stored = movies.find_by_id(movie_id).unwrap();
    assert_eq!(stored.score, Some(3.5));
    assert_eq!(stored.scores.len(), 2);
}

#[test]
fn rated_movie_cannot_be_deleted() {
    let (_dir, store) = seeded_store();
    let movies = MovieService::new(store.clone());
    let movie_id = new_movie(&movies);
    scorer(&store, ALEX)
        .save_score(ScoreRequest { movie_id, value: 2.0 })
        .unwrap();

    assert!(matches!(movies.delete(movie_id), Err(AppError::Conflict(_))));
    assert!(movies.find_by_id(movie_id).is_ok());
}

#[test]
fn unknown_movie_leaves_store_untouched() {
    let (_dir, store) = seeded_store();
    let movies = MovieService::new(store.clone());

    let result = scorer(&store, ALEX).save_score(ScoreRequest {
        movie_id: Uuid::new_v4(),
        value: 4.0,
    });

    assert!(matches!(result, Err(AppError::NotFound(_))));
    let page = movies.find_all("", PageRequest::default()).unwrap();
    assert_eq!(page.total_elements, 4);
    assert!(page.content.iter().all(|m| m.score.is_none()));
}

#[test]
fn concurrent_ratings_from_different_users_are_all_counted() {
    let (_dir, store) = seeded_store();
    let movies = MovieService::new(store.clone());
    let movie_id = new_movie(&movies);

    let mut handles = Vec::new();
    for (username, value) in [(ALEX, 1.0), (MARIA, 5.0)] {
        let scores = scorer(&store, username);
        handles.push(thread::spawn(move || {
            scores.save_score(ScoreRequest { movie_id, value }).unwrap();
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let stored = movies.find_by_id(movie_id).unwrap();
    assert_eq!(stored.count, 2);
    assert_eq!(stored.score, Some(3.0));
}

#[test]
fn title_search_matches_across_stores() {
    let (_dir, sqlite) = seeded_store();
    let memory = InMemoryStore::new();
    assert!(memory.seed_demo_data().unwrap());
    let memory: Arc<dyn Store> = Arc::new(memory);

    for query in ["AMEAÇA", "ameaça", "homem-aranha", "MATRIX", "%"] {
        let from_sqlite = MovieService::new(sqlite.clone())
            .find_all(query, PageRequest::default())
            .unwrap();
        let from_memory = MovieService::new(memory.clone())
            .find_all(query, PageRequest::default())
            .unwrap();

        let sqlite_ids: Vec<Uuid> = from_sqlite.content.iter().map(|m| m.id).collect();
        let memory_ids: Vec<Uuid> = from_memory.content.iter().map(|m| m.id).collect();
        assert_eq!(from_sqlite.total_elements, from_memory.total_elements, "query {:?}", query);
        assert_eq!(sqlite_ids, memory_ids, "query {:?}", query);
    }

    let page = MovieService::new(sqlite).find_all("AMEAÇA", PageRequest::default()).unwrap();
    assert_eq!(page.total_elements, 1);
}
