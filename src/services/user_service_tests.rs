// src/services/user_service_tests.rs
//
// Authentication resolver
//
// INVARIANTS TESTED:
// - a principal without a stored user is an authentication failure
// - login lookup collapses role rows into one principal

use std::sync::Arc;

use crate::domain::{ROLE_ADMIN, ROLE_CLIENT};
use crate::error::AppError;
use crate::repositories::Store;
use crate::services::test_support::{Fixture, ALEX, MARIA, UNKNOWN};
use crate::services::{MockSecurityContext, UserService};

fn service_with(fx: &Fixture, username: Option<&'static str>) -> UserService {
    let mut security = MockSecurityContext::new();
    security
        .expect_logged_username()
        .times(1)
        .returning(move || username.map(str::to_string));
    let store: Arc<dyn Store> = fx.store.clone();
    UserService::new(store, Arc::new(security))
}

#[test]
fn test_authenticated_returns_stored_user() {
    let fx = Fixture::new();
    let service = service_with(&fx, Some(MARIA));

    let user = service.authenticated().unwrap();

    assert_eq!(user.id, fx.maria.id);
    assert_eq!(user.username, MARIA);
    assert!(user.has_role(ROLE_ADMIN));
}

#[test]
fn test_authenticated_unknown_username_fails() {
    let fx = Fixture::new();
    let service = service_with(&fx, Some(UNKNOWN));

    match service.authenticated() {
        Err(AppError::Authentication(msg)) => assert_eq!(msg, "username not found"),
        other => panic!("expected authentication failure, got {:?}", other),
    }
}

#[test]
fn test_authenticated_without_principal_fails() {
    let fx = Fixture::new();
    let service = service_with(&fx, None);

    assert!(matches!(service.authenticated(), Err(AppError::Authentication(_))));
}

#[test]
fn test_session_principal_is_resolved() {
    let fx = Fixture::new();
    fx.session.sign_in(ALEX);

    let user = fx.users.authenticated().unwrap();

    assert_eq!(user.id, fx.alex.id);
    assert!(user.has_role(ROLE_CLIENT));
    assert!(!user.has_role(ROLE_ADMIN));
}

#[test]
fn test_load_user_by_username_collects_roles() {
    let fx = Fixture::new();

    let details = fx.users.load_user_by_username(MARIA).unwrap();

    assert_eq!(details.username, MARIA);
    assert_eq!(details.roles.len(), 2);
    assert!(details.has_role(ROLE_CLIENT));
    assert!(details.has_role(ROLE_ADMIN));
}

#[test]
fn test_load_user_by_unknown_username_fails() {
    let fx = Fixture::new();

    let result = fx.users.load_user_by_username(UNKNOWN);

    assert!(matches!(result, Err(AppError::Authentication(_))));
}
