// src/services/mod.rs
//
// Services Module - Orchestration Layer
//
// Every operation runs inside exactly one Store transaction.
// Services never hold two transactions at once.

pub mod movie_service;
pub mod score_service;
pub mod security_context;
pub mod user_service;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod user_service_tests;

pub use movie_service::{MovieRequest, MovieService};
pub use score_service::{ScoreRequest, ScoreService};
pub use security_context::{SecurityContext, SessionContext};
pub use user_service::UserService;

#[cfg(test)]
pub use security_context::MockSecurityContext;
