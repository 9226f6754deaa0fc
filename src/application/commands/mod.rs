// src/application/commands/mod.rs
//
// Command Handlers
//
// ARCHITECTURE:
// - Commands are thin adapters between the CLI and Services
// - Commands accept DTOs, return DTOs
// - Errors are returned as JSON-encoded ErrorResponse strings
// - Commands NEVER contain business logic

pub mod movie_commands;
pub mod score_commands;
pub mod user_commands;

pub use movie_commands::*;
pub use score_commands::*;
pub use user_commands::*;

use uuid::Uuid;

use crate::application::error_handling::ErrorResponse;

/// Parse a caller-supplied identifier
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim())
        .map_err(|e| ErrorResponse::validation(format!("Invalid UUID '{}': {}", raw, e)).to_json())
}
