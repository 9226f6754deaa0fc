// src/application/commands/user_commands.rs
//
// User Command Handlers

use crate::application::{dto::*, error_handling::ToErrorResponse, state::AppState};

/// The stored user behind the current session
pub fn current_user(state: &AppState) -> Result<UserDto, String> {
    let user = state.user_service.authenticated().to_error_response()?;

    Ok(UserDto::from(user))
}

/// Login lookup of a principal and its authorities
pub fn load_user(state: &AppState, username: &str) -> Result<UserDetailsDto, String> {
    let details = state
        .user_service
        .load_user_by_username(username.trim())
        .to_error_response()?;

    Ok(UserDetailsDto::from(details))
}
