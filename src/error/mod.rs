// src/error/mod.rs
//
// Error types shared across layers

pub mod types;

pub use types::{AppError, AppResult, StoreError, StoreResult};
