// src/db/mod.rs
//
// Database module
//
// Provides:
// - Connection pooling
// - Schema migrations and demo seed data
// - Database utilities

pub mod connection;
pub mod migrations;

pub use connection::{
    create_connection_pool, create_test_connection, create_test_pool, default_database_path,
    get_connection, register_functions, ConnectionPool, PoolOptions, PooledConn,
    UNICODE_LOWER_FN,
};

pub use migrations::{
    get_database_stats, initialize_database, seed_demo_data, verify_database_integrity,
    DatabaseStats,
};
