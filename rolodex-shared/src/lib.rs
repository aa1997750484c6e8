//! # Rolodex Shared Library
//!
//! This crate contains shared types, utilities, and data-access logic used by
//! the Rolodex API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their CRUD operations
//! - `auth`: Password hashing, JWT tokens, and the request auth context
//! - `db`: Connection pool management and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Rolodex shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
