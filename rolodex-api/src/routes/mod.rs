/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `contacts`: Per-user contact CRUD, search, and birthday lookups

pub mod auth;
pub mod contacts;
pub mod health;
