/// Database models for Rolodex
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts backing authentication
/// - `contact`: Per-user contact records with search and birthday lookups
///
/// # Example
///
/// ```no_run
/// use rolodex_shared::models::user::{CreateUser, User};
/// use rolodex_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     username: Some("jdoe".to_string()),
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod contact;
pub mod user;
