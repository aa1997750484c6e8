/// Request authentication context
///
/// The API layer validates the bearer token in a middleware layer and
/// inserts an [`AuthContext`] into the request extensions; handlers extract
/// it with `Extension<AuthContext>` and thread the caller's id into every
/// repository call.
///
/// # Example
///
/// ```
/// use rolodex_shared::auth::middleware::AuthContext;
///
/// let auth = AuthContext::from_jwt(42);
/// assert_eq!(auth.user_id, 42);
/// ```

use serde::{Deserialize, Serialize};

/// Error type for authentication failures
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No credentials were provided
    #[error("Missing credentials")]
    MissingCredentials,

    /// Credentials were malformed (e.g., not a Bearer token)
    #[error("Invalid credential format: {0}")]
    InvalidFormat(String),

    /// Token failed validation
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// Authenticated caller identity, resolved once per request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// The authenticated user's ID
    pub user_id: i64,
}

impl AuthContext {
    /// Creates an auth context from validated JWT claims
    pub fn from_jwt(user_id: i64) -> Self {
        Self { user_id }
    }
}
