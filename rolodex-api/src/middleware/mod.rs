/// HTTP middleware for the API server
///
/// - `security`: response security headers (OWASP defaults)

pub mod security;
