/// Middleware for the API server
///
/// - `session`: session cookie resolution and cookie helpers
/// - `security`: browser hardening headers

pub mod security;
pub mod session;
