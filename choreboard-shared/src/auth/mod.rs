/// Authentication primitives
///
/// - [`password`]: Argon2id hashing with configurable cost
/// - [`token`]: session tokens and HMAC-signed cookie values
/// - [`context`]: the per-request identity and onboarding state
///
/// Session storage lives in [`crate::session`].

pub mod context;
pub mod password;
pub mod token;
