/// Database plumbing: connection pool and schema migrations.
///
/// Row types and their queries live in [`crate::models`].

pub mod migrations;
pub mod pool;
