/// Database models for ChoreBoard
///
/// Each model owns the SQL for its table and exposes async functions that
/// take a `&PgPool`.
///
/// - `user`: accounts and household membership
/// - `household`: household rows
/// - `chore`: chores and the chore/user/household join used by the dashboard

pub mod chore;
pub mod household;
pub mod user;
