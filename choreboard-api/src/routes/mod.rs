/// Route handlers
///
/// - `pages`: static page renders and redirects
/// - `auth`: register, login, logout
/// - `household`: create/join household, member listing
/// - `dashboard`: home and chores pages, chore data
/// - `health`: health check

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod household;
pub mod pages;
