/// Application services
///
/// Services sit between the HTTP handlers and the models. They take the
/// pool and an explicit [`RequestContext`](crate::auth::context::RequestContext)
/// where identity matters, and return typed errors the API layer maps to
/// responses.
///
/// - `auth`: registration, login, logout
/// - `household`: create/join households and resolve the session state
/// - `chores`: chore and member queries, dashboard composition

pub mod auth;
pub mod chores;
pub mod household;
