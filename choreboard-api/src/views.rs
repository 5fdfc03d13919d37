/// Server-rendered HTML pages
///
/// Every page goes through [`layout`]; all user-supplied text is passed
/// through [`escape`] before it is interpolated.

use axum::response::Html;
use choreboard_shared::{
    models::{chore::HouseholdChore, household::Household, user::User, user::UserSummary},
    services::chores::Dashboard,
};
use std::fmt::Write as _;

/// Escapes text for use in HTML element content and quoted attributes
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, signed_in: bool, body: &str) -> Html<String> {
    let nav = if signed_in {
        r#"<a href="/pages/home">Home</a> <a href="/chores">Chores</a> <a href="/house">Household</a> <a href="/account">Account</a> <a href="/logout">Log out</a>"#
    } else {
        r#"<a href="/login">Log in</a> <a href="/register">Register</a>"#
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | ChoreBoard</title>
<link rel="stylesheet" href="/resources/css/style.css">
</head>
<body>
<nav>{nav}</nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        nav = nav,
        body = body,
    ))
}

fn message_block(message: Option<&str>) -> String {
    message
        .map(|m| format!(r#"<p class="message" role="alert">{}</p>"#, escape(m)))
        .unwrap_or_default()
}

pub fn login(message: Option<&str>) -> Html<String> {
    let body = format!(
        r#"<h1>Log in</h1>
{message}
<form method="post" action="/login">
<label>Username <input name="username" autocomplete="username" required></label>
<label>Password <input name="password" type="password" autocomplete="current-password" required></label>
<button type="submit">Log in</button>
</form>
<p>No account yet? <a href="/register">Register</a></p>"#,
        message = message_block(message),
    );
    layout("Log in", false, &body)
}

pub fn register(message: Option<&str>) -> Html<String> {
    let body = format!(
        r#"<h1>Create an account</h1>
{message}
<form method="post" action="/register">
<label>First name <input name="first_name" required></label>
<label>Last name <input name="last_name" required></label>
<label>Username <input name="username" autocomplete="username" required></label>
<label>Email <input name="email" type="email" autocomplete="email" required></label>
<label>Password <input name="password" type="password" autocomplete="new-password" required></label>
<button type="submit">Register</button>
</form>
<p>Already registered? <a href="/login">Log in</a></p>"#,
        message = message_block(message),
    );
    layout("Register", false, &body)
}

pub fn logout() -> Html<String> {
    layout(
        "Logged out",
        false,
        r#"<h1>You have been logged out</h1>
<p><a href="/login">Log in again</a></p>"#,
    )
}

fn chore_rows(chores: &[HouseholdChore]) -> String {
    if chores.is_empty() {
        return r#"<p class="empty">No chores yet.</p>"#.to_string();
    }

    let mut rows = String::from(
        "<table class=\"chores\">\n<thead><tr><th>Chore</th><th>Description</th><th>Assigned to</th><th>Due</th><th>Done</th></tr></thead>\n<tbody>\n",
    );
    for chore in chores {
        let due = chore
            .due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());

        let _ = writeln!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&chore.chore_name),
            escape(chore.chore_description.as_deref().unwrap_or("")),
            escape(&chore.username),
            due,
            if chore.completion_status { "Yes" } else { "No" },
        );
    }
    rows.push_str("</tbody>\n</table>");
    rows
}

fn member_list(users: &[UserSummary]) -> String {
    let mut list = String::from("<ul class=\"members\">\n");
    for user in users {
        let avatar = user
            .profile_image
            .as_deref()
            .map(|src| format!(r#"<img src="{}" alt="" width="32" height="32"> "#, escape(src)))
            .unwrap_or_default();

        let _ = writeln!(
            list,
            "<li>{}{} {} <span class=\"username\">({})</span></li>",
            avatar,
            escape(&user.first_name),
            escape(&user.last_name),
            escape(&user.username),
        );
    }
    list.push_str("</ul>");
    list
}

pub fn home(dashboard: &Dashboard) -> Html<String> {
    let household_name = dashboard
        .chores
        .first()
        .map(|c| c.household_name.as_str())
        .unwrap_or("Your household");

    let body = format!(
        r#"<h1>Welcome, {username}</h1>
<section>
<h2>{household} chores</h2>
{chores}
</section>
<section>
<h2>Members</h2>
{members}
</section>"#,
        username = escape(&dashboard.username),
        household = escape(household_name),
        chores = chore_rows(&dashboard.chores),
        members = member_list(&dashboard.users),
    );
    layout("Home", true, &body)
}

pub fn chores(dashboard: &Dashboard) -> Html<String> {
    let body = format!(
        r#"<h1>Chores</h1>
{chores}
<h2>Who can help</h2>
{members}"#,
        chores = chore_rows(&dashboard.chores),
        members = member_list(&dashboard.users),
    );
    layout("Chores", true, &body)
}

pub fn join(signed_in: bool) -> Html<String> {
    let body = r#"<h1>Find your household</h1>
<section>
<h2>Start a new household</h2>
<form method="post" action="/create-household">
<button type="submit">Create household</button>
</form>
</section>
<section>
<h2>Join an existing household</h2>
<form method="post" action="/join-household">
<label>Household ID <input name="household_id" inputmode="numeric" required></label>
<button type="submit">Join</button>
</form>
</section>"#;
    layout("Join", signed_in, body)
}

pub fn house(signed_in: bool, household: Option<&Household>) -> Html<String> {
    let body = match household {
        Some(household) => format!(
            r#"<h1>{name}</h1>
<p>Share this household ID so others can join: <strong class="household-id">{id}</strong></p>"#,
            name = escape(&household.household_name),
            id = household.household_id,
        ),
        None => r#"<h1>Household</h1>
<p>You are not part of a household yet. <a href="/join">Create or join one</a>.</p>"#
            .to_string(),
    };
    layout("Household", signed_in, &body)
}

pub fn account(user: Option<&User>, household: Option<&Household>) -> Html<String> {
    let body = match user {
        Some(user) => {
            let household = household
                .map(|h| format!("{} (#{})", escape(&h.household_name), h.household_id))
                .unwrap_or_else(|| "None".to_string());

            format!(
                r#"<h1>Account</h1>
<dl>
<dt>Name</dt><dd>{name}</dd>
<dt>Username</dt><dd>{username}</dd>
<dt>Email</dt><dd>{email}</dd>
<dt>Household</dt><dd>{household}</dd>
<dt>Member since</dt><dd>{since}</dd>
</dl>"#,
                name = escape(&user.display_name()),
                username = escape(&user.username),
                email = escape(&user.email),
                household = household,
                since = user.created_at.format("%Y-%m-%d"),
            )
        }
        None => r#"<h1>Account</h1>
<p><a href="/login">Log in</a> to see your account.</p>"#
            .to_string(),
    };
    layout("Account", user.is_some(), &body)
}

/// Generic error page
pub fn error(title: &str, message: &str) -> Html<String> {
    let body = format!(
        "<h1>{}</h1>\n{}",
        escape(title),
        message_block(Some(message))
    );
    layout(title, false, &body)
}
