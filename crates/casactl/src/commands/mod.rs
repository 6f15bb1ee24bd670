//! Command handlers for casactl.
//!
//! Each handler is one view: validate input, issue one HTTP call through
//! the shared client, render the response.

pub mod auth;
pub mod bills;
pub mod events;
pub mod grocery;
pub mod groups;
pub mod notify;

use anyhow::{Context, Result};
use std::io::{self, Write};

use casa_common::session::Session;
use casa_common::types::User;

/// The stored login, or a pointer at the login command.
pub(crate) fn require_session() -> Result<Session> {
    Session::load()?.context("Not signed in. Run `casactl login <email>` first")
}

/// Prompt on stdout and read one trimmed line from stdin.
pub(crate) fn ask(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub(crate) fn password_or_ask(password: Option<String>) -> Result<String> {
    match password {
        Some(p) => Ok(p),
        None => ask("Password: "),
    }
}

/// Match a query against a user list by id, username or email.
pub(crate) fn find_user<'a>(query: &str, users: &'a [User]) -> Option<&'a User> {
    users
        .iter()
        .find(|u| u.id == query || u.username == query || u.email == query)
}
