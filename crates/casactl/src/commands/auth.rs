//! Account commands: register, login, verification and password flows.

use anyhow::Result;

use casa_common::session::Session;
use casa_common::types::{LoginRequest, RegisterRequest};
use casa_common::ui::colors;
use casa_common::validation;

use crate::client::ApiClient;
use crate::commands::{ask, password_or_ask};

pub async fn register(
    client: &ApiClient,
    username: &str,
    email: &str,
    password: Option<String>,
) -> Result<()> {
    validation::require("username", username)?;
    validation::validate_email(email)?;
    let password = password_or_ask(password)?;
    validation::validate_password(&password)?;

    let message = client
        .register(&RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password,
        })
        .await?;

    println!("{message}");
    println!(
        "{}Check your inbox for a verification link, then run `casactl login {email}`.{}",
        colors::DIM,
        colors::RESET
    );
    Ok(())
}

pub async fn login(client: &ApiClient, email: &str, password: Option<String>) -> Result<()> {
    validation::validate_email(email)?;
    let password = password_or_ask(password)?;
    validation::validate_password(&password)?;

    let (user_id, token) = client
        .login(&LoginRequest {
            identifier: email.to_string(),
            password,
        })
        .await?;

    Session {
        user_id,
        email: email.to_string(),
        token,
    }
    .save()?;

    println!("Signed in as {}{email}{}", colors::HEADER, colors::RESET);
    println!("{}Try `casactl groups list`.{}", colors::DIM, colors::RESET);
    Ok(())
}

pub async fn verify_email(client: &ApiClient, token: &str) -> Result<()> {
    validation::require("token", token)?;
    let message = client.verify_email(token).await?;
    println!("{message}");
    Ok(())
}

pub async fn reset_password(client: &ApiClient, email: &str) -> Result<()> {
    validation::validate_email(email)?;
    let message = client.reset_password(email).await?;
    println!("{message}");
    Ok(())
}

pub async fn change_password(
    client: &ApiClient,
    token: &str,
    password: Option<String>,
) -> Result<()> {
    // reset links embed the token behind a colon
    let token = token.trim_start_matches(':');
    validation::require("token", token)?;
    let password = match password {
        Some(p) => p,
        None => ask("New password: ")?,
    };
    validation::validate_password(&password)?;

    let message = client.change_password(token, &password).await?;
    println!("{message}");
    Ok(())
}

pub fn logout() -> Result<()> {
    if Session::clear()? {
        println!("Signed out.");
    } else {
        println!("No stored session.");
    }
    Ok(())
}

pub fn whoami() -> Result<()> {
    match Session::load()? {
        Some(session) => {
            println!("{} ({})", session.email, session.user_id);
        }
        None => println!("Not signed in."),
    }
    Ok(())
}
