//! Authentication commands.

use super::App;
use crate::output::{self, OutputFormat};
use anyhow::{bail, Result};
use postboard_auth::{AuthError, LoginOutcome, UserProfile};
use serde_json::json;
use std::io::{self, Write};

fn prompt_email() -> Result<String> {
    print!("Email: ");
    io::stdout().flush()?;
    let mut email = String::new();
    io::stdin().read_line(&mut email)?;
    Ok(email.trim().to_string())
}

/// Login with email and password, prompting for whatever was not given.
pub async fn login(
    app: &App,
    email: Option<String>,
    password: Option<String>,
    format: &OutputFormat,
) -> Result<()> {
    if let Some(user) = app.session.store().snapshot().user() {
        output::print_success(
            &format!("Already logged in as {}", user.display_name()),
            format,
        );
        return Ok(());
    }

    let email = match email {
        Some(email) => email,
        None => prompt_email()?,
    };
    if email.is_empty() {
        bail!("Email is required");
    }

    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")?,
    };
    if password.is_empty() {
        bail!("Password is required");
    }

    if *format == OutputFormat::Text {
        println!("Logging in...");
    }

    match app.controller.login(&email, &password).await {
        LoginOutcome::Authenticated(user) => {
            output::print_success(&format!("Logged in as {}", user.display_name()), format);
            Ok(())
        }
        LoginOutcome::Failed(message) => bail!("Login failed: {}", message),
        LoginOutcome::Superseded => bail!("Login was cancelled"),
    }
}

/// Logout and clear the persisted session.
pub async fn logout(app: &App, format: &OutputFormat) -> Result<()> {
    app.controller.logout().await;
    output::print_success("Logged out successfully", format);
    Ok(())
}

/// Show authentication status.
pub async fn status(app: &App, format: &OutputFormat) -> Result<()> {
    let state = app.session.store().snapshot();
    let phase = app.session.store().phase();

    match format {
        OutputFormat::Text => {
            output::print_row("API", &app.config.api_url);
            match state.user() {
                Some(user) if state.is_authenticated() => {
                    output::print_row("Auth", "logged in");
                    output::print_row("User ID", &user.id);
                    output::print_row("Email", &user.email);
                }
                _ => output::print_row("Auth", "not logged in"),
            }
            if let Some(error) = state.error() {
                output::print_row("Last error", error);
            }
        }
        OutputFormat::Json => {
            output::print_json(&json!({
                "api_url": app.config.api_url,
                "logged_in": state.is_authenticated(),
                "phase": phase,
                "user": state.user(),
                "error": state.error(),
            }));
        }
    }

    Ok(())
}

fn print_user(user: &UserProfile, format: &OutputFormat) {
    match format {
        OutputFormat::Text => {
            output::print_row("ID", &user.id);
            output::print_row("Email", &user.email);
            if let Some(name) = &user.name {
                output::print_row("Name", name);
            }
            if let Some(role) = user.role {
                output::print_row("Role", &format!("{:?}", role).to_lowercase());
            }
            if let Some(created_at) = &user.created_at {
                output::print_row("Member since", created_at);
            }
        }
        OutputFormat::Json => output::print_json(user),
    }
}

/// Fetch and show the current user's profile.
pub async fn whoami(app: &App, format: &OutputFormat) -> Result<()> {
    match app.controller.refresh_profile().await {
        Ok(user) => {
            print_user(&user, format);
            Ok(())
        }
        Err(AuthError::NotLoggedIn) => bail!("Not logged in. Run 'postboard login' first"),
        Err(AuthError::Unauthorized { .. }) => {
            bail!("Session expired. Run 'postboard login' again")
        }
        Err(e) => bail!("Failed to load profile: {}", e.user_message("Request failed")),
    }
}
