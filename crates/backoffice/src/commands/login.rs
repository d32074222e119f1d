//! `login`: exchange username + password for a bearer token.

use std::io::IsTerminal;

use dialoguer::Input;
use secrecy::{ExposeSecret, SecretString};

use backoffice_config as config;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

use super::util;

/// Password source for non-interactive use.
pub const PASSWORD_ENV: &str = "BACKOFFICE_PASSWORD";

pub async fn handle(session: &Session, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let username = match args.username {
        Some(name) => name,
        None => profile_username(&session.profile_name).map_or_else(prompt_username, Ok)?,
    };
    let password = read_password()?;

    let spinner = util::spinner(format!("Logging in as {username}"), global);
    let result = session.client.login(&username, &password).await;
    spinner.finish_and_clear();
    let envelope = result?;

    let Some(user) = envelope.data else {
        return Err(CliError::AuthFailed {
            message: "login response carried no user".into(),
            profile: session.profile_name.clone(),
        });
    };
    tracing::info!(user = %user.username, id = user.id, "logged in");

    let color = output::should_color(global.color);
    if args.print_token {
        output::print_output(&user.token, false);
    } else {
        config::store_token(&session.profile_name, &user.token)?;
        output::success(
            &format!(
                "Logged in as {} ({}), token stored for profile '{}'",
                user.nickname, user.username, session.profile_name
            ),
            color,
            global.quiet,
        );
    }
    Ok(())
}

fn profile_username(profile_name: &str) -> Option<String> {
    let cfg = config::load_config().ok()?;
    cfg.profiles.get(profile_name)?.username.clone()
}

fn prompt_username() -> Result<String, CliError> {
    Input::new()
        .with_prompt("Username")
        .interact_text()
        .map_err(util::prompt_err)
}

/// `BACKOFFICE_PASSWORD`, otherwise a hidden prompt on the terminal.
fn read_password() -> Result<SecretString, CliError> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(password));
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: format!("no terminal to prompt on; set {PASSWORD_ENV}"),
        });
    }
    let password = SecretString::from(rpassword::prompt_password("Password: ").map_err(util::prompt_err)?);
    if password.expose_secret().is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(password)
}
