//! Account commands: sign up, log in and out, profile.

use secrecy::SecretString;
use serde_json::{Map, Value};

use nebula_storefront::models::AccountProfile;
use nebula_storefront::services::database::DocumentPath;
use nebula_storefront::{AppError, AppState};

use super::require_session;

/// Create an account, sign into it and store the profile fields given.
#[allow(clippy::print_stdout)]
pub async fn signup(
    state: &AppState,
    email: &str,
    password: String,
    name: Option<String>,
    phone: Option<String>,
) -> Result<(), AppError> {
    let password = SecretString::from(password);
    let session = state.backend().auth.sign_up(email, &password).await?;

    if name.is_some() || phone.is_some() {
        write_profile(state, &DocumentPath::account(&session.uid), name, phone).await?;
    }

    println!("Account created. Signed in as {} ({})", session.email, session.uid);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn login(state: &AppState, email: &str, password: String) -> Result<(), AppError> {
    let password = SecretString::from(password);
    let session = state.backend().auth.sign_in(email, &password).await?;
    println!("Signed in as {}", session.email);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn logout(state: &AppState) -> Result<(), AppError> {
    state.backend().auth.sign_out().await?;
    println!("Signed out");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn whoami(state: &AppState) {
    match state.session() {
        Some(session) => println!("{} ({})", session.email, session.uid),
        None => println!("Not signed in"),
    }
}

#[allow(clippy::print_stdout)]
pub async fn profile_show(state: &AppState) -> Result<(), AppError> {
    let session = require_session(state)?;
    let snapshot = state
        .backend()
        .database
        .read(&DocumentPath::account(&session.uid))
        .await?;

    let profile: AccountProfile = snapshot
        .deserialize()?
        .ok_or_else(|| AppError::NotFound(format!("profile for {}", session.email)))?;

    println!("Email: {}", profile.email);
    println!("Name:  {}", blank_as_dash(&profile.name));
    println!("Phone: {}", blank_as_dash(&profile.phone));
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn profile_set(
    state: &AppState,
    name: Option<String>,
    phone: Option<String>,
) -> Result<(), AppError> {
    let session = require_session(state)?;
    if name.is_none() && phone.is_none() {
        return Err(AppError::BadRequest(
            "Nothing to update. Pass --name and/or --phone.".to_string(),
        ));
    }

    write_profile(state, &DocumentPath::account(&session.uid), name, phone).await?;
    println!("Profile updated");
    Ok(())
}

async fn write_profile(
    state: &AppState,
    path: &str,
    name: Option<String>,
    phone: Option<String>,
) -> Result<(), AppError> {
    let mut fields = Map::new();
    if let Some(name) = name {
        fields.insert("name".to_string(), Value::String(name));
    }
    if let Some(phone) = phone {
        fields.insert("phone".to_string(), Value::String(phone));
    }
    state
        .backend()
        .database
        .write(path, Value::Object(fields))
        .await?;
    Ok(())
}

fn blank_as_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}
