use crate::digest::PasswordDigest;
use crate::error::{AuthError, Result};
use crate::model::Session;
use crate::store::{Credential, CredentialStore};
use tracing::{debug, info};

fn validate_username(username: &str) -> std::result::Result<(), AuthError> {
    if username.is_empty() || username.contains(':') || username.chars().any(char::is_whitespace)
    {
        return Err(AuthError::InvalidUsername(username.to_string()));
    }
    Ok(())
}

/// Registers a new user and returns their session.
pub fn register<C: CredentialStore>(
    store: &mut C,
    username: &str,
    password: &str,
    salted: bool,
) -> Result<Session> {
    validate_username(username)?;

    let existing = store.load()?;
    if existing.iter().any(|c| c.username == username) {
        return Err(AuthError::DuplicateUser(username.to_string()).into());
    }

    let digest = if salted {
        PasswordDigest::salted(password)
    } else {
        PasswordDigest::plain(password)
    };
    store.append(&Credential {
        username: username.to_string(),
        digest,
    })?;

    info!(user = username, "registered user");
    Ok(Session::new(username))
}

pub fn authenticate<C: CredentialStore>(
    store: &C,
    username: &str,
    password: &str,
) -> Result<Session> {
    let credentials = store.load()?;
    let credential = credentials
        .iter()
        .find(|c| c.username == username)
        .ok_or_else(|| AuthError::UnknownUser(username.to_string()))?;

    if !credential.digest.verify(password) {
        debug!(user = username, "password mismatch");
        return Err(AuthError::InvalidCredentials.into());
    }

    debug!(user = username, "authenticated");
    Ok(Session::new(username))
}
