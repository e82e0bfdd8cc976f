use location_tracker_lib::{messages, LocationRecord, NewLocation};
use thiserror::Error;

use crate::{
    capture::save_simulated,
    store::{LocationStore, StoreError},
};

pub const GENERATED_MESSAGE: &str = "Localização gerada e salva no banco de dados!";

#[derive(Debug, Error, PartialEq)]
pub enum LoginError {
    #[error("Credenciais inválidas")]
    InvalidCredentials,
    /// Shown like a wrong password; the cause is only logged.
    #[error("Credenciais inválidas")]
    NotConfigured,
}

/// Client-side gate in front of the admin view. It only decides what the client
/// offers; the server enforces its own token.
pub struct AdminGate {
    credentials: Option<(String, String)>,
}

/// Proof of a successful login, required by every admin action.
pub struct AdminSession {
    pub username: String,
}

impl AdminGate {
    /// Both values must be present and non-empty, otherwise nobody can log in.
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        let credentials = match (username, password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some((username, password))
            }
            _ => None,
        };
        Self { credentials }
    }

    pub fn login(&self, username: &str, password: &str) -> Result<AdminSession, LoginError> {
        let Some((expected_user, expected_password)) = &self.credentials else {
            tracing::warn!("No admin credentials configured, refusing login for {username}");
            return Err(LoginError::NotConfigured);
        };

        if username == expected_user && password == expected_password {
            tracing::info!("Admin {username} logged in");
            Ok(AdminSession {
                username: username.to_string(),
            })
        } else {
            tracing::warn!("Rejected admin login for {username}");
            Err(LoginError::InvalidCredentials)
        }
    }
}

impl AdminSession {
    pub async fn list(&self, store: &dyn LocationStore) -> Result<Vec<LocationRecord>, StoreError> {
        store.list().await.inspect_err(|err| {
            tracing::error!("Failed to fetch saved locations: {err}");
        })
    }

    /// Returns the message to show, for success and failure alike.
    pub async fn clear(&self, store: &dyn LocationStore) -> Result<&'static str, &'static str> {
        match store.clear().await {
            Ok(()) => {
                tracing::info!("Locations cleared by {}", self.username);
                Ok(messages::CLEAR_OK)
            }
            Err(err) => {
                tracing::error!("Failed to clear locations for {}: {err}", self.username);
                Err(messages::CLEAR_FAILED)
            }
        }
    }

    pub async fn generate(&self, store: &dyn LocationStore) -> Result<NewLocation, StoreError> {
        tracing::debug!("{} generated a simulated location", self.username);
        save_simulated(store).await.inspect_err(|err| {
            tracing::error!("Failed to save generated location: {err}");
        })
    }
}
