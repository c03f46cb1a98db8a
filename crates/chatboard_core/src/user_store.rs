//! crates/chatboard_core/src/user_store.rs
//!
//! Registered users and the current session, kept under the `users` and
//! `currentUser` storage keys.

use crate::domain::{next_record_id, RegistrationForm, UserRecord};
use crate::ports::{
    load_json, save_json, Clock, KeyValueStorage, PortError, CURRENT_USER_KEY, USERS_KEY,
};
use crate::validation::{validate_registration, ValidationErrors};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("{0}")]
    Invalid(ValidationErrors),
    #[error("User with this email already exists")]
    DuplicateEmail,
    #[error(transparent)]
    Storage(#[from] PortError),
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Storage(#[from] PortError),
}

/// Owns the user collection and the session over an injected storage port.
#[derive(Clone)]
pub struct UserStore {
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
}

impl UserStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// All registered users, in registration order.
    pub async fn users(&self) -> Result<Vec<UserRecord>, PortError> {
        Ok(load_json(self.storage.as_ref(), USERS_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Validates the form, creates the user and signs them in.
    ///
    /// Nothing is written unless every check passes.
    pub async fn register(&self, form: &RegistrationForm) -> Result<UserRecord, RegisterError> {
        let valid = validate_registration(form).map_err(RegisterError::Invalid)?;

        let mut users = self.users().await?;
        if users.iter().any(|u| u.email == valid.email) {
            debug!(email = %valid.email, "registration rejected: email taken");
            return Err(RegisterError::DuplicateEmail);
        }

        let now = self.clock.now();
        let user = UserRecord {
            id: next_record_id(now, users.iter().map(|u| u.id)),
            name: valid.name,
            email: valid.email,
            gender: valid.gender,
            date_of_birth: valid.date_of_birth,
            password: valid.password,
            registered_at: now,
        };

        users.push(user.clone());
        save_json(self.storage.as_ref(), USERS_KEY, &users).await?;
        self.set_session(&user).await?;

        info!(user_id = user.id, "user registered");
        Ok(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserRecord, LoginError> {
        if email.is_empty() || password.is_empty() {
            return Err(LoginError::MissingFields);
        }

        let user = self
            .users()
            .await?
            .into_iter()
            .find(|u| u.email == email && u.password == password)
            .ok_or(LoginError::InvalidCredentials)?;

        self.set_session(&user).await?;
        info!(user_id = user.id, "user logged in");
        Ok(user)
    }

    /// Clears the session. Safe to call when nobody is signed in.
    pub async fn logout(&self) -> Result<(), PortError> {
        self.storage.remove_item(CURRENT_USER_KEY).await?;
        debug!("session cleared");
        Ok(())
    }

    pub async fn current_session(&self) -> Result<Option<UserRecord>, PortError> {
        load_json(self.storage.as_ref(), CURRENT_USER_KEY).await
    }

    async fn set_session(&self, user: &UserRecord) -> Result<(), PortError> {
        save_json(self.storage.as_ref(), CURRENT_USER_KEY, user).await
    }
}
