//! Login view state and the credential exchange behind it.

use backend::{ChatApi, ChatError};
use shared::session_store::SessionStore;
use std::sync::Arc;
use tracing::{error, info};
use zeroize::Zeroizing;

use crate::guard::View;

/// Username/password pair taken from the form for one submission.
pub struct Credentials {
    pub username: String,
    pub password: Zeroizing<String>,
}

/// Form state of the login view.
#[derive(Default)]
pub struct LoginForm {
    pub username: String,
    pub password: Zeroizing<String>,
    error: Option<String>,
    busy: bool,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a submission: clears the previous error. `None` while one is
    /// already in flight.
    pub fn begin(&mut self) -> Option<Credentials> {
        if self.busy {
            return None;
        }
        self.busy = true;
        self.error = None;
        Some(Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }

    /// Record the outcome. Returns the view to navigate to on success.
    pub fn finish(&mut self, result: Result<(), ChatError>) -> Option<View> {
        self.busy = false;
        match result {
            Ok(()) => {
                self.password = Zeroizing::new(String::new());
                Some(View::Chat)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }
}

/// Trades credentials for a bearer token and persists it.
pub struct CredentialExchange {
    api: Arc<dyn ChatApi>,
    store: Arc<dyn SessionStore>,
}

impl CredentialExchange {
    pub fn new(api: Arc<dyn ChatApi>, store: Arc<dyn SessionStore>) -> Self {
        Self { api, store }
    }

    pub async fn submit(&self, credentials: &Credentials) -> Result<(), ChatError> {
        let token = self
            .api
            .exchange_credentials(&credentials.username, &credentials.password)
            .await?;

        self.store.set(&token).map_err(|e| {
            error!("failed to persist session token: {:#}", e);
            ChatError::Session(e.to_string())
        })?;
        info!("signed in as {}", credentials.username);
        Ok(())
    }
}
