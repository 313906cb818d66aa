//! Credential Command Handlers

use std::sync::Arc;

use crate::application::commands::{RevokeCredential, SelectCredential};
use crate::application::error::ApplicationError;
use crate::application::ports::CredentialStorePort;
use crate::domain::generation::ApiKey;

/// SelectCredential Handler
pub struct SelectCredentialHandler {
    credentials: Arc<dyn CredentialStorePort>,
}

impl SelectCredentialHandler {
    pub fn new(credentials: Arc<dyn CredentialStorePort>) -> Self {
        Self { credentials }
    }

    pub fn handle(&self, command: SelectCredential) -> Result<(), ApplicationError> {
        let key = ApiKey::new(command.api_key)?;
        tracing::info!(key = %key, "Selecting API key");
        self.credentials.select(key);
        Ok(())
    }
}

/// RevokeCredential Handler
pub struct RevokeCredentialHandler {
    credentials: Arc<dyn CredentialStorePort>,
}

impl RevokeCredentialHandler {
    pub fn new(credentials: Arc<dyn CredentialStorePort>) -> Self {
        Self { credentials }
    }

    pub fn handle(&self, _command: RevokeCredential) {
        self.credentials.revoke();
    }
}
