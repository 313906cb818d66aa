//! Generation Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{CredentialStorePort, GenerationRecord, GenerationStorePort};
use crate::application::queries::{GetCredentialStatus, GetGeneration, ListGenerations};

/// GetGeneration Handler
pub struct GetGenerationHandler {
    store: Arc<dyn GenerationStorePort>,
}

impl GetGenerationHandler {
    pub fn new(store: Arc<dyn GenerationStorePort>) -> Self {
        Self { store }
    }

    pub fn handle(&self, query: GetGeneration) -> Result<GenerationRecord, ApplicationError> {
        self.store
            .get(query.request_id)
            .ok_or_else(|| ApplicationError::not_found("Generation", query.request_id))
    }
}

/// ListGenerations Handler
pub struct ListGenerationsHandler {
    store: Arc<dyn GenerationStorePort>,
}

impl ListGenerationsHandler {
    pub fn new(store: Arc<dyn GenerationStorePort>) -> Self {
        Self { store }
    }

    pub fn handle(&self, _query: ListGenerations) -> Vec<GenerationRecord> {
        self.store.list()
    }
}

/// 凭证状态响应
#[derive(Debug, Clone)]
pub struct CredentialStatusResponse {
    pub has_credential: bool,
}

/// GetCredentialStatus Handler
pub struct GetCredentialStatusHandler {
    credentials: Arc<dyn CredentialStorePort>,
}

impl GetCredentialStatusHandler {
    pub fn new(credentials: Arc<dyn CredentialStorePort>) -> Self {
        Self { credentials }
    }

    pub fn handle(&self, _query: GetCredentialStatus) -> CredentialStatusResponse {
        CredentialStatusResponse {
            has_credential: self.credentials.has_credential(),
        }
    }
}
