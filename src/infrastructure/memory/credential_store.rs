//! In-Memory Credential Store Implementation

use std::sync::RwLock;

use crate::application::ports::CredentialStorePort;
use crate::domain::generation::ApiKey;

/// 内存凭证存储，进程重启后需重新选择
#[derive(Default)]
pub struct InMemoryCredentialStore {
    current: RwLock<Option<ApiKey>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用配置中的 Key 预置
    pub fn with_key(key: Option<ApiKey>) -> Self {
        Self {
            current: RwLock::new(key),
        }
    }
}

impl CredentialStorePort for InMemoryCredentialStore {
    fn select(&self, key: ApiKey) {
        // 锁中毒时仍然覆盖，保存的只是一个值
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(key);
        tracing::info!("API key selected");
    }

    fn current(&self) -> Option<ApiKey> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn revoke(&self) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        if guard.take().is_some() {
            tracing::warn!("API key revoked, user must select a new key");
        }
    }
}
