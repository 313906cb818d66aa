//! Credential Commands

/// 选择 API Key 命令
#[derive(Debug, Clone)]
pub struct SelectCredential {
    pub api_key: String,
}

/// 撤销当前 API Key 命令
#[derive(Debug, Clone)]
pub struct RevokeCredential;
