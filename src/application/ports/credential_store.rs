//! Credential Store Port - API Key 选择状态
//!
//! 凭证作为显式输入传入生成流程，这里只保存用户当前选择的 Key

use crate::domain::generation::ApiKey;

/// Credential Store Port
pub trait CredentialStorePort: Send + Sync {
    /// 选择（替换）当前 Key
    fn select(&self, key: ApiKey);

    /// 当前 Key
    fn current(&self) -> Option<ApiKey>;

    /// 撤销当前 Key，强制用户重新选择
    fn revoke(&self);

    fn has_credential(&self) -> bool {
        self.current().is_some()
    }
}
