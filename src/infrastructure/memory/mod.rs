//! Memory Layer - In-Memory State Management
//!
//! 实现 GenerationStore 和 CredentialStore，管理生成请求和 API Key 的内存状态

mod credential_store;
mod generation_store;

pub use credential_store::InMemoryCredentialStore;
pub use generation_store::InMemoryGenerationStore;
