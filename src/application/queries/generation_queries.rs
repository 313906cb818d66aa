//! Generation Queries

use uuid::Uuid;

/// 获取生成请求状态查询
#[derive(Debug, Clone)]
pub struct GetGeneration {
    pub request_id: Uuid,
}

/// 列出所有生成请求查询
#[derive(Debug, Clone)]
pub struct ListGenerations;

/// 凭证状态查询
#[derive(Debug, Clone)]
pub struct GetCredentialStatus;
