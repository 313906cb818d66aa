//! Generation Commands

/// 提交生成请求命令
///
/// 未提供的字段使用配置中的默认值
#[derive(Debug, Clone, Default)]
pub struct SubmitGeneration {
    pub prompt: String,
    /// 配音脚本，空白视为未提供
    pub script: Option<String>,
    pub voice: Option<String>,
    pub music_id: Option<String>,
    pub resolution: Option<String>,
    pub aspect_ratio: Option<String>,
}
