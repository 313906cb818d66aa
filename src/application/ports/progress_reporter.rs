//! Progress Reporter Port - 生成进度回调

use super::GenerationState;

/// 生成流程在每个阶段边界回调
pub trait ProgressReporter: Send + Sync {
    /// 阶段变更
    fn on_state(&self, state: GenerationState);

    /// 轮询期间的进度文案
    fn on_progress(&self, message: &str);
}
