//! Worker Layer - Background Task Processing
//!
//! - GenerationWorker: 执行视频与配音生成
//! - GcWorker: 清理过期请求

mod gc_worker;
mod generation_worker;

pub use gc_worker::{GcWorker, GcWorkerConfig};
pub use generation_worker::{GenerationContext, GenerationWorker, GenerationWorkerConfig};
