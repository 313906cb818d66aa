//! Video Adapter - 远程视频生成客户端

mod fake_video_client;
mod http_video_client;

pub use fake_video_client::FakeVideoClient;
pub use http_video_client::{HttpVideoClient, HttpVideoClientConfig};
