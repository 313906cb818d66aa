//! 背景音乐曲目

use serde::{Deserialize, Serialize};

/// 背景音乐曲目（由配置提供）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicTrack {
    pub id: String,
    pub name: String,
    pub url: String,
}

impl MusicTrack {
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
        }
    }
}

/// 可选背景音乐列表
#[derive(Debug, Clone, Default)]
pub struct MusicLibrary {
    tracks: Vec<MusicTrack>,
}

impl MusicLibrary {
    pub fn new(tracks: Vec<MusicTrack>) -> Self {
        Self { tracks }
    }

    pub fn tracks(&self) -> &[MusicTrack] {
        &self.tracks
    }

    pub fn find(&self, id: &str) -> Option<&MusicTrack> {
        self.tracks.iter().find(|t| t.id == id)
    }
}
