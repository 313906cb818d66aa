//! Catalog Query Handlers

use std::sync::Arc;

use crate::application::queries::{ListMusic, ListVoices};
use crate::domain::generation::{MusicLibrary, MusicTrack, PREBUILT_VOICES};

/// ListVoices Handler
pub struct ListVoicesHandler {
    default_voice: String,
}

/// 音色条目
#[derive(Debug, Clone)]
pub struct VoiceEntry {
    pub name: &'static str,
    pub is_default: bool,
}

impl ListVoicesHandler {
    pub fn new(default_voice: impl Into<String>) -> Self {
        Self {
            default_voice: default_voice.into(),
        }
    }

    pub fn handle(&self, _query: ListVoices) -> Vec<VoiceEntry> {
        PREBUILT_VOICES
            .iter()
            .map(|&name| VoiceEntry {
                name,
                is_default: name.eq_ignore_ascii_case(&self.default_voice),
            })
            .collect()
    }
}

/// ListMusic Handler
pub struct ListMusicHandler {
    music: Arc<MusicLibrary>,
}

impl ListMusicHandler {
    pub fn new(music: Arc<MusicLibrary>) -> Self {
        Self { music }
    }

    pub fn handle(&self, _query: ListMusic) -> Vec<MusicTrack> {
        self.music.tracks().to_vec()
    }
}
