//! Generation Context - Value Objects

use serde::{Deserialize, Serialize};

use super::GenerationError;

/// 提示词最大长度（字符）
const MAX_PROMPT_CHARS: usize = 2000;

/// 可用的预置配音音色
pub const PREBUILT_VOICES: &[&str] = &[
    "Zephyr", "Puck", "Charon", "Kore", "Fenrir", "Leda", "Orus", "Aoede",
];

/// 视频提示词
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt(String);

impl Prompt {
    pub fn new(text: impl Into<String>) -> Result<Self, GenerationError> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(GenerationError::InvalidPrompt(
                "提示词不能为空".to_string(),
            ));
        }
        if text.chars().count() > MAX_PROMPT_CHARS {
            return Err(GenerationError::InvalidPrompt(format!(
                "提示词长度不能超过{}字符",
                MAX_PROMPT_CHARS
            )));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Prompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 视频分辨率
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Resolution {
    #[default]
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::P720 => "720p",
            Resolution::P1080 => "1080p",
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Resolution {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "720p" => Ok(Resolution::P720),
            "1080p" => Ok(Resolution::P1080),
            _ => Err(GenerationError::InvalidResolution(s.to_string())),
        }
    }
}

/// 画面比例，默认竖屏
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "16:9")]
    Landscape,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Portrait => "9:16",
            AspectRatio::Landscape => "16:9",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "9:16" => Ok(AspectRatio::Portrait),
            "16:9" => Ok(AspectRatio::Landscape),
            _ => Err(GenerationError::InvalidAspectRatio(s.to_string())),
        }
    }
}

/// 预置配音音色名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceName(String);

impl VoiceName {
    pub fn new(name: impl Into<String>) -> Result<Self, GenerationError> {
        let name = name.into();
        PREBUILT_VOICES
            .iter()
            .find(|v| v.eq_ignore_ascii_case(name.trim()))
            .map(|v| Self(v.to_string()))
            .ok_or(GenerationError::UnknownVoice(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 视频生成请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoGenerationRequest {
    pub prompt: Prompt,
    /// 固定为 1
    pub number_of_videos: u8,
    pub resolution: Resolution,
    pub aspect_ratio: AspectRatio,
}

impl VideoGenerationRequest {
    pub fn new(prompt: Prompt, resolution: Resolution, aspect_ratio: AspectRatio) -> Self {
        Self {
            prompt,
            number_of_videos: 1,
            resolution,
            aspect_ratio,
        }
    }
}

/// 语音合成请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub script: String,
    pub voice: VoiceName,
}
