//! Catalog Queries - 音色与背景音乐列表

/// 列出预置配音音色
#[derive(Debug, Clone)]
pub struct ListVoices;

/// 列出背景音乐
#[derive(Debug, Clone)]
pub struct ListMusic;
