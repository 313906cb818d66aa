//! 轮询进度文案
//!
//! 仅用于用户反馈，与远程任务是否完成无关

/// 循环展示的进度文案
pub const PROGRESS_MESSAGES: &[&str] = &[
    "Warming up the digital director...",
    "Storyboarding your scene...",
    "Setting up the virtual camera...",
    "Rendering the first frames...",
    "Adjusting light and color...",
    "Polishing the final cut...",
    "Almost there, adding the finishing touches...",
];

/// 无限循环的进度文案迭代器
#[derive(Debug, Clone)]
pub struct ProgressMessages {
    messages: &'static [&'static str],
    next: usize,
}

impl ProgressMessages {
    pub fn new(messages: &'static [&'static str]) -> Self {
        Self { messages, next: 0 }
    }
}

impl Default for ProgressMessages {
    fn default() -> Self {
        Self::new(PROGRESS_MESSAGES)
    }
}

impl Iterator for ProgressMessages {
    type Item = &'static str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.messages.is_empty() {
            return None;
        }
        let message = self.messages[self.next];
        self.next = (self.next + 1) % self.messages.len();
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_cycle() {
        let mut messages = ProgressMessages::new(&["a", "b", "c"]);
        let taken: Vec<_> = messages.by_ref().take(7).collect();
        assert_eq!(taken, vec!["a", "b", "c", "a", "b", "c", "a"]);
    }

    #[test]
    fn test_empty_list_yields_nothing() {
        let mut messages = ProgressMessages::new(&[]);
        assert_eq!(messages.next(), None);
    }
}
