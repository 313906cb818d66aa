//! API 凭证

use super::GenerationError;

/// API Key
///
/// Debug/Display 只输出末尾 4 位，避免凭证进入日志
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self, GenerationError> {
        let key = key.into().trim().to_string();
        if key.is_empty() || key.chars().any(char::is_whitespace) {
            return Err(GenerationError::InvalidApiKey);
        }
        Ok(Self(key))
    }

    /// 原始凭证，仅用于请求头和下载 URL
    pub fn expose(&self) -> &str {
        &self.0
    }

    fn redacted(&self) -> String {
        let tail: String = self
            .0
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("****{}", tail)
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey({})", self.redacted())
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.redacted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_redacted() {
        let key = ApiKey::new("AIzaSySecretValue1234").unwrap();
        assert_eq!(key.expose(), "AIzaSySecretValue1234");
        assert_eq!(key.to_string(), "****1234");
        assert_eq!(format!("{:?}", key), "ApiKey(****1234)");
    }

    #[test]
    fn test_api_key_validation() {
        assert!(ApiKey::new("").is_err());
        assert!(ApiKey::new("   ").is_err());
        assert!(ApiKey::new("has space").is_err());
        assert_eq!(ApiKey::new("  abc  ").unwrap().expose(), "abc");
    }
}
