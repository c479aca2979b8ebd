/// Error types for the translation gateway and its providers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MtError {
    /// No usable provider credential; permanent for the session
    GatewayUnavailable(String),
    /// Provider call failed or returned an unusable result; safe to retry
    TranslationFailed(String),
    /// Provider could not be constructed from the given settings
    ConfigError(String),
}

impl MtError {
    /// Whether retrying can ever succeed in this process
    pub fn is_permanent(&self) -> bool {
        matches!(self, MtError::GatewayUnavailable(_) | MtError::ConfigError(_))
    }
}

impl std::fmt::Display for MtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MtError::GatewayUnavailable(msg) => write!(f, "Translation unavailable: {}", msg),
            MtError::TranslationFailed(msg) => write!(f, "Translation failed: {}", msg),
            MtError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for MtError {}

impl From<reqwest::Error> for MtError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs stay out of messages that get logged or printed
        MtError::TranslationFailed(format!("Network error: {}", err.without_url()))
    }
}

/// Result type for translation operations
pub type MtResult<T> = Result<T, MtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permanence() {
        assert!(MtError::GatewayUnavailable("no key".to_string()).is_permanent());
        assert!(MtError::ConfigError("bad".to_string()).is_permanent());
        assert!(!MtError::TranslationFailed("timeout".to_string()).is_permanent());
    }

    #[test]
    fn test_display() {
        let err = MtError::TranslationFailed("HTTP 500".to_string());
        assert_eq!(err.to_string(), "Translation failed: HTTP 500");
    }
}
