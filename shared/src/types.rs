//! Common types used across the platform

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported advisory languages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Tamil,
}

impl Language {
    /// All languages in toggle order
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::Tamil];

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Tamil => "ta",
        }
    }

    /// BCP 47 tag used for speech output and voice input
    pub fn speech_locale(&self) -> &'static str {
        match self {
            Language::English => "en-IN",
            Language::Hindi => "hi-IN",
            Language::Tamil => "ta-IN",
        }
    }

    /// Next language in the toggle cycle, wrapping around
    pub fn next(self) -> Language {
        let index = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::English => write!(f, "English"),
            Language::Hindi => write!(f, "Hindi"),
            Language::Tamil => write!(f, "Tamil"),
        }
    }
}

/// Language name, code or locale that is not supported
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unsupported language: {0}")]
pub struct UnsupportedLanguage(pub String);

impl std::str::FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" | "en-in" => Ok(Language::English),
            "hindi" | "hi" | "hi-in" => Ok(Language::Hindi),
            "tamil" | "ta" | "ta-in" => Ok(Language::Tamil),
            other => Err(UnsupportedLanguage(other.to_string())),
        }
    }
}

/// Current wall-clock time in epoch milliseconds
pub fn now_epoch_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
