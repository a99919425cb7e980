//! Transcription language selection.
//!
//! The backend accepts a fixed set of ISO-639-1 codes plus the `"auto"`
//! sentinel that asks it to detect the spoken language itself.  `Auto` is
//! the default and is distinct from every real code.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Languages the backend can transcribe, plus the auto-detect sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    /// Let the backend detect the spoken language.
    Auto,
    English,
    Hindi,
    Spanish,
    French,
    German,
    Japanese,
}

/// All selectable languages, in UI display order.
pub const LANGUAGES: [Language; 7] = [
    Language::Auto,
    Language::English,
    Language::Hindi,
    Language::Spanish,
    Language::French,
    Language::German,
    Language::Japanese,
];

impl Language {
    /// Wire code sent in the `language` form field of `/transcribe`.
    pub fn code(self) -> &'static str {
        match self {
            Language::Auto => "auto",
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
            Language::Japanese => "ja",
        }
    }

    /// Human-readable label for a language selector.
    pub fn label(self) -> &'static str {
        match self {
            Language::Auto => "Auto Detect",
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Japanese => "Japanese",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Auto
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    /// Parse a wire code (`"auto"`, `"en"`, …) back into a [`Language`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LANGUAGES
            .into_iter()
            .find(|l| l.code() == s)
            .ok_or_else(|| UnknownLanguage(s.to_owned()))
    }
}

/// Returned when a string is not one of the supported wire codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language code: {0:?}")]
pub struct UnknownLanguage(pub String);

impl TryFrom<String> for Language {
    type Error = UnknownLanguage;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Language> for String {
    fn from(l: Language) -> Self {
        l.code().to_owned()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
