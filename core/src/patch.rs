//! Locator extraction from free-text model output.
//!
//! The model answers in prose; the only structure we rely on is an XCUITest
//! XPath somewhere in the text. Extraction is explicit about its outcome so
//! the caller owns the keep-the-old-identifier fallback.

use regex_lite::Regex;

/// Outcome of scanning a suggestion for a locator expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatorSuggestion {
    /// A locator was found (trimmed).
    Found(String),
    /// The suggestion contained nothing matching the locator pattern.
    NotFound,
}

impl LocatorSuggestion {
    pub fn found(&self) -> Option<&str> {
        match self {
            LocatorSuggestion::Found(locator) => Some(locator),
            LocatorSuggestion::NotFound => None,
        }
    }
}

/// Extracts the first XCUITest XPath from `suggestion`.
pub fn extract_locator(suggestion: &str) -> LocatorSuggestion {
    // regex-lite has no compile-time patterns; this one is known-valid.
    #[allow(clippy::expect_used)]
    let pattern = Regex::new(r"//XCUIElementType[^\n]*").expect("valid locator pattern");
    match pattern.find(suggestion) {
        Some(m) => LocatorSuggestion::Found(m.as_str().trim().to_string()),
        None => LocatorSuggestion::NotFound,
    }
}
