use std::fmt;
use std::ops::Deref;

use serde::Serialize;

/// Unicode whitespace plus the ASCII information separators (U+001C to
/// U+001F), which some extractors emit between lines and records.
#[must_use]
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Collapses every run of whitespace into a single space and trims both ends.
///
/// Total over any input: the empty string maps to itself, and the output of
/// `normalize` is a fixed point of `normalize`.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split(is_separator).filter(|w| !w.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Canonical working form of a document shared by every extractor.
///
/// Never contains two consecutive whitespace characters, a non-space
/// whitespace character, or leading/trailing whitespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedText(String);

impl NormalizedText {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(normalize(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for NormalizedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text of one résumé in both its raw and normalized forms.
///
/// Extractors read the normalized form; the line heuristics need the raw
/// line structure, which normalization destroys.
#[derive(Debug, Clone)]
pub struct ResumeText {
    raw: String,
    normalized: NormalizedText,
}

impl ResumeText {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized = NormalizedText::new(&raw);
        Self { raw, normalized }
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub const fn normalized(&self) -> &NormalizedText {
        &self.normalized
    }
}
